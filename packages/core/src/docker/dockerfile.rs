//! Dockerfile rendering
//!
//! botpack does not ship a static Dockerfile; the recipe is rendered from
//! the project config, the baked runtime environment, and the layer split.
//! The instructions are grouped by layer so the build graph can digest each
//! layer's recipe independently: the preamble and manifest install belong to
//! the dependency layer, the payload copy and startup command to the
//! application layer.

use crate::config::BotpackConfig;
use crate::runtime_env::RuntimeEnv;

/// Rendered recipe instructions, grouped by layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRecipe {
    /// Base image selection, baked environment, working directory
    pub preamble: Vec<String>,
    /// Manifest copy and installer invocation
    pub dependency_steps: Vec<String>,
    /// Payload copy and startup command
    pub application_steps: Vec<String>,
}

impl RenderedRecipe {
    /// The full Dockerfile text, layers in build order
    pub fn dockerfile(&self) -> String {
        let mut out = String::new();
        for line in self
            .preamble
            .iter()
            .chain(&self.dependency_steps)
            .chain(&self.application_steps)
        {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Render the recipe for a project
pub fn render_recipe(config: &BotpackConfig, env: &RuntimeEnv) -> RenderedRecipe {
    let mut preamble = vec![format!("FROM {}", config.base_image())];
    for line in env.env_lines() {
        preamble.push(format!("ENV {line}"));
    }
    preamble.push(format!("WORKDIR {}", config.workdir));

    let dependency_steps = vec![
        format!("COPY {} .", config.manifest),
        format!("RUN pip install -r {}", config.manifest),
    ];

    let application_steps = vec![
        format!("COPY {} .", config.entrypoint),
        // Exec form: the interpreter on the entrypoint, no shell wrapping
        format!("CMD [\"python\", \"{}\"]", config.entrypoint),
    ];

    RenderedRecipe {
        preamble,
        dependency_steps,
        application_steps,
    }
}
