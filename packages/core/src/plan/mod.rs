//! Build planning
//!
//! The image build is modeled as an explicit directed graph of layer nodes.
//! Cache validity is a pure function of each node's content digest, so the
//! manifest-before-payload ordering falls out of the graph edges instead of
//! positional ordering in a recipe file. The stock bot graph has two nodes
//! (dependencies, application) and one edge between them.

pub mod cache;
pub mod graph;

pub use cache::{CacheError, CacheOutcome, CachePlan, DigestStore};
pub use graph::{BuildGraph, GraphError, LayerInput, LayerKind, LayerNode};

use crate::config::BotpackConfig;
use crate::docker::dockerfile::render_recipe;
use crate::runtime_env::RuntimeEnv;
use std::path::PathBuf;
use thiserror::Error;

/// Node id of the dependency layer in the stock bot graph
pub const NODE_DEPENDENCIES: &str = "dependencies";

/// Node id of the application layer in the stock bot graph
pub const NODE_APPLICATION: &str = "application";

/// Errors raised while gathering build inputs or assembling the graph
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("dependency manifest not found: {0}")]
    ManifestMissing(PathBuf),

    #[error("entrypoint not found: {0}")]
    EntrypointMissing(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// The two build-input files, read from the build root
#[derive(Debug, Clone)]
pub struct BuildInputs {
    /// Dependency manifest contents
    pub manifest: Vec<u8>,
    /// Entrypoint contents
    pub entrypoint: Vec<u8>,
}

/// Read the manifest and entrypoint from the build root
///
/// The manifest is read first: a missing manifest fails before the
/// entrypoint is even examined, matching the layer ordering of the build
/// itself.
pub fn read_build_inputs(
    build_root: &std::path::Path,
    config: &BotpackConfig,
) -> Result<BuildInputs, PlanError> {
    let manifest_path = build_root.join(&config.manifest);
    if !manifest_path.exists() {
        return Err(PlanError::ManifestMissing(manifest_path));
    }
    let manifest = std::fs::read(&manifest_path).map_err(|source| PlanError::Io {
        path: manifest_path,
        source,
    })?;

    let entrypoint_path = build_root.join(&config.entrypoint);
    if !entrypoint_path.exists() {
        return Err(PlanError::EntrypointMissing(entrypoint_path));
    }
    let entrypoint = std::fs::read(&entrypoint_path).map_err(|source| PlanError::Io {
        path: entrypoint_path,
        source,
    })?;

    Ok(BuildInputs {
        manifest,
        entrypoint,
    })
}

/// Assemble the stock two-node bot graph
///
/// The dependency node carries the image preamble (base image selection,
/// baked environment, workdir) and the manifest blob; the application node
/// carries the payload blob and the startup command, with an edge from the
/// dependency node. Edits to the entrypoint therefore never invalidate the
/// dependency layer, while any preamble or manifest change invalidates both.
pub fn bot_graph(config: &BotpackConfig, env: &RuntimeEnv, inputs: &BuildInputs) -> BuildGraph {
    let recipe = render_recipe(config, env);

    let mut dependency_instructions = recipe.preamble.clone();
    dependency_instructions.extend(recipe.dependency_steps.clone());

    let mut graph = BuildGraph::new();
    graph.add_node(LayerNode {
        id: NODE_DEPENDENCIES.to_string(),
        kind: LayerKind::Dependencies,
        instructions: dependency_instructions,
        inputs: vec![LayerInput::new(&config.manifest, inputs.manifest.clone())],
        parents: vec![],
    });
    graph.add_node(LayerNode {
        id: NODE_APPLICATION.to_string(),
        kind: LayerKind::Application,
        instructions: recipe.application_steps.clone(),
        inputs: vec![LayerInput::new(
            &config.entrypoint,
            inputs.entrypoint.clone(),
        )],
        parents: vec![NODE_DEPENDENCIES.to_string()],
    });
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_project(dir: &TempDir, manifest: &str, entrypoint: Option<&str>) {
        std::fs::write(dir.path().join("requirements.txt"), manifest).unwrap();
        if let Some(body) = entrypoint {
            std::fs::write(dir.path().join("bot.py"), body).unwrap();
        }
    }

    #[test]
    fn missing_manifest_fails_before_entrypoint_check() {
        let dir = TempDir::new().unwrap();
        // Entrypoint present, manifest absent: must still be the manifest error
        std::fs::write(dir.path().join("bot.py"), "print('hi')").unwrap();
        let err = read_build_inputs(dir.path(), &BotpackConfig::default()).unwrap_err();
        assert!(matches!(err, PlanError::ManifestMissing(_)));
    }

    #[test]
    fn missing_entrypoint_fails_after_manifest_read() {
        let dir = TempDir::new().unwrap();
        write_project(&dir, "requests==2.31.0\n", None);
        let err = read_build_inputs(dir.path(), &BotpackConfig::default()).unwrap_err();
        assert!(matches!(err, PlanError::EntrypointMissing(_)));
    }

    #[test]
    fn bot_graph_has_two_nodes_and_one_edge() {
        let inputs = BuildInputs {
            manifest: b"requests\n".to_vec(),
            entrypoint: b"print('hi')\n".to_vec(),
        };
        let graph = bot_graph(&BotpackConfig::default(), &RuntimeEnv::default(), &inputs);
        let order = graph.topo_order().unwrap();
        assert_eq!(order.len(), 2);
        assert_eq!(order[0].id, NODE_DEPENDENCIES);
        assert_eq!(order[1].id, NODE_APPLICATION);
        assert_eq!(order[1].parents, vec![NODE_DEPENDENCIES.to_string()]);
    }

    #[test]
    fn payload_edit_leaves_dependency_digest_unchanged() {
        let config = BotpackConfig::default();
        let env = RuntimeEnv::default();
        let before = BuildInputs {
            manifest: b"requests\n".to_vec(),
            entrypoint: b"print('v1')\n".to_vec(),
        };
        let after = BuildInputs {
            manifest: b"requests\n".to_vec(),
            entrypoint: b"print('v2')\n".to_vec(),
        };

        let d1 = bot_graph(&config, &env, &before).digests().unwrap();
        let d2 = bot_graph(&config, &env, &after).digests().unwrap();

        assert_eq!(d1[NODE_DEPENDENCIES], d2[NODE_DEPENDENCIES]);
        assert_ne!(d1[NODE_APPLICATION], d2[NODE_APPLICATION]);
    }

    #[test]
    fn manifest_edit_invalidates_both_layers() {
        let config = BotpackConfig::default();
        let env = RuntimeEnv::default();
        let before = BuildInputs {
            manifest: b"requests==2.31.0\n".to_vec(),
            entrypoint: b"print('hi')\n".to_vec(),
        };
        let after = BuildInputs {
            manifest: b"requests==2.32.0\n".to_vec(),
            entrypoint: b"print('hi')\n".to_vec(),
        };

        let d1 = bot_graph(&config, &env, &before).digests().unwrap();
        let d2 = bot_graph(&config, &env, &after).digests().unwrap();

        assert_ne!(d1[NODE_DEPENDENCIES], d2[NODE_DEPENDENCIES]);
        assert_ne!(d1[NODE_APPLICATION], d2[NODE_APPLICATION]);
    }

    #[test]
    fn interpreter_pin_change_invalidates_both_layers() {
        let env = RuntimeEnv::default();
        let inputs = BuildInputs {
            manifest: b"requests\n".to_vec(),
            entrypoint: b"print('hi')\n".to_vec(),
        };
        let old_pin = BotpackConfig::default();
        let new_pin = BotpackConfig {
            interpreter: "3.13".to_string(),
            ..BotpackConfig::default()
        };

        let d1 = bot_graph(&old_pin, &env, &inputs).digests().unwrap();
        let d2 = bot_graph(&new_pin, &env, &inputs).digests().unwrap();

        assert_ne!(d1[NODE_DEPENDENCIES], d2[NODE_DEPENDENCIES]);
        assert_ne!(d1[NODE_APPLICATION], d2[NODE_APPLICATION]);
    }

    #[test]
    fn identical_inputs_produce_identical_digests() {
        let config = BotpackConfig::default();
        let env = RuntimeEnv::default();
        let inputs = BuildInputs {
            manifest: b"requests\n".to_vec(),
            entrypoint: b"print('hi')\n".to_vec(),
        };

        let d1 = bot_graph(&config, &env, &inputs).digests().unwrap();
        let d2 = bot_graph(&config, &env, &inputs).digests().unwrap();
        assert_eq!(d1, d2);
    }
}
