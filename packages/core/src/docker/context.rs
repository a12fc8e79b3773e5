//! Build context assembly
//!
//! The context shipped to the daemon holds exactly three files: the rendered
//! Dockerfile, the dependency manifest, and the entrypoint. The rest of the
//! build root never enters the context, so unrelated source edits cannot
//! invalidate the dependency layer. Files are appended in layer order
//! (manifest before entrypoint).

use crate::config::BotpackConfig;
use crate::plan::BuildInputs;
use flate2::Compression;
use flate2::write::GzEncoder;
use tar::Builder as TarBuilder;

/// Create a gzipped tar archive with the Dockerfile, manifest, and entrypoint
pub fn create_build_context(
    dockerfile: &str,
    config: &BotpackConfig,
    inputs: &BuildInputs,
) -> Result<Vec<u8>, std::io::Error> {
    let mut archive_buffer = Vec::new();

    {
        let encoder = GzEncoder::new(&mut archive_buffer, Compression::default());
        let mut tar = TarBuilder::new(encoder);

        append_file(&mut tar, "Dockerfile", dockerfile.as_bytes())?;
        append_file(&mut tar, &config.manifest, &inputs.manifest)?;
        append_file(&mut tar, &config.entrypoint, &inputs.entrypoint)?;
        tar.finish()?;

        let encoder = tar.into_inner()?;
        encoder.finish()?;
    }

    Ok(archive_buffer)
}

fn append_file<W: std::io::Write>(
    tar: &mut TarBuilder<W>,
    path: &str,
    bytes: &[u8],
) -> Result<(), std::io::Error> {
    let mut header = tar::Header::new_gnu();
    header.set_path(path)?;
    header.set_size(bytes.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    tar.append(&header, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::dockerfile::render_recipe;
    use crate::runtime_env::RuntimeEnv;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn sample_inputs() -> BuildInputs {
        BuildInputs {
            manifest: b"requests==2.31.0\nschedule\n".to_vec(),
            entrypoint: b"print('hi')\n".to_vec(),
        }
    }

    fn build_sample_context() -> Vec<u8> {
        let config = BotpackConfig::default();
        let recipe = render_recipe(&config, &RuntimeEnv::default());
        create_build_context(&recipe.dockerfile(), &config, &sample_inputs()).unwrap()
    }

    fn entry_names(context: &[u8]) -> Vec<String> {
        let mut archive = tar::Archive::new(GzDecoder::new(context));
        archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn context_is_gzip_compressed() {
        let context = build_sample_context();
        assert_eq!(context[0], 0x1f);
        assert_eq!(context[1], 0x8b);
    }

    #[test]
    fn context_holds_exactly_three_files_in_layer_order() {
        let context = build_sample_context();
        assert_eq!(
            entry_names(&context),
            vec!["Dockerfile", "requirements.txt", "bot.py"]
        );
    }

    #[test]
    fn manifest_bytes_survive_archiving() {
        let context = build_sample_context();
        let mut archive = tar::Archive::new(GzDecoder::new(context.as_slice()));
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            if entry.path().unwrap().to_string_lossy() == "requirements.txt" {
                let mut body = Vec::new();
                entry.read_to_end(&mut body).unwrap();
                assert_eq!(body, sample_inputs().manifest);
                return;
            }
        }
        panic!("manifest entry missing");
    }

    #[test]
    fn custom_paths_are_used_as_archive_names() {
        let config = BotpackConfig {
            manifest: "deps/requirements.txt".to_string(),
            entrypoint: "src/main.py".to_string(),
            ..BotpackConfig::default()
        };
        let recipe = render_recipe(&config, &RuntimeEnv::default());
        let context =
            create_build_context(&recipe.dockerfile(), &config, &sample_inputs()).unwrap();
        assert_eq!(
            entry_names(&context),
            vec!["Dockerfile", "deps/requirements.txt", "src/main.py"]
        );
    }
}
