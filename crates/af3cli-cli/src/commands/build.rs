use crate::cli::BuildArgs;
use crate::config::PartialJobConfig;
use crate::error::{CliError, Result};
use af3cli::core::io::{json::JsonFile, traits::DocumentFile};
use tracing::info;

pub fn run(args: BuildArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialJobConfig::from_file(path)?,
        None => PartialJobConfig::default(),
    };
    info!("Merging job file and CLI arguments...");
    let mut document = partial_config.merge_with_cli(&args)?;

    info!("Writing job '{}' to {:?}", document.name(), &args.output);
    JsonFile::write_to_path(&mut document, &args.output).map_err(|e| CliError::FileWriting {
        path: args.output.clone(),
        source: e.into(),
    })?;

    println!(
        "✓ Job '{}' with {} chain(s) written to: {}",
        document.name(),
        document.num_chains(),
        args.output.display()
    );
    Ok(())
}
