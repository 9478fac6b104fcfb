use crate::cli::ScreenArgs;
use crate::config::PartialJobConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use af3cli::core::io::{json::JsonFile, ligand_table, traits::DocumentFile};
use af3cli::core::models::document::Document;
use af3cli::workflows::{
    self,
    progress::{Progress, ProgressReporter},
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Replaces characters that are unsafe in file names.
fn file_stem(job_name: &str) -> String {
    job_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn output_path(dir: &Path, job_name: &str) -> PathBuf {
    dir.join(format!("{}.json", file_stem(job_name)))
}

/// Pairs every job with its output file. Fails if two jobs would share one.
fn plan_outputs(dir: &Path, jobs: Vec<Document>) -> Result<Vec<(PathBuf, Document)>> {
    let mut owners: HashMap<PathBuf, String> = HashMap::with_capacity(jobs.len());
    let mut planned = Vec::with_capacity(jobs.len());
    for job in jobs {
        let path = output_path(dir, job.name());
        if let Some(other) = owners.insert(path.clone(), job.name().to_string()) {
            return Err(CliError::Argument(format!(
                "Jobs '{}' and '{}' would both be written to {:?}; rename one of the candidates.",
                other,
                job.name(),
                path
            )));
        }
        planned.push((path, job));
    }
    Ok(planned)
}

pub fn run(args: ScreenArgs, progress_handler: CliProgressHandler) -> Result<()> {
    let base = PartialJobConfig::from_file(&args.config)?.into_document()?;
    info!("Loading screening candidates from {:?}", &args.ligands);
    let candidates = ligand_table::load(&args.ligands)?;
    if candidates.is_empty() {
        warn!("Ligand table {:?} contains no candidates.", &args.ligands);
        println!("Warning: no candidates found, nothing to write.");
        return Ok(());
    }

    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let jobs = workflows::screen::run(&base, &candidates, &reporter);
    let mut planned = plan_outputs(&args.output_dir, jobs)?;

    std::fs::create_dir_all(&args.output_dir)?;
    info!(
        "Writing {} job(s) to {:?}",
        planned.len(),
        &args.output_dir
    );
    reporter.report(Progress::WritingStarted {
        jobs: planned.len() as u64,
    });
    planned.par_iter_mut().try_for_each(|(path, job)| -> Result<()> {
        JsonFile::write_to_path(job, path.as_path()).map_err(|e| CliError::FileWriting {
            path: path.clone(),
            source: e.into(),
        })?;
        debug!("Wrote job '{}' to {:?}", job.name(), path);
        reporter.report_with(|| Progress::JobWritten {
            job: job.name().to_string(),
        });
        Ok(())
    })?;
    reporter.report(Progress::WritingFinished);

    println!(
        "✓ {} job(s) written to: {}",
        planned.len(),
        args.output_dir.display()
    );
    Ok(())
}
