use crate::core::io::ligand_table::ScreeningCandidate;
use crate::core::models::document::Document;
use crate::workflows::progress::{Progress, ProgressReporter};
use tracing::{debug, info, instrument};

/// Name given to the job generated for `candidate` from a base job.
pub fn job_name(base: &str, candidate: &str) -> String {
    format!("{}_{}", base, candidate)
}

/// Produces one job per candidate ligand.
///
/// Each job is a copy of `base` renamed to `<base>_<candidate>` with the
/// candidate ligand appended after the existing entities. Chain identifiers
/// are reconciled before the job is returned, so the candidate receives the
/// first id not taken by the base job.
#[instrument(skip_all, name = "screening_workflow", fields(base = base.name()))]
pub fn run(
    base: &Document,
    candidates: &[ScreeningCandidate],
    reporter: &ProgressReporter,
) -> Vec<Document> {
    reporter.report(Progress::ScreeningStarted {
        base: base.name().to_string(),
        candidates: candidates.len() as u64,
    });
    info!(
        "Generating {} job(s) from base job '{}'.",
        candidates.len(),
        base.name()
    );

    let mut jobs = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let mut job = base.clone();
        job.set_name(job_name(base.name(), &candidate.name));
        job.add_ligand(candidate.ligand.clone());
        job.reconcile_ids();
        debug!("Prepared job '{}' with {} chain(s).", job.name(), job.num_chains());
        reporter.report_with(|| Progress::JobPrepared {
            job: job.name().to_string(),
        });
        jobs.push(job);
    }

    reporter.report(Progress::ScreeningFinished);
    jobs
}
