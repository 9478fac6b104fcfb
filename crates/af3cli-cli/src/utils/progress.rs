use af3cli::workflows::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use tracing::warn;

const JOB_TEMPLATE: &str = "{prefix:>9} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}";

/// Shows screening progress as an `indicatif` bar on stderr: one bar while
/// jobs are prepared and one while they are written, each naming the
/// latest job.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Tracks the same state without drawing. Used with `--quiet`.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target).with_style(Self::job_style());
        pb.finish_and_clear();
        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb) = pb.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::ScreeningStarted { base, candidates } => {
                    Self::start_stage(&pb, "Preparing", candidates);
                    pb.set_message(format!("from '{}'", base));
                }
                Progress::WritingStarted { jobs } => {
                    Self::start_stage(&pb, "Writing", jobs);
                }
                Progress::JobPrepared { job } | Progress::JobWritten { job } => {
                    pb.inc(1);
                    pb.set_message(job);
                }
                Progress::ScreeningFinished => {
                    pb.finish_with_message(format!("{} job(s) prepared", pb.position()));
                }
                Progress::WritingFinished => {
                    pb.finish_with_message(format!("✓ {} job(s) written", pb.position()));
                }
            }
        })
    }

    fn start_stage(pb: &ProgressBar, stage: &'static str, total: u64) {
        pb.reset();
        pb.set_length(total);
        pb.set_prefix(stage);
        pb.set_message("");
    }

    fn job_style() -> ProgressStyle {
        ProgressStyle::with_template(JOB_TEMPLATE)
            .map(|style| style.progress_chars("##-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
