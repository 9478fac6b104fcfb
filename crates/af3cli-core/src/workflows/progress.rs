/// Events emitted while screening jobs are prepared and written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// One job per candidate is about to be derived from `base`.
    ScreeningStarted { base: String, candidates: u64 },
    /// The job named `job` has its ligand appended and its ids reconciled.
    JobPrepared { job: String },
    ScreeningFinished,

    /// `jobs` documents are about to be serialized.
    WritingStarted { jobs: u64 },
    JobWritten { job: String },
    WritingFinished,
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Like [`report`](Self::report), but only builds the event when a
    /// callback is attached. Used for events that carry job names.
    #[inline]
    pub fn report_with(&self, event: impl FnOnce() -> Progress) {
        if let Some(cb) = &self.callback {
            cb(event());
        }
    }
}
