/// Events emitted while a trace runs, for progress bars and status lines.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// A named phase begins (e.g. "Seeding", "Tracing").
    PhaseStart { name: &'static str },
    PhaseFinish,

    /// Integration begins: `lines_per_source` field lines from each of
    /// `sources` positive charges.
    TracingStart {
        sources: usize,
        lines_per_source: usize,
    },
    /// One field line finished integrating. With the `parallel` feature the
    /// events arrive in completion order, not line order.
    LineTraced { charge_index: usize, seed_index: usize },
    TracingFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback.
///
/// The callback must be `Send + Sync` because lines may be traced on
/// worker threads.
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

    #[inline]
    pub fn is_silent(&self) -> bool {
        self.callback.is_none()
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
