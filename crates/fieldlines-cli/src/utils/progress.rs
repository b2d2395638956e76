use fieldlines::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// What the terminal shows while a trace runs.
///
/// Phases get a spinner. While lines are integrated the bar counts lines, and
/// its message counts the source charges whose lines are all finished, since
/// lines complete out of order when tracing runs in parallel.
struct TraceView {
    bar: ProgressBar,
    sources: usize,
    lines_per_source: usize,
    traced_per_charge: HashMap<usize, usize>,
    finished_sources: usize,
}

impl TraceView {
    fn hidden() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
            .with_style(spinner_style());
        bar.finish_and_clear();
        Self {
            bar,
            sources: 0,
            lines_per_source: 0,
            traced_per_charge: HashMap::new(),
            finished_sources: 0,
        }
    }

    fn sources_message(&self) -> String {
        format!("{}/{} charge(s) done", self.finished_sources, self.sources)
    }

    fn apply(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                self.bar.reset();
                self.bar.set_length(0);
                self.bar.set_style(spinner_style());
                self.bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                self.bar.set_message(name);
            }
            Progress::PhaseFinish => {
                self.bar.disable_steady_tick();
                self.bar.finish_with_message("✓ Done");
            }
            Progress::TracingStart {
                sources,
                lines_per_source,
            } => {
                self.sources = sources;
                self.lines_per_source = lines_per_source;
                self.traced_per_charge.clear();
                self.finished_sources = 0;

                self.bar.disable_steady_tick();
                self.bar.reset();
                self.bar.set_length((sources * lines_per_source) as u64);
                self.bar.set_style(bar_style());
                self.bar.set_message(self.sources_message());
            }
            Progress::LineTraced { charge_index, .. } => {
                let traced = self.traced_per_charge.entry(charge_index).or_insert(0);
                *traced += 1;
                if *traced == self.lines_per_source {
                    self.finished_sources += 1;
                    self.bar.set_message(self.sources_message());
                }
                self.bar.inc(1);
            }
            Progress::TracingFinish => {
                if let Some(total) = self.bar.length() {
                    self.bar.set_position(total);
                }
                self.bar.finish();
            }
            Progress::Message(msg) if self.bar.is_finished() => self.bar.set_message(msg),
            Progress::Message(msg) => self.bar.println(format!("  {}", msg)),
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .expect("Failed to create spinner style template")
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("Field lines [{bar:40.cyan/blue}] {pos}/{len} {msg} ({elapsed})")
        .expect("Failed to create bar style template")
        .progress_chars("##-")
}

/// Renders core progress events on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    view: Arc<Mutex<TraceView>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self {
            view: Arc::new(Mutex::new(TraceView::hidden())),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let view = self.view.clone();
        Box::new(move |progress: Progress| match view.lock() {
            Ok(mut view) => view.apply(progress),
            Err(_) => warn!("Progress view mutex was poisoned. Cannot update progress."),
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(charge_index: usize, seed_index: usize) -> Progress {
        Progress::LineTraced {
            charge_index,
            seed_index,
        }
    }

    #[test]
    fn bar_counts_lines_and_finished_charges() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Tracing" });
        assert_eq!(handler.view.lock().unwrap().bar.message(), "Tracing");

        callback(Progress::TracingStart {
            sources: 2,
            lines_per_source: 2,
        });
        {
            let view = handler.view.lock().unwrap();
            assert_eq!(view.bar.length(), Some(4));
            assert_eq!(view.bar.message(), "0/2 charge(s) done");
        }

        // Lines of different charges interleave.
        callback(line(3, 0));
        callback(line(0, 1));
        callback(line(3, 1));
        {
            let view = handler.view.lock().unwrap();
            assert_eq!(view.bar.position(), 3);
            assert_eq!(view.bar.message(), "1/2 charge(s) done");
        }

        callback(line(0, 0));
        callback(Progress::TracingFinish);
        {
            let view = handler.view.lock().unwrap();
            assert!(view.bar.is_finished());
            assert_eq!(view.bar.message(), "2/2 charge(s) done");
        }

        callback(Progress::PhaseFinish);
        assert_eq!(handler.view.lock().unwrap().bar.message(), "✓ Done");
    }

    #[test]
    fn a_new_trace_starts_from_zero() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::TracingStart {
            sources: 1,
            lines_per_source: 1,
        });
        callback(line(0, 0));
        callback(Progress::TracingStart {
            sources: 1,
            lines_per_source: 3,
        });

        let view = handler.view.lock().unwrap();
        assert_eq!(view.bar.position(), 0);
        assert_eq!(view.finished_sources, 0);
        assert!(view.traced_per_charge.is_empty());
    }

    #[test]
    fn callback_can_run_on_another_thread() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        std::thread::spawn(move || {
            callback(Progress::TracingStart {
                sources: 1,
                lines_per_source: 1,
            });
            callback(line(0, 0));
            callback(Progress::TracingFinish);
        })
        .join()
        .unwrap();

        let view = handler.view.lock().unwrap();
        assert!(view.bar.is_finished());
        assert_eq!(view.finished_sources, 1);
    }
}
