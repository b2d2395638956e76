use crate::core::models::charge_set::ChargeSet;
use crate::core::models::streamline::Streamline;
use crate::engine::config::TraceConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tracer::StreamlineTracer;
use tracing::{info, instrument};

/// Field lines of one charge configuration together with their sample grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceResult {
    pub lines: Vec<Streamline>,
    /// λ values shared by every line; `lines[i].samples()[j]` sits at `lambdas[j]`.
    pub lambdas: Vec<f64>,
}

impl TraceResult {
    pub fn total_samples(&self) -> usize {
        self.lines.iter().map(Streamline::len).sum()
    }

    /// Lines seeded around the charge at `charge_index`.
    pub fn lines_of(&self, charge_index: usize) -> impl Iterator<Item = &Streamline> {
        self.lines
            .iter()
            .filter(move |line| line.charge_index == charge_index)
    }
}

#[instrument(skip_all, name = "trace_workflow")]
pub fn run(
    charges: &ChargeSet,
    config: &TraceConfig,
    reporter: &ProgressReporter,
) -> Result<TraceResult, EngineError> {
    reporter.report(Progress::PhaseStart { name: "Setup" });
    let tracer = StreamlineTracer::new(config.clone())?;
    let seeded = charges.positive().count();
    info!(
        charges = charges.len(),
        positive = seeded,
        lines_per_charge = config.nr_of_fieldlines,
        "Prepared field line trace."
    );
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Tracing" });
    let lines = tracer.trace_with_progress(charges, reporter)?;
    reporter.report(Progress::PhaseFinish);

    if lines.is_empty() {
        reporter.report(Progress::Message(
            "No positive charges; no field lines were traced.".to_string(),
        ));
    }
    info!(lines = lines.len(), "Trace workflow finished.");

    Ok(TraceResult {
        lines,
        lambdas: tracer.lambdas().to_vec(),
    })
}
