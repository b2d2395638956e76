use super::config::{IntegratorKind, TraceConfig};
use super::error::EngineError;
use super::integrator::Integrator;
use super::progress::{Progress, ProgressReporter};
use crate::core::field::evaluator::FieldEvaluator;
use crate::core::field::potentials::DEFAULT_EPSILON;
use crate::core::models::charge_set::ChargeSet;
use crate::core::models::streamline::Streamline;
use crate::core::utils::geometry::{linspace, seed_angle, seed_circle};
use nalgebra::Point2;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Starting point of one field line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub charge_index: usize,
    pub seed_index: usize,
    pub angle: f64,
    pub position: Point2<f64>,
}

/// Integrates field lines of a charge set with a fixed set of parameters.
///
/// The tracer holds no reference to any charge set; each call to
/// [`trace`](Self::trace) reads the charges it is given and nothing else.
#[derive(Debug, Clone)]
pub struct StreamlineTracer {
    config: TraceConfig,
    lambdas: Vec<f64>,
}

impl StreamlineTracer {
    /// Creates a tracer after validating `config`.
    pub fn new(config: TraceConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let lambdas = linspace(0.0, config.lambda_max, config.points);
        Ok(Self { config, lambdas })
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// The λ values at which every line is sampled.
    pub fn lambdas(&self) -> &[f64] {
        &self.lambdas
    }

    /// Seed points for all positive charges.
    ///
    /// Ordered charge-major (charge-set order), then by increasing seed
    /// index. Negative and neutral charges contribute nothing.
    pub fn seeds(&self, charges: &ChargeSet) -> Vec<Seed> {
        let n = self.config.nr_of_fieldlines;
        charges
            .positive()
            .flat_map(|(charge_index, charge)| {
                seed_circle(&charge.position, self.config.start_radius, n)
                    .into_iter()
                    .enumerate()
                    .map(move |(seed_index, position)| Seed {
                        charge_index,
                        seed_index,
                        angle: seed_angle(seed_index, n),
                        position,
                    })
            })
            .collect()
    }

    pub fn trace(&self, charges: &ChargeSet) -> Result<Vec<Streamline>, EngineError> {
        self.trace_with_progress(charges, &ProgressReporter::new())
    }

    /// Traces one line per seed, reporting each finished line.
    ///
    /// The result is identical whether or not the lines are integrated in
    /// parallel.
    #[instrument(skip_all, name = "streamline_tracer")]
    pub fn trace_with_progress(
        &self,
        charges: &ChargeSet,
        reporter: &ProgressReporter,
    ) -> Result<Vec<Streamline>, EngineError> {
        let seeds = self.seeds(charges);
        if seeds.is_empty() {
            debug!(
                charges = charges.len(),
                "No positive charges to seed from; nothing to trace."
            );
            return Ok(Vec::new());
        }

        info!(
            lines = seeds.len(),
            points = self.config.points,
            integrator = self.config.integrator.name(),
            "Tracing field lines."
        );
        reporter.report(Progress::TracingStart {
            sources: charges.positive().count(),
            lines_per_source: self.config.nr_of_fieldlines,
        });

        let evaluator = FieldEvaluator::with_epsilon(charges, self.config.epsilon);

        #[cfg(not(feature = "parallel"))]
        let iterator = seeds.iter().enumerate();

        #[cfg(feature = "parallel")]
        let iterator = seeds.par_iter().enumerate();

        let lines = iterator
            .map(|(line, seed)| {
                let result = self.trace_seed(&evaluator, seed, line);
                reporter.report(Progress::LineTraced {
                    charge_index: seed.charge_index,
                    seed_index: seed.seed_index,
                });
                result
            })
            .collect::<Result<Vec<_>, _>>();

        reporter.report(Progress::TracingFinish);
        lines
    }

    fn trace_seed(
        &self,
        evaluator: &FieldEvaluator,
        seed: &Seed,
        line: usize,
    ) -> Result<Streamline, EngineError> {
        let samples = self
            .config
            .integrator
            .integrate(
                |p: &Point2<f64>| evaluator.stabilized_field(p),
                seed.position,
                &self.lambdas,
            )
            .map_err(|e| EngineError::Integration {
                line,
                charge_index: seed.charge_index,
                seed_index: seed.seed_index,
                reason: e.to_string(),
            })?;
        Ok(Streamline::new(
            seed.charge_index,
            seed.seed_index,
            seed.angle,
            samples,
        ))
    }
}

/// Traces field lines with the default ε and integrator.
///
/// For each positive charge, `nr_of_fieldlines` lines start on a circle of
/// radius `start_radius` and are sampled at `points` equally spaced λ values
/// over `[0, lambda_max]`. An empty result means there was nothing to seed.
pub fn trace_field_lines(
    charges: &ChargeSet,
    nr_of_fieldlines: usize,
    start_radius: f64,
    lambda_max: f64,
    points: usize,
) -> Result<Vec<Streamline>, EngineError> {
    let config = TraceConfig {
        nr_of_fieldlines,
        start_radius,
        lambda_max,
        points,
        epsilon: DEFAULT_EPSILON,
        integrator: IntegratorKind::default(),
    };
    StreamlineTracer::new(config)?.trace(charges)
}
