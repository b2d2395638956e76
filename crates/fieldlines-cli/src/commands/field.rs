use crate::cli::{FieldArgs, TraceOverrides};
use crate::config::build_config;
use crate::error::Result;
use fieldlines::core::field::evaluator::{FieldError, FieldEvaluator};
use fieldlines::core::models::charge_set::ChargeSet;
use nalgebra::{Point2, Vector2};
use std::fmt;
use tracing::info;

/// Field quantities at a single point.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldReport {
    pub position: Point2<f64>,
    pub field: std::result::Result<Vector2<f64>, FieldError>,
    pub stabilized: Vector2<f64>,
    pub potential: std::result::Result<f64, FieldError>,
}

impl FieldReport {
    pub fn evaluate(charges: &ChargeSet, epsilon: f64, position: Point2<f64>) -> Self {
        let evaluator = FieldEvaluator::with_epsilon(charges, epsilon);
        Self {
            position,
            field: evaluator.field(&position),
            stabilized: evaluator.stabilized_field(&position),
            potential: evaluator.potential(&position),
        }
    }
}

impl fmt::Display for FieldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "At ({:.4}, {:.4}):", self.position.x, self.position.y)?;
        match &self.field {
            Ok(e) => writeln!(
                f,
                "  E          = ({:.6e}, {:.6e})  |E| = {:.6e}",
                e.x,
                e.y,
                e.norm()
            )?,
            Err(err) => writeln!(f, "  E          = undefined ({})", err)?,
        }
        writeln!(
            f,
            "  E (scaled) = ({:.6e}, {:.6e})  |E| = {:.6e}",
            self.stabilized.x,
            self.stabilized.y,
            self.stabilized.norm()
        )?;
        match &self.potential {
            Ok(v) => write!(f, "  V          = {:.6e}", v),
            Err(err) => write!(f, "  V          = undefined ({})", err),
        }
    }
}

pub fn run(args: FieldArgs) -> Result<()> {
    let app = build_config(&args.input, &TraceOverrides::default())?;
    let (x, y) = args.at;
    info!(x, y, charges = app.charges.len(), "Evaluating field.");

    let report = FieldReport::evaluate(&app.charges, app.trace().epsilon, Point2::new(x, y));
    println!("{}", report);
    Ok(())
}
