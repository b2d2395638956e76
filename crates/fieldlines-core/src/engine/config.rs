use crate::core::field::potentials::DEFAULT_EPSILON;
use thiserror::Error;

pub const DEFAULT_FIELDLINES: usize = 32;
pub const DEFAULT_START_RADIUS: f64 = 0.2;
pub const DEFAULT_LAMBDA_MAX: f64 = 10.0;
pub const DEFAULT_POINTS: usize = 801;
pub const DEFAULT_RK4_SUBSTEPS: usize = 4;
pub const DEFAULT_PICK_RADIUS: f64 = 0.2;
pub const DEFAULT_PREVIEW_FIELDLINES: usize = 8;
pub const DEFAULT_RTOL: f64 = 1e-6;
pub const DEFAULT_ATOL: f64 = 1e-9;
pub const DEFAULT_MAX_STEPS: usize = 10_000;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Step policy used to integrate a field line between sample points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntegratorKind {
    /// Classic fourth-order Runge–Kutta with `substeps` equal steps per
    /// sample interval.
    Rk4 { substeps: usize },
    /// Adaptive Dormand–Prince 5(4) with mixed error tolerance
    /// `atol + rtol·|y|`; at most `max_steps` accepted or rejected steps per
    /// sample interval.
    DormandPrince {
        rtol: f64,
        atol: f64,
        max_steps: usize,
    },
}

impl Default for IntegratorKind {
    fn default() -> Self {
        IntegratorKind::Rk4 {
            substeps: DEFAULT_RK4_SUBSTEPS,
        }
    }
}

impl IntegratorKind {
    pub fn dormand_prince() -> Self {
        IntegratorKind::DormandPrince {
            rtol: DEFAULT_RTOL,
            atol: DEFAULT_ATOL,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IntegratorKind::Rk4 { .. } => "rk4",
            IntegratorKind::DormandPrince { .. } => "dormand-prince",
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            IntegratorKind::Rk4 { substeps } => {
                if substeps == 0 {
                    return Err(ConfigError::InvalidParameter {
                        name: "integrator.substeps",
                        reason: "must be at least 1".to_string(),
                    });
                }
            }
            IntegratorKind::DormandPrince {
                rtol,
                atol,
                max_steps,
            } => {
                if !(rtol.is_finite() && rtol > 0.0) {
                    return Err(ConfigError::InvalidParameter {
                        name: "integrator.rtol",
                        reason: format!("must be finite and positive, got {}", rtol),
                    });
                }
                if !(atol.is_finite() && atol > 0.0) {
                    return Err(ConfigError::InvalidParameter {
                        name: "integrator.atol",
                        reason: format!("must be finite and positive, got {}", atol),
                    });
                }
                if max_steps == 0 {
                    return Err(ConfigError::InvalidParameter {
                        name: "integrator.max-steps",
                        reason: "must be at least 1".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Parameters of a single field-line trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceConfig {
    /// Number of lines seeded around each positive charge.
    pub nr_of_fieldlines: usize,
    /// Radius of the seed circle around each positive charge.
    pub start_radius: f64,
    /// Upper end of the λ range; lines are sampled over `[0, lambda_max]`.
    pub lambda_max: f64,
    /// Number of samples per line, including both ends of the λ range.
    pub points: usize,
    /// Softening term of the stabilized field.
    pub epsilon: f64,
    pub integrator: IntegratorKind,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            nr_of_fieldlines: DEFAULT_FIELDLINES,
            start_radius: DEFAULT_START_RADIUS,
            lambda_max: DEFAULT_LAMBDA_MAX,
            points: DEFAULT_POINTS,
            epsilon: DEFAULT_EPSILON,
            integrator: IntegratorKind::default(),
        }
    }
}

impl TraceConfig {
    /// Checks every parameter, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.start_radius.is_finite() && self.start_radius >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "start_radius",
                reason: format!("must be finite and non-negative, got {}", self.start_radius),
            });
        }
        if !self.lambda_max.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "lambda_max",
                reason: format!("must be finite, got {}", self.lambda_max),
            });
        }
        if self.points == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "points",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "epsilon",
                reason: format!("must be finite and positive, got {}", self.epsilon),
            });
        }
        self.integrator.validate()
    }

    /// Same parameters with a different number of lines per charge.
    ///
    /// Used for cheap previews while a charge is being dragged: seed radius,
    /// λ range and sample count stay fixed.
    pub fn with_fieldlines(&self, nr_of_fieldlines: usize) -> Self {
        Self {
            nr_of_fieldlines,
            ..self.clone()
        }
    }
}

#[derive(Default)]
pub struct TraceConfigBuilder {
    nr_of_fieldlines: Option<usize>,
    start_radius: Option<f64>,
    lambda_max: Option<f64>,
    points: Option<usize>,
    epsilon: Option<f64>,
    integrator: Option<IntegratorKind>,
}

impl TraceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nr_of_fieldlines(mut self, n: usize) -> Self {
        self.nr_of_fieldlines = Some(n);
        self
    }
    pub fn start_radius(mut self, radius: f64) -> Self {
        self.start_radius = Some(radius);
        self
    }
    pub fn lambda_max(mut self, lambda_max: f64) -> Self {
        self.lambda_max = Some(lambda_max);
        self
    }
    pub fn points(mut self, points: usize) -> Self {
        self.points = Some(points);
        self
    }
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }
    pub fn integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = Some(integrator);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// Line count, seed radius, λ range and sample count are required;
    /// `epsilon` and the integrator fall back to their defaults.
    pub fn build(self) -> Result<TraceConfig, ConfigError> {
        let config = TraceConfig {
            nr_of_fieldlines: self
                .nr_of_fieldlines
                .ok_or(ConfigError::MissingParameter("nr_of_fieldlines"))?,
            start_radius: self
                .start_radius
                .ok_or(ConfigError::MissingParameter("start_radius"))?,
            lambda_max: self
                .lambda_max
                .ok_or(ConfigError::MissingParameter("lambda_max"))?,
            points: self.points.ok_or(ConfigError::MissingParameter("points"))?,
            epsilon: self.epsilon.unwrap_or(DEFAULT_EPSILON),
            integrator: self.integrator.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Settings of an interactive (pointer-driven) session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Full-quality trace parameters, used after every completed gesture.
    pub trace: TraceConfig,
    /// Line count per charge while a charge is being dragged.
    pub preview_fieldlines: usize,
    /// Maximum distance at which a press picks up an existing charge.
    pub pick_radius: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            trace: TraceConfig::default(),
            preview_fieldlines: DEFAULT_PREVIEW_FIELDLINES,
            pick_radius: DEFAULT_PICK_RADIUS,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pick_radius.is_finite() && self.pick_radius >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "pick_radius",
                reason: format!("must be finite and non-negative, got {}", self.pick_radius),
            });
        }
        self.trace.validate()
    }

    pub fn preview_trace(&self) -> TraceConfig {
        self.trace.with_fieldlines(self.preview_fieldlines)
    }
}
