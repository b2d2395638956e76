use crate::utils::parser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "fieldlines - Trace and explore electric field lines of 2D point-charge configurations.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to trace field lines in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trace the field lines of a charge configuration and write them as CSV.
    Trace(TraceArgs),
    /// Evaluate the electric field and potential at a single point.
    Field(FieldArgs),
    /// Replay a scripted sequence of pointer gestures on an interactive session.
    Replay(ReplayArgs),
}

/// Where the charges and session settings come from.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Session file in TOML format (charges, tracing, integrator and session sections).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// CSV file with a `magnitude,x,y` header. Takes precedence over charges in the config file.
    #[arg(long, value_name = "PATH")]
    pub charges: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S tracing.points=401
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Direct overrides of the trace parameters.
#[derive(Args, Debug, Clone, Default)]
pub struct TraceOverrides {
    /// Number of field lines seeded around each positive charge.
    #[arg(short = 'n', long, value_name = "INT")]
    pub lines: Option<usize>,

    /// Radius of the seed circle around each positive charge.
    #[arg(long, value_name = "FLOAT")]
    pub start_radius: Option<f64>,

    /// Upper end of the integration parameter range.
    #[arg(long, value_name = "FLOAT")]
    pub lambda_max: Option<f64>,

    /// Number of samples per field line.
    #[arg(short, long, value_name = "INT")]
    pub points: Option<usize>,

    /// Integration scheme.
    #[arg(long, value_enum, value_name = "KIND")]
    pub integrator: Option<IntegratorArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratorArg {
    /// Fixed-step fourth-order Runge-Kutta.
    Rk4,
    /// Adaptive Dormand-Prince 5(4).
    DormandPrince,
}

/// Arguments for the `trace` subcommand.
#[derive(Args, Debug)]
pub struct TraceArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub overrides: TraceOverrides,

    /// Output CSV with one row per sample. Only a summary is printed when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `field` subcommand.
#[derive(Args, Debug)]
pub struct FieldArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Evaluation point, written as `x,y`.
    #[arg(
        long,
        required = true,
        value_name = "X,Y",
        value_parser = parser::parse_point,
        allow_hyphen_values = true
    )]
    pub at: (f64, f64),
}

/// Arguments for the `replay` subcommand.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Gesture script in TOML format (`[[gestures]]` with `kind`, `x`, `y`).
    #[arg(required = true, value_name = "SCRIPT")]
    pub script: PathBuf,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub overrides: TraceOverrides,

    /// Write the field lines of the final redraw to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write the edited charge set to this CSV file.
    #[arg(long, value_name = "PATH")]
    pub charges_output: Option<PathBuf>,
}
