use crate::cli::TraceArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use fieldlines::core::io::table;
use fieldlines::core::models::charge_set::ChargeSet;
use fieldlines::engine::config::TraceConfig;
use fieldlines::engine::progress::ProgressReporter;
use fieldlines::workflows::{self, trace::TraceResult};
use tracing::{info, warn};

pub fn run(args: TraceArgs, show_progress: bool) -> Result<()> {
    let app = build_config(&args.input, &args.overrides)?;
    let result = trace(&app.charges, app.trace(), show_progress)?;

    if result.lines.is_empty() {
        warn!("No positive charges in the configuration; no field lines were traced.");
        println!("No positive charges; nothing to trace.");
    }

    if let Some(output) = &args.output {
        info!("Writing {} field line(s) to {:?}", result.lines.len(), output);
        table::write_streamlines_to_path(&result.lines, &result.lambdas, output).map_err(
            |e| CliError::FileWriting {
                path: output.clone(),
                source: e,
            },
        )?;
        println!(
            "✓ {} field line(s) written to: {}",
            result.lines.len(),
            output.display()
        );
    }

    println!("{}", summarize(&result, app.charges.len()));
    Ok(())
}

pub(crate) fn trace(
    charges: &ChargeSet,
    config: &TraceConfig,
    show_progress: bool,
) -> Result<TraceResult> {
    let progress_handler = CliProgressHandler::new();
    let reporter = if show_progress {
        ProgressReporter::with_callback(progress_handler.get_callback())
    } else {
        ProgressReporter::new()
    };

    info!("Invoking the core trace workflow...");
    Ok(workflows::trace::run(charges, config, &reporter)?)
}

/// One-line human-readable description of a trace.
pub(crate) fn summarize(result: &TraceResult, charge_count: usize) -> String {
    let total_length: f64 = result.lines.iter().map(|l| l.arc_length()).sum();
    let mean_length = if result.lines.is_empty() {
        0.0
    } else {
        total_length / result.lines.len() as f64
    };
    format!(
        "Charges: {}, field lines: {}, samples per line: {}, mean line length: {:.3}",
        charge_count,
        result.lines.len(),
        result.lambdas.len(),
        mean_length
    )
}
