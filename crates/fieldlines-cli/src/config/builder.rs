use super::file::{FileConfig, FileIntegratorConfig, FileIntegratorKind};
use super::models::AppConfig;
use crate::cli::{InputArgs, IntegratorArg, TraceOverrides};
use crate::error::{CliError, Result};
use crate::utils::parser;
use fieldlines::core::field::potentials::DEFAULT_EPSILON;
use fieldlines::core::io::table;
use fieldlines::core::models::charge_set::ChargeSet;
use fieldlines::engine::config::{self as core_config, IntegratorKind, SessionConfig};
use std::str::FromStr;
use tracing::{debug, info};

/// Resolves the final configuration.
///
/// Precedence, highest first: explicit CLI flags, `-S key=value` sets, the
/// session file, library defaults. Charges come from `--charges` if given,
/// otherwise from the session file, otherwise the built-in demo set.
pub fn build_config(input: &InputArgs, overrides: &TraceOverrides) -> Result<AppConfig> {
    let file_config = match &input.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let file_config = apply_set_values(file_config, &input.set_values)?;

    let charges = resolve_charges(input, &file_config)?;

    let tracing_file = file_config.tracing.clone().unwrap_or_default();
    let integrator = merge_integrator(
        overrides.integrator,
        file_config.integrator.clone().unwrap_or_default(),
    );

    let trace = core_config::TraceConfigBuilder::new()
        .nr_of_fieldlines(
            overrides
                .lines
                .or(tracing_file.fieldlines)
                .unwrap_or(core_config::DEFAULT_FIELDLINES),
        )
        .start_radius(
            overrides
                .start_radius
                .or(tracing_file.start_radius)
                .unwrap_or(core_config::DEFAULT_START_RADIUS),
        )
        .lambda_max(
            overrides
                .lambda_max
                .or(tracing_file.lambda_max)
                .unwrap_or(core_config::DEFAULT_LAMBDA_MAX),
        )
        .points(
            overrides
                .points
                .or(tracing_file.points)
                .unwrap_or(core_config::DEFAULT_POINTS),
        )
        .epsilon(tracing_file.epsilon.unwrap_or(DEFAULT_EPSILON))
        .integrator(integrator)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let session_file = file_config.session.unwrap_or_default();
    let session = SessionConfig {
        trace,
        preview_fieldlines: session_file
            .preview_fieldlines
            .unwrap_or(core_config::DEFAULT_PREVIEW_FIELDLINES),
        pick_radius: session_file
            .pick_radius
            .unwrap_or(core_config::DEFAULT_PICK_RADIUS),
    };
    session
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    debug!("Resolved session configuration: {:?}", session);
    Ok(AppConfig { charges, session })
}

fn resolve_charges(input: &InputArgs, file_config: &FileConfig) -> Result<ChargeSet> {
    if let Some(path) = &input.charges {
        info!("Loading charges from {:?}", path);
        return table::read_charges_from_path(path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        });
    }
    if let Some(charges) = file_config.charge_set()? {
        return Ok(charges);
    }
    info!("No charges given; using the demo configuration.");
    Ok(ChargeSet::demo())
}

fn merge_integrator(cli_kind: Option<IntegratorArg>, file: FileIntegratorConfig) -> IntegratorKind {
    let kind = match cli_kind {
        Some(IntegratorArg::Rk4) => FileIntegratorKind::Rk4,
        Some(IntegratorArg::DormandPrince) => FileIntegratorKind::DormandPrince,
        None => file.kind.unwrap_or(FileIntegratorKind::Rk4),
    };

    match kind {
        FileIntegratorKind::Rk4 => IntegratorKind::Rk4 {
            substeps: file.substeps.unwrap_or(core_config::DEFAULT_RK4_SUBSTEPS),
        },
        FileIntegratorKind::DormandPrince => IntegratorKind::DormandPrince {
            rtol: file.rtol.unwrap_or(core_config::DEFAULT_RTOL),
            atol: file.atol.unwrap_or(core_config::DEFAULT_ATOL),
            max_steps: file.max_steps.unwrap_or(core_config::DEFAULT_MAX_STEPS),
        },
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "tracing.fieldlines" => {
                config.tracing.get_or_insert_with(Default::default).fieldlines =
                    Some(parse_value(key, value, "integer")?);
            }
            "tracing.start-radius" => {
                config.tracing.get_or_insert_with(Default::default).start_radius =
                    Some(parse_value(key, value, "float")?);
            }
            "tracing.lambda-max" => {
                config.tracing.get_or_insert_with(Default::default).lambda_max =
                    Some(parse_value(key, value, "float")?);
            }
            "tracing.points" => {
                config.tracing.get_or_insert_with(Default::default).points =
                    Some(parse_value(key, value, "integer")?);
            }
            "tracing.epsilon" => {
                config.tracing.get_or_insert_with(Default::default).epsilon =
                    Some(parse_value(key, value, "float")?);
            }
            "integrator.kind" => {
                let kind = value
                    .parse::<FileIntegratorKind>()
                    .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))?;
                config.integrator.get_or_insert_with(Default::default).kind = Some(kind);
            }
            "integrator.substeps" => {
                config.integrator.get_or_insert_with(Default::default).substeps =
                    Some(parse_value(key, value, "integer")?);
            }
            "integrator.rtol" => {
                config.integrator.get_or_insert_with(Default::default).rtol =
                    Some(parse_value(key, value, "float")?);
            }
            "integrator.atol" => {
                config.integrator.get_or_insert_with(Default::default).atol =
                    Some(parse_value(key, value, "float")?);
            }
            "integrator.max-steps" => {
                config.integrator.get_or_insert_with(Default::default).max_steps =
                    Some(parse_value(key, value, "integer")?);
            }
            "session.pick-radius" => {
                config.session.get_or_insert_with(Default::default).pick_radius =
                    Some(parse_value(key, value, "float")?);
            }
            "session.preview-fieldlines" => {
                config
                    .session
                    .get_or_insert_with(Default::default)
                    .preview_fieldlines = Some(parse_value(key, value, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
