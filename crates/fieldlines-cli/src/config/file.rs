use crate::error::{CliError, Result};
use fieldlines::core::models::charge::Charge;
use fieldlines::core::models::charge_set::ChargeSet;
use nalgebra::Point2;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A session file as written by the user. Every field is optional; missing
/// values fall back to the library defaults.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub charges: Option<Vec<FileCharge>>,
    pub tracing: Option<FileTracingConfig>,
    pub integrator: Option<FileIntegratorConfig>,
    pub session: Option<FileSessionConfig>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileCharge {
    pub magnitude: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileTracingConfig {
    pub fieldlines: Option<usize>,
    pub start_radius: Option<f64>,
    pub lambda_max: Option<f64>,
    pub points: Option<usize>,
    pub epsilon: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileIntegratorKind {
    Rk4,
    DormandPrince,
}

impl std::str::FromStr for FileIntegratorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "rk4" => Ok(Self::Rk4),
            "dormand-prince" => Ok(Self::DormandPrince),
            other => Err(format!(
                "unknown integrator '{}', expected 'rk4' or 'dormand-prince'",
                other
            )),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileIntegratorConfig {
    pub kind: Option<FileIntegratorKind>,
    pub substeps: Option<usize>,
    pub rtol: Option<f64>,
    pub atol: Option<f64>,
    pub max_steps: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSessionConfig {
    pub pick_radius: Option<f64>,
    pub preview_fieldlines: Option<usize>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading session configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Charges listed in `[[charges]]`, in file order.
    ///
    /// Returns `Ok(None)` when the file has no `[[charges]]` table and a
    /// [`CliError::Config`] naming the 1-based entry when any magnitude or
    /// coordinate is not finite.
    pub fn charge_set(&self) -> Result<Option<ChargeSet>> {
        let Some(charges) = &self.charges else {
            return Ok(None);
        };
        charges
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if c.magnitude.is_finite() && c.x.is_finite() && c.y.is_finite() {
                    Ok(Charge::new(c.magnitude, Point2::new(c.x, c.y)))
                } else {
                    Err(CliError::Config(format!(
                        "Charge entry {} has a non-finite value (magnitude = {}, x = {}, y = {})",
                        i + 1,
                        c.magnitude,
                        c.x,
                        c.y
                    )))
                }
            })
            .collect::<Result<ChargeSet>>()
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_session_file() {
        let config = FileConfig::from_toml(
            r#"
            [[charges]]
            magnitude = 1.0
            x = 1.0
            y = 0.0

            [[charges]]
            magnitude = -2.0
            x = -1.0
            y = 0.5

            [tracing]
            fieldlines = 16
            start-radius = 0.1
            lambda-max = 20.0
            points = 401
            epsilon = 0.01

            [integrator]
            kind = "dormand-prince"
            rtol = 1e-8
            max-steps = 500

            [session]
            pick-radius = 0.3
            preview-fieldlines = 4
            "#,
        )
        .unwrap();

        let tracing = config.tracing.as_ref().unwrap();
        assert_eq!(tracing.fieldlines, Some(16));
        assert_eq!(tracing.lambda_max, Some(20.0));
        let integrator = config.integrator.as_ref().unwrap();
        assert_eq!(integrator.kind, Some(FileIntegratorKind::DormandPrince));
        assert_eq!(integrator.max_steps, Some(500));
        assert!(integrator.atol.is_none());
        assert_eq!(config.session.as_ref().unwrap().pick_radius, Some(0.3));

        let charges = config.charge_set().unwrap().unwrap();
        assert_eq!(
            charges.list(),
            vec![
                (1.0, Point2::new(1.0, 0.0)),
                (-2.0, Point2::new(-1.0, 0.5))
            ]
        );
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.charge_set().unwrap().is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("[tracing]\nlines = 3\n").is_err());
        assert!(FileConfig::from_toml("[plot]\nxlim = 5\n").is_err());
    }

    #[test]
    fn non_finite_charges_are_rejected() {
        let config = FileConfig::from_toml(
            "[[charges]]\nmagnitude = 1.0\nx = 0.0\ny = 0.0\n\n\
             [[charges]]\nmagnitude = nan\nx = inf\ny = 0.0\n",
        )
        .unwrap();
        let result = config.charge_set();
        assert!(matches!(result, Err(CliError::Config(ref msg)) if msg.contains("entry 2")));
    }

    #[test]
    fn unknown_integrator_kind_is_rejected() {
        assert!(FileConfig::from_toml("[integrator]\nkind = \"euler\"\n").is_err());
        assert!("euler".parse::<FileIntegratorKind>().is_err());
        assert_eq!(
            "rk4".parse::<FileIntegratorKind>(),
            Ok(FileIntegratorKind::Rk4)
        );
    }

    #[test]
    fn from_file_reports_the_offending_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[tracing\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { path: p, .. }) if p == path));
    }
}
