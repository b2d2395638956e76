use crate::cli::ReplayArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use fieldlines::core::io::table;
use fieldlines::workflows::interactive::{InteractiveSession, Redraw};
use nalgebra::Point2;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GestureKind {
    Press,
    Motion,
    Release,
}

/// One pointer event. Omitting `x` or `y` models an event outside the plot.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Gesture {
    pub kind: GestureKind,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl Gesture {
    fn position(&self) -> Option<Point2<f64>> {
        Some(Point2::new(self.x?, self.y?))
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GestureScript {
    #[serde(default)]
    pub gestures: Vec<Gesture>,
}

impl GestureScript {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading gesture script from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e: toml::de::Error| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

/// Outcome of replaying a script.
#[derive(Debug)]
pub struct ReplayOutcome {
    /// Status text after each gesture, in order.
    pub statuses: Vec<String>,
    /// Number of preview redraws produced while dragging.
    pub previews: usize,
    /// Result of the last full redraw, or of a final redraw if the script
    /// never completed a gesture.
    pub last_full: Redraw,
}

/// Feeds every gesture to `session` in order.
pub fn replay(session: &mut InteractiveSession, script: &GestureScript) -> Result<ReplayOutcome> {
    let mut statuses = Vec::with_capacity(script.gestures.len());
    let mut previews = 0;
    let mut last_full = None;

    for (step, gesture) in script.gestures.iter().enumerate() {
        let position = gesture.position();
        let redraw = match gesture.kind {
            GestureKind::Press => {
                session.press(position);
                None
            }
            GestureKind::Motion => session.motion(position)?,
            GestureKind::Release => session.release(position)?,
        };

        match redraw {
            Some(r @ Redraw::Full(_)) => last_full = Some(r),
            Some(Redraw::Preview(_)) => previews += 1,
            None => {}
        }
        debug!(step, kind = ?gesture.kind, status = session.status(), "Replayed gesture.");
        statuses.push(session.status().to_string());
    }

    let last_full = match last_full {
        Some(redraw) => redraw,
        None => session.redraw()?,
    };
    Ok(ReplayOutcome {
        statuses,
        previews,
        last_full,
    })
}

pub fn run(args: ReplayArgs) -> Result<()> {
    let app = build_config(&args.input, &args.overrides)?;
    let script = GestureScript::from_file(&args.script)?;
    info!(
        gestures = script.gestures.len(),
        charges = app.charges.len(),
        "Replaying gesture script."
    );

    let mut session = InteractiveSession::new(app.charges, app.session)?;
    let outcome = replay(&mut session, &script)?;

    for (step, status) in outcome.statuses.iter().enumerate() {
        println!("[{:>3}] {}", step + 1, status);
    }
    println!(
        "Replayed {} gesture(s): {} preview redraw(s), {} charge(s), {} field line(s).",
        script.gestures.len(),
        outcome.previews,
        session.charges().len(),
        outcome.last_full.lines().len()
    );

    if let Some(output) = &args.output {
        table::write_streamlines_to_path(outcome.last_full.lines(), session.lambdas(), output)
            .map_err(|e| CliError::FileWriting {
                path: output.clone(),
                source: e,
            })?;
        println!("✓ Field lines written to: {}", output.display());
    }
    if let Some(output) = &args.charges_output {
        table::write_charges_to_path(session.charges(), output).map_err(|e| {
            CliError::FileWriting {
                path: output.clone(),
                source: e,
            }
        })?;
        println!("✓ Charges written to: {}", output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldlines::core::models::charge_set::ChargeSet;
    use fieldlines::engine::config::{SessionConfig, TraceConfig};

    fn session() -> InteractiveSession {
        let config = SessionConfig {
            trace: TraceConfig {
                nr_of_fieldlines: 4,
                points: 11,
                lambda_max: 1.0,
                ..TraceConfig::default()
            },
            preview_fieldlines: 1,
            ..SessionConfig::default()
        };
        InteractiveSession::new(ChargeSet::demo(), config).unwrap()
    }

    fn script(toml: &str) -> GestureScript {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn parses_gestures_with_and_without_positions() {
        let parsed = script(
            r#"
            [[gestures]]
            kind = "press"
            x = 1.0
            y = 2.0

            [[gestures]]
            kind = "release"
            "#,
        );
        assert_eq!(parsed.gestures.len(), 2);
        assert_eq!(parsed.gestures[0].position(), Some(Point2::new(1.0, 2.0)));
        assert_eq!(parsed.gestures[1].kind, GestureKind::Release);
        assert_eq!(parsed.gestures[1].position(), None);
    }

    #[test]
    fn unknown_gesture_kind_is_rejected() {
        let result: std::result::Result<GestureScript, _> =
            toml::from_str("[[gestures]]\nkind = \"scroll\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn replay_drag_then_add() {
        let mut session = session();
        let parsed = script(
            r#"
            [[gestures]]
            kind = "motion"
            x = 0.5
            y = 1.0

            [[gestures]]
            kind = "press"
            x = -1.0
            y = 0.0

            [[gestures]]
            kind = "motion"
            x = -2.0
            y = 0.0

            [[gestures]]
            kind = "motion"
            x = -2.5
            y = 0.0

            [[gestures]]
            kind = "release"
            x = -2.5
            y = 0.0

            [[gestures]]
            kind = "press"
            x = 3.0
            y = 3.0

            [[gestures]]
            kind = "motion"
            x = 5.0
            y = 3.0

            [[gestures]]
            kind = "release"
            x = 5.0
            y = 3.0
            "#,
        );

        let outcome = replay(&mut session, &parsed).unwrap();

        assert_eq!(outcome.previews, 2);
        assert_eq!(outcome.statuses[0], "x=0.50, y=1.00");
        assert_eq!(outcome.statuses[6], "x=5.00, y=3.00, q=2.00");
        assert_eq!(session.charges().len(), 5);
        assert_eq!(
            session.charges().get(1).unwrap().position,
            Point2::new(-2.5, 0.0)
        );
        // Three positive charges after the addition, four lines each.
        assert!(matches!(outcome.last_full, Redraw::Full(_)));
        assert_eq!(outcome.last_full.lines().len(), 12);
    }

    #[test]
    fn empty_script_still_produces_a_full_redraw() {
        let mut session = session();
        let outcome = replay(&mut session, &GestureScript::default()).unwrap();
        assert!(outcome.statuses.is_empty());
        assert_eq!(outcome.last_full.lines().len(), 8);
    }

    #[test]
    fn run_writes_lines_and_charges() {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("gestures.toml");
        std::fs::write(
            &script_path,
            "[[gestures]]\nkind = \"press\"\nx = 0.0\ny = 1.0\n\n[[gestures]]\nkind = \"release\"\nx = 0.0\ny = 1.0\n",
        )
        .unwrap();
        let lines_path = dir.path().join("lines.csv");
        let charges_path = dir.path().join("charges.csv");

        let args = ReplayArgs {
            script: script_path,
            input: Default::default(),
            overrides: crate::cli::TraceOverrides {
                lines: Some(2),
                points: Some(5),
                ..Default::default()
            },
            output: Some(lines_path.clone()),
            charges_output: Some(charges_path.clone()),
        };
        run(args).unwrap();

        let charges = table::read_charges_from_path(&charges_path).unwrap();
        assert_eq!(charges.len(), 3);
        let rows = std::fs::read_to_string(&lines_path).unwrap().lines().count();
        assert_eq!(rows, 1 + 2 * 2 * 5);
    }
}
