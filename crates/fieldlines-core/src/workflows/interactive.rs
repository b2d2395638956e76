use crate::core::models::charge_set::ChargeSet;
use crate::core::models::streamline::Streamline;
use crate::engine::config::SessionConfig;
use crate::engine::error::EngineError;
use crate::engine::tracer::StreamlineTracer;
use nalgebra::Point2;
use tracing::{debug, info};

const IDLE_STATUS: &str = "Waiting for mouse move or mouse click";

/// What a front end should draw after a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum Redraw {
    /// Reduced line set while a charge is dragged.
    Preview(Vec<Streamline>),
    /// Full-quality line set after a gesture completes.
    Full(Vec<Streamline>),
}

impl Redraw {
    pub fn lines(&self) -> &[Streamline] {
        match self {
            Redraw::Preview(lines) | Redraw::Full(lines) => lines,
        }
    }

    pub fn is_preview(&self) -> bool {
        matches!(self, Redraw::Preview(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    press: Point2<f64>,
    picked: Option<usize>,
    dragging: bool,
    pending_magnitude: f64,
}

/// Pointer-driven editing of a charge set.
///
/// A press near an existing charge picks it up: dragging moves it, releasing
/// without a drag deletes it. A press on empty space starts an addition whose
/// magnitude follows the horizontal pointer offset, rounded to an integer;
/// releasing adds the charge at the press position unless the magnitude is
/// zero.
///
/// Positions are `Option`s because pointer events outside the plot carry no
/// coordinates; such events are ignored.
pub struct InteractiveSession {
    charges: ChargeSet,
    config: SessionConfig,
    full: StreamlineTracer,
    preview: StreamlineTracer,
    gesture: Option<Gesture>,
    status: String,
}

impl InteractiveSession {
    pub fn new(charges: ChargeSet, config: SessionConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let full = StreamlineTracer::new(config.trace.clone())?;
        let preview = StreamlineTracer::new(config.preview_trace())?;
        Ok(Self {
            charges,
            config,
            full,
            preview,
            gesture: None,
            status: IDLE_STATUS.to_string(),
        })
    }

    pub fn charges(&self) -> &ChargeSet {
        &self.charges
    }

    pub fn into_charges(self) -> ChargeSet {
        self.charges
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Sample grid of the full-quality lines.
    pub fn lambdas(&self) -> &[f64] {
        self.full.lambdas()
    }

    /// Latest status-bar text.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Full-quality lines for the current charges.
    pub fn redraw(&self) -> Result<Redraw, EngineError> {
        Ok(Redraw::Full(self.full.trace(&self.charges)?))
    }

    pub fn press(&mut self, position: Option<Point2<f64>>) {
        let Some(press) = position else {
            return;
        };
        let picked = self.charges.closest(&press, self.config.pick_radius);
        debug!(x = press.x, y = press.y, ?picked, "Pointer pressed.");
        self.gesture = Some(Gesture {
            press,
            picked,
            dragging: false,
            pending_magnitude: 0.0,
        });
    }

    pub fn motion(&mut self, position: Option<Point2<f64>>) -> Result<Option<Redraw>, EngineError> {
        let Some(pos) = position else {
            return Ok(None);
        };
        let coords = format_position(&pos);

        let Some(gesture) = self.gesture.as_mut() else {
            self.status = coords;
            return Ok(None);
        };

        match gesture.picked {
            Some(index) => {
                gesture.dragging = true;
                self.charges.set_position(index, pos);
                self.status = coords;
                let lines = self.preview.trace(&self.charges)?;
                Ok(Some(Redraw::Preview(lines)))
            }
            None => {
                gesture.pending_magnitude = (pos.x - gesture.press.x).round_ties_even();
                self.status = format!("{}, q={:.2}", coords, gesture.pending_magnitude);
                Ok(None)
            }
        }
    }

    /// Completes the current gesture and retraces at full quality.
    ///
    /// Returns `None` when there is no gesture to complete or the release
    /// happened outside the plot.
    pub fn release(
        &mut self,
        position: Option<Point2<f64>>,
    ) -> Result<Option<Redraw>, EngineError> {
        let Some(pos) = position else {
            return Ok(None);
        };
        let Some(gesture) = self.gesture.take() else {
            return Ok(None);
        };

        match gesture.picked {
            Some(index) if gesture.dragging => {
                self.charges.set_position(index, pos);
                info!(index, x = pos.x, y = pos.y, "Moved charge.");
            }
            Some(index) => {
                if let Some(removed) = self.charges.delete(index) {
                    info!(index, magnitude = removed.magnitude, "Deleted charge.");
                }
            }
            None if gesture.pending_magnitude != 0.0 => {
                self.charges.add(gesture.pending_magnitude, gesture.press);
                info!(
                    magnitude = gesture.pending_magnitude,
                    x = gesture.press.x,
                    y = gesture.press.y,
                    "Added charge."
                );
            }
            None => {}
        }

        self.status = format_position(&pos);
        self.redraw().map(Some)
    }
}

fn format_position(pos: &Point2<f64>) -> String {
    format!("x={:.2}, y={:.2}", pos.x, pos.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::TraceConfig;

    fn fast_config() -> SessionConfig {
        SessionConfig {
            trace: TraceConfig {
                nr_of_fieldlines: 8,
                points: 21,
                lambda_max: 2.0,
                ..TraceConfig::default()
            },
            preview_fieldlines: 2,
            ..SessionConfig::default()
        }
    }

    fn demo_session() -> InteractiveSession {
        InteractiveSession::new(ChargeSet::demo(), fast_config()).unwrap()
    }

    fn at(x: f64, y: f64) -> Option<Point2<f64>> {
        Some(Point2::new(x, y))
    }

    #[test]
    fn new_session_starts_idle() {
        let session = demo_session();
        assert_eq!(session.status(), IDLE_STATUS);
        assert!(!session.is_gesture_active());
        assert_eq!(session.charges().len(), 4);
        assert_eq!(session.lambdas().len(), 21);
    }

    #[test]
    fn new_session_rejects_invalid_config() {
        let config = SessionConfig {
            pick_radius: f64::NAN,
            ..SessionConfig::default()
        };
        assert!(InteractiveSession::new(ChargeSet::new(), config).is_err());
    }

    #[test]
    fn motion_without_press_only_updates_status() {
        let mut session = demo_session();
        let redraw = session.motion(at(0.5, 1.0)).unwrap();
        assert!(redraw.is_none());
        assert_eq!(session.status(), "x=0.50, y=1.00");
        assert_eq!(session.charges(), &ChargeSet::demo());
    }

    #[test]
    fn events_outside_the_plot_are_ignored() {
        let mut session = demo_session();
        session.press(None);
        assert!(!session.is_gesture_active());
        assert!(session.motion(None).unwrap().is_none());
        assert!(session.release(None).unwrap().is_none());
        assert_eq!(session.status(), IDLE_STATUS);
    }

    #[test]
    fn release_without_press_does_nothing() {
        let mut session = demo_session();
        assert!(session.release(at(0.0, 0.0)).unwrap().is_none());
        assert_eq!(session.charges(), &ChargeSet::demo());
    }

    #[test]
    fn click_on_charge_deletes_it() {
        let mut session = demo_session();
        session.press(at(1.1, 0.05));
        let redraw = session.release(at(1.1, 0.05)).unwrap().unwrap();

        assert!(!redraw.is_preview());
        assert_eq!(
            session.charges().list(),
            vec![
                (1.0, Point2::new(-1.0, 0.0)),
                (-1.0, Point2::new(0.0, 1.0)),
                (-1.0, Point2::new(0.0, -1.0)),
            ]
        );
        // One positive charge left, traced at full quality.
        assert_eq!(redraw.lines().len(), 8);
        assert!(!session.is_gesture_active());
    }

    #[test]
    fn drag_moves_charge_with_preview_then_full_redraw() {
        let mut session = demo_session();
        session.press(at(-1.0, 0.1));

        let preview = session.motion(at(-2.0, 0.0)).unwrap().unwrap();
        assert!(preview.is_preview());
        assert_eq!(preview.lines().len(), 4);
        assert_eq!(session.charges().get(1).unwrap().position, Point2::new(-2.0, 0.0));
        assert_eq!(session.status(), "x=-2.00, y=0.00");

        let full = session.release(at(-3.0, 0.5)).unwrap().unwrap();
        assert!(!full.is_preview());
        assert_eq!(full.lines().len(), 16);
        assert_eq!(session.charges().len(), 4);
        assert_eq!(session.charges().get(1).unwrap().position, Point2::new(-3.0, 0.5));
    }

    #[test]
    fn adding_shows_pending_magnitude_in_status() {
        let mut session = demo_session();
        session.press(at(3.0, 3.0));
        session.motion(at(5.4, 3.0)).unwrap();
        assert_eq!(session.status(), "x=5.40, y=3.00, q=2.00");
    }

    #[test]
    fn press_on_empty_space_and_release_adds_rounded_charge() {
        let mut session = demo_session();
        session.press(at(3.0, 3.0));
        assert!(session.motion(at(4.2, 3.5)).unwrap().is_none());
        assert!(session.motion(at(1.2, 2.0)).unwrap().is_none());
        assert_eq!(session.status(), "x=1.20, y=2.00, q=-2.00");

        let redraw = session.release(at(1.2, 2.0)).unwrap().unwrap();
        assert_eq!(session.charges().len(), 5);
        assert_eq!(
            session.charges().list()[4],
            (-2.0, Point2::new(3.0, 3.0))
        );
        // The new charge is negative, so still two seeded charges.
        assert_eq!(redraw.lines().len(), 16);
    }

    #[test]
    fn added_positive_charge_is_seeded() {
        let mut session = demo_session();
        session.press(at(3.0, 3.0));
        session.motion(at(4.0, 3.0)).unwrap();
        let redraw = session.release(at(4.0, 3.0)).unwrap().unwrap();
        assert_eq!(session.charges().list()[4], (1.0, Point2::new(3.0, 3.0)));
        assert_eq!(redraw.lines().len(), 24);
    }

    #[test]
    fn zero_magnitude_addition_is_discarded_but_still_redraws() {
        let mut session = demo_session();
        session.press(at(3.0, 3.0));
        session.motion(at(3.3, 4.0)).unwrap();
        assert_eq!(session.status(), "x=3.30, y=4.00, q=0.00");

        let redraw = session.release(at(3.3, 4.0)).unwrap();
        assert!(matches!(redraw, Some(Redraw::Full(_))));
        assert_eq!(session.charges(), &ChargeSet::demo());
        assert!(!session.is_gesture_active());
    }

    #[test]
    fn pending_magnitude_rounds_half_to_even() {
        let mut session = demo_session();
        session.press(at(2.0, 2.0));
        session.motion(at(4.5, 2.0)).unwrap();
        assert_eq!(session.status(), "x=4.50, y=2.00, q=2.00");
    }

    #[test]
    fn press_far_from_charges_does_not_pick() {
        let mut session = demo_session();
        session.press(at(1.25, 0.0));
        session.release(at(1.25, 0.0)).unwrap();
        assert_eq!(session.charges().len(), 4);
    }

    #[test]
    fn gesture_state_resets_between_gestures() {
        let mut session = demo_session();
        session.press(at(3.0, 3.0));
        session.motion(at(6.0, 3.0)).unwrap();
        session.release(at(6.0, 3.0)).unwrap();

        // The next plain click on empty space must not reuse the old magnitude.
        session.press(at(-3.0, -3.0));
        session.release(at(-3.0, -3.0)).unwrap();
        assert_eq!(session.charges().len(), 5);
    }

    #[test]
    fn into_charges_returns_edited_set() {
        let mut session = demo_session();
        session.press(at(0.0, 1.0));
        session.release(at(0.0, 1.0)).unwrap();
        assert_eq!(session.into_charges().len(), 3);
    }
}
