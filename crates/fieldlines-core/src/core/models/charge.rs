use nalgebra::Point2;

/// Classification of a charge by the sign of its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Strictly positive magnitude; field lines emanate from these charges.
    Positive,
    /// Strictly negative magnitude; field lines terminate on these charges.
    Negative,
    /// Zero magnitude. Stored but inert.
    Neutral,
}

/// An idealized point charge in the plane.
///
/// Magnitudes and positions are unitless. The field of a charge `q` at
/// distance `d` is taken to be `q / d²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Charge {
    /// Signed magnitude of the charge.
    pub magnitude: f64,
    /// Location of the charge in the xy-plane.
    pub position: Point2<f64>,
}

impl Charge {
    pub fn new(magnitude: f64, position: Point2<f64>) -> Self {
        Self {
            magnitude,
            position,
        }
    }

    pub fn polarity(&self) -> Polarity {
        if self.magnitude > 0.0 {
            Polarity::Positive
        } else if self.magnitude < 0.0 {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.polarity() == Polarity::Positive
    }

    #[inline]
    pub fn distance_to(&self, point: &Point2<f64>) -> f64 {
        nalgebra::distance(&self.position, point)
    }
}

impl From<(f64, Point2<f64>)> for Charge {
    fn from((magnitude, position): (f64, Point2<f64>)) -> Self {
        Self::new(magnitude, position)
    }
}

impl From<Charge> for (f64, Point2<f64>) {
    fn from(charge: Charge) -> Self {
        (charge.magnitude, charge.position)
    }
}
