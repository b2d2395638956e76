use super::potentials::{self, DEFAULT_EPSILON};
use crate::core::models::charge_set::ChargeSet;
use nalgebra::{Point2, Vector2};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("Field is undefined at ({x}, {y}): coincides with charge {index}", x = position.x, y = position.y)]
    Singular {
        index: usize,
        position: Point2<f64>,
    },
}

/// Evaluates the superposed field of a [`ChargeSet`].
///
/// The evaluator borrows the charge set for its own lifetime and keeps no
/// state between calls; every query reflects the charges as they are now.
/// Two forms are provided:
///
/// - [`field`](Self::field): the raw inverse-square superposition, for
///   display and inspection. Undefined (an error) exactly at a charge.
/// - [`stabilized_field`](Self::stabilized_field): the raw field rescaled by
///   `1 / (|E|² + ε)`, used only as the velocity for field-line integration.
///   Always finite.
///
/// Both return the zero vector for an empty charge set.
#[derive(Debug, Clone, Copy)]
pub struct FieldEvaluator<'a> {
    charges: &'a ChargeSet,
    epsilon: f64,
}

impl<'a> FieldEvaluator<'a> {
    pub fn new(charges: &'a ChargeSet) -> Self {
        Self::with_epsilon(charges, DEFAULT_EPSILON)
    }

    /// Creates an evaluator with a custom softening term for the stabilized field.
    ///
    /// `epsilon` should be strictly positive; the trace configuration
    /// validates this before an evaluator is built from it.
    pub fn with_epsilon(charges: &'a ChargeSet, epsilon: f64) -> Self {
        Self { charges, epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn charges(&self) -> &'a ChargeSet {
        self.charges
    }

    /// Computes `Σ q·(p − c) / |p − c|³` over all charges.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Singular`] if `position` coincides with a charge
    /// or lies so close to one that its contribution is not finite (the
    /// first such charge is reported), or if the superposed total overflows.
    pub fn field(&self, position: &Point2<f64>) -> Result<Vector2<f64>, FieldError> {
        let mut total = Vector2::zeros();
        for (index, charge) in self.charges.iter().enumerate() {
            let contribution = potentials::point_charge_field(
                charge.magnitude,
                &(position - charge.position),
            )
            .ok_or(FieldError::Singular {
                index,
                position: *position,
            })?;
            total += contribution;
        }
        self.finite_or_singular(position, total, |v: &Vector2<f64>| {
            v.x.is_finite() && v.y.is_finite()
        })
    }

    /// Computes the rescaled field used as the integration velocity.
    ///
    /// Charges located exactly at `position` have no defined direction and
    /// are left out of the sum, so this never fails and never returns a
    /// non-finite vector for finite inputs. A charge close enough that its
    /// field is not representable dominates everything else, and the result
    /// is the `|E| → ∞` limit of zero. The magnitude is bounded by
    /// [`speed_bound`](Self::speed_bound).
    pub fn stabilized_field(&self, position: &Point2<f64>) -> Vector2<f64> {
        let mut raw = Vector2::zeros();
        for charge in self.charges.iter() {
            let displacement = position - charge.position;
            if displacement == Vector2::zeros() {
                continue;
            }
            match potentials::point_charge_field(charge.magnitude, &displacement) {
                Some(contribution) => raw += contribution,
                None => return Vector2::zeros(),
            }
        }
        potentials::stabilize(&raw, self.epsilon)
    }

    /// Computes the scalar potential `Σ q / |p − c|`, with `dV/dr = −E`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Singular`] at a charge location or where the
    /// potential is not representable.
    pub fn potential(&self, position: &Point2<f64>) -> Result<f64, FieldError> {
        let mut total = 0.0;
        for (index, charge) in self.charges.iter().enumerate() {
            total += potentials::point_charge_potential(
                charge.magnitude,
                &(position - charge.position),
            )
            .ok_or(FieldError::Singular {
                index,
                position: *position,
            })?;
        }
        self.finite_or_singular(position, total, |v: &f64| v.is_finite())
    }

    /// Blames the nearest charge when a sum of finite terms overflows.
    fn finite_or_singular<T>(
        &self,
        position: &Point2<f64>,
        total: T,
        is_finite: impl Fn(&T) -> bool,
    ) -> Result<T, FieldError> {
        if is_finite(&total) {
            return Ok(total);
        }
        Err(FieldError::Singular {
            index: self.charges.closest(position, f64::INFINITY).unwrap_or(0),
            position: *position,
        })
    }

    /// Largest magnitude [`stabilized_field`](Self::stabilized_field) can return.
    pub fn speed_bound(&self) -> f64 {
        potentials::stabilized_speed_bound(self.epsilon)
    }
}
