//! # Field Module
//!
//! Electrostatic field evaluation for a set of planar point charges.
//!
//! ## Overview
//!
//! Every charge `q` at `c` contributes `q·(p − c)/|p − c|³` to the field at
//! `p`; the total is the plain superposition. All quantities are unitless.
//!
//! ## Key Components
//!
//! - [`evaluator`] - [`FieldEvaluator`](evaluator::FieldEvaluator): raw field,
//!   stabilized integration field and scalar potential over a charge set
//! - [`potentials`] - Per-charge kernels and the `1 / (|E|² + ε)` rescaling
//!
//! ## Usage
//!
//! ```
//! use fieldlines::core::field::evaluator::FieldEvaluator;
//! use fieldlines::core::models::charge_set::ChargeSet;
//! use nalgebra::Point2;
//!
//! let charges = ChargeSet::demo();
//! let evaluator = FieldEvaluator::new(&charges);
//!
//! let e = evaluator.field(&Point2::new(0.5, 0.5))?;
//! assert!(e.norm() > 0.0);
//! let v = evaluator.stabilized_field(&Point2::new(0.5, 0.5));
//! assert!(v.norm() <= evaluator.speed_bound());
//! # Ok::<(), fieldlines::core::field::evaluator::FieldError>(())
//! ```

pub mod evaluator;
pub mod potentials;
