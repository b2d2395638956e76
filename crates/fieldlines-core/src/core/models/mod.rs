//! # Core Models Module
//!
//! Data structures describing the charge configuration of a session.
//!
//! ## Key Components
//!
//! - [`charge`] - A single point charge with magnitude and planar position
//! - [`charge_set`] - The ordered, index-addressed collection of charges
//! - [`streamline`] - A traced field line and its seed metadata
//!
//! ## Usage
//!
//! ```
//! use fieldlines::core::models::charge_set::ChargeSet;
//! use nalgebra::Point2;
//!
//! let mut charges = ChargeSet::new();
//! charges.add(1.0, Point2::new(0.0, 0.0));
//! charges.add(-1.0, Point2::new(5.0, 5.0));
//!
//! assert_eq!(charges.closest(&Point2::new(0.05, 0.05), 0.1), Some(0));
//! charges.delete(0);
//! assert_eq!(charges.list(), vec![(-1.0, Point2::new(5.0, 5.0))]);
//! ```

pub mod charge;
pub mod charge_set;
pub mod streamline;
