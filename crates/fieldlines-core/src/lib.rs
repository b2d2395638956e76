//! # fieldlines
//!
//! Electric field lines of two-dimensional point-charge configurations.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ChargeSet`,
//!   `Streamline`), superposition of point-charge fields, CSV I/O and
//!   geometry helpers.
//!
//! - **[`engine`]: The Logic Core.** Seeding and integration of field lines
//!   through the stabilized field, the RK4 and Dormand–Prince integrators,
//!   configuration and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built on the
//!   other two layers: a one-shot trace and an interactive editing session
//!   driven by pointer gestures.
//!
//! ## Example
//!
//! ```
//! use fieldlines::core::models::charge_set::ChargeSet;
//! use fieldlines::engine::config::TraceConfig;
//! use fieldlines::engine::progress::ProgressReporter;
//! use fieldlines::workflows::trace;
//!
//! let config = TraceConfig { points: 51, ..TraceConfig::default() };
//! let result = trace::run(&ChargeSet::demo(), &config, &ProgressReporter::new()).unwrap();
//!
//! // Two positive charges with 32 lines each.
//! assert_eq!(result.lines.len(), 64);
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
