//! # Core Module
//!
//! The stateless foundation of the library: the charge model, field
//! evaluation, file I/O and shared geometry helpers.
//!
//! ## Architecture
//!
//! - **Charge Representation** ([`models`]) - Point charges and the ordered charge set
//! - **Field Evaluation** ([`field`]) - Raw, stabilized and potential evaluation
//! - **File I/O** ([`io`]) - CSV import/export of charges and traced field lines
//! - **Utilities** ([`utils`]) - Seed circles, sample grids, polyline comparison
//!
//! Nothing in this module keeps state between calls; the stateful parts of
//! the library (tracing, progress, configuration) live in [`crate::engine`].

pub mod field;
pub mod io;
pub mod models;
pub mod utils;
