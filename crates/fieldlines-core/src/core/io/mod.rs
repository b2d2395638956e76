//! Provides input/output for charge configurations and traced field lines.
//!
//! Everything is plain CSV so that results can be loaded by any plotting
//! tool. See [`table`] for the column layouts.

pub mod table;
