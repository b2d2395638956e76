//! # Workflows Module
//!
//! High-level entry points that tie the charge model and the tracing engine
//! together.
//!
//! - **Trace Workflow** ([`trace`]) - One-shot tracing of a charge set with
//!   progress reporting
//! - **Interactive Workflow** ([`interactive`]) - Pointer-gesture editing of a
//!   charge set with preview and full-quality redraws

pub mod interactive;
pub mod trace;
