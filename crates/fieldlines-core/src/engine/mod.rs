//! # Engine Module
//!
//! Turns a charge set into field lines.
//!
//! ## Overview
//!
//! The engine seeds lines on small circles around every positive charge and
//! integrates each seed through the stabilized field of the whole set. Lines
//! are independent of one another, so with the `parallel` feature they are
//! integrated on the rayon thread pool; the output order never depends on
//! scheduling.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Trace parameters, integrator choice and
//!   the interactive session settings
//! - **Integration** ([`integrator`]) - Fixed-step RK4 and adaptive
//!   Dormand–Prince solvers behind the [`integrator::Integrator`] trait
//! - **Tracing** ([`tracer`]) - Seeding and per-line integration
//! - **Progress Monitoring** ([`progress`]) - Events for progress bars
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub mod error;
pub mod integrator;
pub mod progress;
pub mod tracer;
