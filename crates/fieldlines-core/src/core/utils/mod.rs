//! Small numeric and geometric helpers shared by the field and tracing code.

pub mod geometry;
