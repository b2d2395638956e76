pub mod field;
pub mod replay;
pub mod trace;
