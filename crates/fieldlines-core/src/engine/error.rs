use super::config::ConfigError;
use crate::core::field::evaluator::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Field evaluation failed: {source}")]
    Field {
        #[from]
        source: FieldError,
    },

    #[error("Integration of field line {line} (charge {charge_index}, seed {seed_index}) failed: {reason}")]
    Integration {
        line: usize,
        charge_index: usize,
        seed_index: usize,
        reason: String,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
