use fieldlines::core::models::charge_set::ChargeSet;
use fieldlines::engine::config::{SessionConfig, TraceConfig};

/// Fully resolved settings for one command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub charges: ChargeSet,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn trace(&self) -> &TraceConfig {
        &self.session.trace
    }
}
