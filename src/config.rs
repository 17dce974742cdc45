//! Engine configuration
//!
//! Loaded from defaults, an optional `cadence.toml` next to the host, and
//! `CADENCE_*` environment overrides.

use serde::Deserialize;

/// Tunables for the VM driver.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Instruction steps executed per `run_tick` before yielding to the
    /// host.
    pub tick_budget: usize,
    /// Initial capacity reserved for each thread's operand stack.
    pub stack_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_budget: 128,
            stack_capacity: 16,
        }
    }
}

impl EngineConfig {
    /// Load configuration from file and environment sources.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("tick_budget", 128_i64)?
            .set_default("stack_capacity", 16_i64)?
            .add_source(config::File::with_name("cadence").required(false))
            .add_source(config::Environment::with_prefix("CADENCE"))
            .build()?
            .try_deserialize()
    }
}
