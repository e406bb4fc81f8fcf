//! Engine configuration

use std::mem::size_of;

use qudit_gates::Complex64;

/// Configuration for the circuit engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Random number generator seed for reproducibility
    ///
    /// If None, seeds from system entropy. Set to Some(seed) for
    /// deterministic measurement outcomes.
    ///
    /// Default: None (random)
    pub seed: Option<u64>,

    /// Memory limit in bytes for the state vector
    ///
    /// Checked once when the engine is created, against the full
    /// `d^nq`-amplitude initial state. Set to 0 for no limit.
    ///
    /// Default: 0 (unlimited)
    pub memory_limit: usize,
}

impl EngineConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic configuration for tests and debugging
    pub fn debug() -> Self {
        Self {
            seed: Some(42),
            ..Default::default()
        }
    }

    /// Set the random seed for deterministic execution
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set memory limit in bytes
    pub fn with_memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.memory_limit != 0 && self.memory_limit < size_of::<Complex64>() {
            return Err(format!(
                "memory_limit must be 0 or at least {} bytes, got {}",
                size_of::<Complex64>(),
                self.memory_limit
            ));
        }
        Ok(())
    }
}
