//! Adapter configuration.
//!
//! Configuration is an explicit value threaded into generation and mapping.
//! A process-wide default exists purely for ergonomic convenience: it seeds
//! [`Adapter::new`](crate::Adapter::new), and everything downstream reads
//! the adapter's own copy.

use std::sync::RwLock;

use crate::naming::Case;

/// Controls whether generated SQL is logged before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Log nothing.
    Silent,
    /// Log each generated statement and its bound parameters.
    SqlOnly,
}

/// Naming and logging configuration, read at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Logging verbosity.
    pub verbosity: Verbosity,
    /// Case applied to inferred table names.
    pub table_case: Case,
    /// Case applied to attribute names when deriving column names.
    pub column_case: Case,
}

impl Config {
    /// Returns the built-in configuration: silent, `Camel` table and column
    /// names (the identity transform).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            verbosity: Verbosity::Silent,
            table_case: Case::Camel,
            column_case: Case::Camel,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT: RwLock<Config> = RwLock::new(Config::new());

/// Returns the current process-wide default configuration.
#[must_use]
pub fn default() -> Config {
    match DEFAULT.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Replaces the process-wide default configuration.
///
/// Adapters created afterwards pick up the new value; existing adapters keep
/// the configuration they were built with.
pub fn set_default(config: Config) {
    match DEFAULT.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}
