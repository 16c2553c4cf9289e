// Engine tuning knobs. The server binary fills these from the environment;
// tests construct them directly.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root of the scratch area. Each request gets its own subdirectory.
    pub scratch_root: PathBuf,
    /// Deadline for the compile step and for the program run, each.
    pub run_timeout: Duration,
    /// Deadline for one dependency-installation command.
    pub install_timeout: Duration,
}

impl EngineConfig {
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
            run_timeout: Duration::from_millis(10_000),
            install_timeout: Duration::from_millis(120_000),
        }
    }

    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = timeout;
        self
    }

    pub fn with_install_timeout(mut self, timeout: Duration) -> Self {
        self.install_timeout = timeout;
        self
    }
}
