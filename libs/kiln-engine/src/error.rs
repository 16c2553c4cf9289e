// Error taxonomy for the execution pipeline.
//
// Every variant is terminal for its request and surfaced verbatim to the
// caller. Artifact-read and cleanup failures are deliberately not variants:
// they degrade gracefully and are only logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Scratch directory could not be created, probed, or written to.
    #[error("workspace error: {0}")]
    Workspace(String),

    /// Dependency installation exited non-zero or could not run.
    #[error("failed to install packages: {0}")]
    Install(String),

    /// Language value outside the supported set. Raised before any
    /// filesystem action.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("source code exceeds maximum size of {limit} bytes")]
    SourceTooLarge { limit: usize },

    #[error("input exceeds maximum size of {limit} bytes")]
    InputTooLarge { limit: usize },

    /// Compile step exited non-zero; carries the compiler's diagnostics.
    /// The program is never run.
    #[error("compilation failed: {0}")]
    Compile(String),

    /// The program exited non-zero, or the child could not be spawned.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// The child outlived the configured deadline and was killed.
    #[error("execution timed out after {0} ms")]
    Timeout(u64),
}

impl EngineError {
    /// Errors caused by the request itself rather than by the host.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedLanguage(_) | Self::SourceTooLarge { .. } | Self::InputTooLarge { .. }
        )
    }
}
