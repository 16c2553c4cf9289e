// Per-request execution pipeline.
//
// Stage order: guardrails -> workspace -> source write -> dependency
// install (conditional) -> compile (conditional) -> run -> artifact
// collection. The workspace is released on every exit path, success or
// failure, so a request can never leave files behind.

use std::time::Duration;
use tracing::{info, instrument};

use crate::artifact;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::language::Language;
use crate::provision;
use crate::runner;
use crate::toolchain;
use crate::workspace::{RequestWorkspace, ScratchRoot};

/// Safety limits applied before any filesystem action.
pub const MAX_SOURCE_BYTES: usize = 1024 * 1024; // 1MB
pub const MAX_STDIN_BYTES: usize = 10 * 1024 * 1024; // 10MB

#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub language: Language,
    pub source_code: String,
    pub stdin: Option<String>,
    pub dependencies: Vec<String>,
}

/// Terminal outcome of one successful request.
#[derive(Debug)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
    /// Base64-encoded output image, when the program produced one.
    pub plot: Option<String>,
}

pub struct Engine {
    config: EngineConfig,
    root: ScratchRoot,
}

impl Engine {
    /// Prepare the scratch root up front; no request runs if it is unusable.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let root = ScratchRoot::ensure(&config.scratch_root)?;
        Ok(Self { config, root })
    }

    pub fn scratch_root(&self) -> &ScratchRoot {
        &self.root
    }

    /// Execute one request to its terminal outcome.
    ///
    /// Exactly one of `Ok` / `Err` is produced per request, and the request
    /// workspace is released on both paths. Every error is terminal; nothing
    /// is retried.
    #[instrument(skip(self, request), fields(language = %request.language))]
    pub async fn execute(
        &self,
        request: &ExecutionRequest,
    ) -> Result<ExecutionOutcome, EngineError> {
        if request.source_code.len() > MAX_SOURCE_BYTES {
            return Err(EngineError::SourceTooLarge {
                limit: MAX_SOURCE_BYTES,
            });
        }
        if let Some(stdin) = &request.stdin {
            if stdin.len() > MAX_STDIN_BYTES {
                return Err(EngineError::InputTooLarge {
                    limit: MAX_STDIN_BYTES,
                });
            }
        }

        let ws = self.root.allocate()?;
        let result = self.execute_in(&ws, request).await;

        // Artifact collection happens only after a successful run, but the
        // release below sweeps the workspace on every path.
        let outcome = match result {
            Ok(mut outcome) => {
                outcome.plot = artifact::collect_plot(&ws);
                Ok(outcome)
            }
            Err(e) => Err(e),
        };

        ws.release();
        outcome
    }

    async fn execute_in(
        &self,
        ws: &RequestWorkspace,
        request: &ExecutionRequest,
    ) -> Result<ExecutionOutcome, EngineError> {
        ws.write_source(request.language, &request.source_code)?;

        provision::install(
            request.language,
            &request.dependencies,
            ws,
            self.config.install_timeout,
        )
        .await?;

        let invocation = toolchain::invocation_for(request.language, ws);

        if let Some(compile) = &invocation.compile {
            let out = runner::run(compile, ws.dir(), None, self.config.run_timeout).await?;
            if !out.success() {
                info!(request_id = %ws.id(), exit_code = out.exit_code, "Compilation failed");
                return Err(EngineError::Compile(out.stderr));
            }
        }

        let out = runner::run(
            &invocation.run,
            ws.dir(),
            request.stdin.as_deref(),
            self.config.run_timeout,
        )
        .await?;

        if !out.success() {
            info!(request_id = %ws.id(), exit_code = out.exit_code, "Program exited with failure");
            let diagnostics = if out.stderr.is_empty() {
                format!("process exited with code {}", out.exit_code)
            } else {
                out.stderr
            };
            return Err(EngineError::Runtime(diagnostics));
        }

        info!(
            request_id = %ws.id(),
            exit_code = out.exit_code,
            duration_ms = out.duration.as_millis() as u64,
            "Execution completed"
        );

        Ok(ExecutionOutcome {
            stdout: out.stdout,
            stderr: out.stderr,
            exit_code: out.exit_code,
            duration: out.duration,
            plot: None,
        })
    }
}
