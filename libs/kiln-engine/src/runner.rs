// Child-process execution with full output capture and a hard timeout.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::toolchain::CommandSpec;

/// Raw result of one child process. A non-zero exit is data here, not an
/// error; the pipeline decides which error class it belongs to.
#[derive(Debug)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawn one child process, feed it `stdin_text` (then close the stream to
/// signal end-of-input), and capture stdout/stderr in full.
///
/// The stdin write is not synchronized with the child's readiness; the pipe
/// buffers until the child reads. The write runs concurrently with the wait
/// so an input larger than the pipe buffer cannot deadlock a child that
/// never reads it.
///
/// On deadline expiry the child is killed (`kill_on_drop`) and the call
/// fails with [`EngineError::Timeout`]. A child that cannot be spawned fails
/// with [`EngineError::Runtime`].
pub async fn run(
    spec: &CommandSpec,
    cwd: &Path,
    stdin_text: Option<&str>,
    timeout: Duration,
) -> Result<RunOutput, EngineError> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for (key, value) in &spec.env {
        cmd.env(key, value);
    }

    let start = Instant::now();
    let mut child = cmd
        .spawn()
        .map_err(|e| EngineError::Runtime(format!("failed to spawn {}: {}", spec.program, e)))?;

    let stdin_handle = child.stdin.take();
    let input = stdin_text.map(str::to_owned);
    let feed_stdin = async move {
        if let (Some(mut stdin), Some(input)) = (stdin_handle, input) {
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                // Broken pipe means the child exited without consuming its
                // input, which is the child's business, not ours.
                debug!(error = %e, "Child closed stdin before input was fully written");
            }
        }
        // Dropping the handle closes the pipe.
    };

    let waited = tokio::time::timeout(timeout, async {
        let (_, output) = tokio::join!(feed_stdin, child.wait_with_output());
        output
    })
    .await;

    let output = match waited {
        Ok(result) => result.map_err(|e| {
            EngineError::Runtime(format!("failed to wait for {}: {}", spec.program, e))
        })?,
        Err(_) => {
            // Dropping the wait future drops the child; kill_on_drop reaps it.
            warn!(
                program = %spec.program,
                timeout_ms = timeout.as_millis() as u64,
                "Execution deadline expired, killing child"
            );
            return Err(EngineError::Timeout(timeout.as_millis() as u64));
        }
    };

    Ok(RunOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
        duration: start.elapsed(),
    })
}
