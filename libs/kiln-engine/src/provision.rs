// Dependency provisioning.
//
// Packages install into a prefix inside the request workspace rather than
// the global interpreter environment, so one request's packages can never
// leak into another's run and everything disappears with the workspace.

use std::time::Duration;
use tracing::{debug, info};

use crate::error::EngineError;
use crate::language::{Language, PackageManager};
use crate::runner;
use crate::toolchain::CommandSpec;
use crate::workspace::RequestWorkspace;

/// Build the install command for a request, or `None` when nothing needs
/// provisioning (empty list, or a language without a package manager).
pub fn install_spec(
    language: Language,
    dependencies: &[String],
    ws: &RequestWorkspace,
) -> Option<CommandSpec> {
    if dependencies.is_empty() {
        return None;
    }

    let manager = match language.package_manager() {
        Some(manager) => manager,
        None => {
            debug!(language = %language, "Language has no package manager, ignoring dependency list");
            return None;
        }
    };

    let mut spec = match manager {
        PackageManager::Pip => CommandSpec::new("python3")
            .arg("-m")
            .arg("pip")
            .arg("install")
            .arg("--quiet")
            .arg("--target")
            .arg(ws.pydeps_dir().display().to_string()),
        PackageManager::Npm => CommandSpec::new("npm")
            .arg("install")
            .arg("--no-fund")
            .arg("--no-audit")
            .arg("--prefix")
            .arg(ws.dir().display().to_string()),
    };
    for dep in dependencies {
        spec = spec.arg(dep);
    }
    Some(spec)
}

/// Run one blocking install command for the full dependency list. A non-zero
/// exit aborts the request with the installer's own diagnostics, before the
/// submitted source ever runs.
pub async fn install(
    language: Language,
    dependencies: &[String],
    ws: &RequestWorkspace,
    timeout: Duration,
) -> Result<(), EngineError> {
    let Some(spec) = install_spec(language, dependencies, ws) else {
        return Ok(());
    };

    info!(
        request_id = %ws.id(),
        language = %language,
        packages = dependencies.len(),
        "Installing dependencies"
    );

    let out = runner::run(&spec, ws.dir(), None, timeout)
        .await
        .map_err(|e| match e {
            EngineError::Timeout(ms) => {
                EngineError::Install(format!("package installation timed out after {} ms", ms))
            }
            EngineError::Runtime(msg) => EngineError::Install(msg),
            other => other,
        })?;

    if !out.success() {
        let diagnostics = if out.stderr.trim().is_empty() {
            out.stdout
        } else {
            out.stderr
        };
        return Err(EngineError::Install(diagnostics));
    }
    Ok(())
}
