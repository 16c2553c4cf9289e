// Scratch directory management.
//
// The scratch root is shared and prepared once. Every request then gets its
// own uuid-named subdirectory holding the source file, the compiled binary,
// the dependency prefix, and the output image, so concurrent requests can
// never collide on a file name or observe each other's artifacts. Releasing
// a workspace is a single recursive delete.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::language::Language;

pub const SOURCE_STEM: &str = "main";
pub const BINARY_NAME: &str = "main.bin";
pub const PLOT_NAME: &str = "plot.png";
pub const PYDEPS_DIR: &str = "pydeps";

#[derive(Debug, Clone)]
pub struct ScratchRoot {
    root: PathBuf,
}

impl ScratchRoot {
    /// Create the scratch root if absent and verify it is writable. Nothing
    /// else in the pipeline runs if this fails.
    pub fn ensure(root: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            EngineError::Workspace(format!(
                "failed to create scratch directory {}: {}",
                root.display(),
                e
            ))
        })?;

        let probe = root.join(format!(".probe-{}", Uuid::new_v4()));
        fs::write(&probe, b"probe").map_err(|e| {
            EngineError::Workspace(format!(
                "no write permission for scratch directory {}: {}",
                root.display(),
                e
            ))
        })?;
        let _ = fs::remove_file(&probe);

        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Allocate an isolated workspace for one request.
    pub fn allocate(&self) -> Result<RequestWorkspace, EngineError> {
        let id = Uuid::new_v4();
        let dir = self.root.join(id.to_string());
        fs::create_dir(&dir).map_err(|e| {
            EngineError::Workspace(format!(
                "failed to create request workspace {}: {}",
                dir.display(),
                e
            ))
        })?;
        debug!(request_id = %id, dir = %dir.display(), "Workspace allocated");
        Ok(RequestWorkspace { id, dir })
    }
}

/// One request's private arena. Everything the request touches on disk lives
/// under `dir`.
#[derive(Debug)]
pub struct RequestWorkspace {
    id: Uuid,
    dir: PathBuf,
}

impl RequestWorkspace {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the submitted code as `main.<ext>` and return its path.
    pub fn write_source(&self, language: Language, code: &str) -> Result<PathBuf, EngineError> {
        let path = self
            .dir
            .join(format!("{}.{}", SOURCE_STEM, language.extension()));
        fs::write(&path, code).map_err(|e| {
            EngineError::Workspace(format!(
                "failed to write source file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(path)
    }

    pub fn binary_path(&self) -> PathBuf {
        self.dir.join(BINARY_NAME)
    }

    /// Conventional output-image path. The child runs with the workspace as
    /// its working directory, so a program writing the relative name lands
    /// here and nowhere else.
    pub fn plot_path(&self) -> PathBuf {
        self.dir.join(PLOT_NAME)
    }

    /// Target prefix for pip-installed packages.
    pub fn pydeps_dir(&self) -> PathBuf {
        self.dir.join(PYDEPS_DIR)
    }

    /// npm installs under `<prefix>/node_modules`.
    pub fn node_modules_dir(&self) -> PathBuf {
        self.dir.join("node_modules")
    }

    /// Best-effort release. Failure is logged, never escalated: the
    /// request's primary outcome takes precedence over cleanup fidelity.
    pub fn release(self) {
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    request_id = %self.id,
                    dir = %self.dir.display(),
                    error = %e,
                    "Failed to release workspace"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_creates_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b/scratch");
        let root = ScratchRoot::ensure(&nested).unwrap();
        assert!(root.path().is_dir());
    }

    #[test]
    fn ensure_leaves_no_probe_behind() {
        let tmp = tempfile::tempdir().unwrap();
        ScratchRoot::ensure(tmp.path()).unwrap();
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn allocate_yields_distinct_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let root = ScratchRoot::ensure(tmp.path()).unwrap();
        let a = root.allocate().unwrap();
        let b = root.allocate().unwrap();
        assert_ne!(a.dir(), b.dir());
        assert!(a.dir().is_dir());
        assert!(b.dir().is_dir());
    }

    #[test]
    fn write_source_uses_language_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = ScratchRoot::ensure(tmp.path()).unwrap().allocate().unwrap();
        let path = ws.write_source(Language::Python, "print('hi')").unwrap();
        assert!(path.ends_with("main.py"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "print('hi')");
    }

    #[test]
    fn release_removes_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = ScratchRoot::ensure(tmp.path()).unwrap().allocate().unwrap();
        ws.write_source(Language::C, "int main(){}").unwrap();
        fs::write(ws.binary_path(), b"elf").unwrap();
        fs::write(ws.plot_path(), b"png").unwrap();
        let dir = ws.dir().to_path_buf();
        ws.release();
        assert!(!dir.exists());
    }

    #[test]
    fn release_tolerates_already_removed_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = ScratchRoot::ensure(tmp.path()).unwrap().allocate().unwrap();
        fs::remove_dir_all(ws.dir()).unwrap();
        ws.release();
    }
}
