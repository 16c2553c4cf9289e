// Output-artifact collection.

use base64::{engine::general_purpose, Engine as _};
use std::fs;
use tracing::{debug, warn};

use crate::workspace::RequestWorkspace;

/// Pick up the conventional output image, if the executed program produced
/// one, and return it base64-encoded.
///
/// The path is scoped to the request workspace, so concurrent requests can
/// never race on it. An unreadable file degrades to `None` rather than
/// failing the request; removal failures are logged only, since the
/// workspace release will sweep the file anyway.
pub fn collect_plot(ws: &RequestWorkspace) -> Option<String> {
    let path = ws.plot_path();
    if !path.exists() {
        return None;
    }

    match fs::read(&path) {
        Ok(bytes) => {
            debug!(request_id = %ws.id(), bytes = bytes.len(), "Collected plot artifact");
            if let Err(e) = fs::remove_file(&path) {
                warn!(request_id = %ws.id(), error = %e, "Failed to remove plot artifact");
            }
            Some(general_purpose::STANDARD.encode(bytes))
        }
        Err(e) => {
            warn!(request_id = %ws.id(), error = %e, "Failed to read plot artifact");
            None
        }
    }
}
