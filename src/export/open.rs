use crate::error::ReportResult;
use std::path::Path;
use std::process::Command;
use tracing::{debug, error, warn};

/// Opens `path` with the platform's default application without waiting
/// for it to exit. Missing paths are logged and skipped.
pub fn open_file<P: AsRef<Path>>(path: P) -> ReportResult<()> {
    let path = path.as_ref();
    if !path.exists() {
        error!("Error: {} is not a file.", path.display());
        return Ok(());
    }

    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };

    debug!("Opening {} with {:?}", path.display(), cmd.get_program());
    if let Err(e) = cmd.arg(path).spawn() {
        // No viewer is not fatal: the file is already on disk.
        warn!("Could not open {}: {}", path.display(), e);
    }
    Ok(())
}
