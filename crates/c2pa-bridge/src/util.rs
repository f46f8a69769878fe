use c2pa_bridge_core::{BridgeError, BridgeResult};
use std::fs::File;
use std::path::Path;

/// Format string for a path: its extension without the dot, as written
pub fn format_from_path(path: &Path) -> BridgeResult<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            BridgeError::UnsupportedFormat(format!("no file extension: {}", path.display()))
        })
}

pub(crate) fn open_file(path: &Path) -> BridgeResult<File> {
    File::open(path).map_err(|e| BridgeError::Io(format!("{}: {e}", path.display())))
}

/// Create `path` for writing, making its parent directories first
pub(crate) fn create_file(path: &Path) -> BridgeResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| BridgeError::Io(format!("{}: {e}", parent.display())))?;
    }
    File::create(path).map_err(|e| BridgeError::Io(format!("{}: {e}", path.display())))
}
