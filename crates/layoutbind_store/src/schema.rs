//! The shared on-disk container for metadata logs, dependency logs and artifacts.
//!
//! All three are one JSON object with a `mappings` table. A dependency log adds
//! the `dependencies` adjacency table and the bookkeeping the resolver needs on
//! the next run. Readers ignore fields they do not know, so a dependency log can
//! be read as a plain metadata log.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use layoutbind_common::{ContentHash, LayoutName};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::metadata::ClassDescriptor;

/// Current schema version written into every file. Increment on breaking changes.
pub const FORMAT_VERSION: u32 = 1;

fn legacy_format_version() -> u32 {
    // Files that predate the version field use the first schema.
    1
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct LogFile {
    #[serde(default = "legacy_format_version")]
    pub format_version: u32,

    #[serde(default)]
    pub mappings: BTreeMap<LayoutName, ClassDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BTreeMap<LayoutName, BTreeSet<LayoutName>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_mappings: Option<BTreeMap<LayoutName, ClassDescriptor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_fingerprints: Option<BTreeMap<String, ContentHash>>,
}

/// Reads and validates a log file. Returns `Ok(None)` when the file does not exist.
pub(crate) fn read_log_file(path: &Path) -> Result<Option<LogFile>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    let file: LogFile = serde_json::from_str(&content).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if file.format_version > FORMAT_VERSION {
        return Err(StoreError::SchemaVersion {
            path: path.to_path_buf(),
            expected: FORMAT_VERSION,
            actual: file.format_version,
        });
    }
    Ok(Some(file))
}

/// Writes a log file by full replacement: any existing file is deleted first so a
/// half-written file is never mistaken for the previous, valid one.
pub(crate) fn write_log_file(path: &Path, file: &LogFile) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(file).map_err(|e| StoreError::Serialization {
        reason: e.to_string(),
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(StoreError::io(path, e)),
    }
    std::fs::write(path, json).map_err(|e| StoreError::io(path, e))
}
