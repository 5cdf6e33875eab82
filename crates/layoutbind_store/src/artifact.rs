//! Class artifacts published by modules for their dependents.
//!
//! Every module exports its generated classes as one file named
//! `<package>-binding_classes.json` in the shared metadata container format.
//! A dependent discovers its upstream classes by listing the folders those files
//! were collected into and merging every artifact it finds.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use layoutbind_common::LayoutName;
use layoutbind_diagnostics::{codes, Diagnostic, DiagnosticSink};

use crate::error::StoreError;
use crate::metadata::MetadataLog;
use crate::schema::{read_log_file, write_log_file, LogFile, FORMAT_VERSION};

/// Suffix appended to a module package to name its artifact file.
pub const ARTIFACT_SUFFIX: &str = "-binding_classes.json";

/// The name of an artifact file, tying it to the module package that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactName {
    /// Package of the producing module.
    pub package: String,
}

impl ArtifactName {
    /// Creates the artifact name for a module package.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }

    /// Parses an artifact file name; `None` if it does not follow the schema.
    pub fn parse(file_name: &str) -> Option<Self> {
        let package = file_name.strip_suffix(ARTIFACT_SUFFIX)?;
        if package.is_empty() {
            return None;
        }
        Some(Self::new(package))
    }

    /// Parses the file-name component of `path`.
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::parse)
            .ok_or_else(|| StoreError::InvalidArtifactName {
                path: path.to_path_buf(),
            })
    }

    /// Returns the file name for this artifact.
    pub fn file_name(&self) -> String {
        format!("{}{ARTIFACT_SUFFIX}", self.package)
    }
}

/// Loads and validates one artifact file.
///
/// Unlike [`MetadataLog::load`], a missing file is an error here: the artifact was
/// listed a moment ago, so its absence means something went wrong.
pub fn load_artifact(path: &Path) -> Result<MetadataLog, StoreError> {
    ArtifactName::from_path(path)?;
    let file = read_log_file(path)?.ok_or_else(|| {
        StoreError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "artifact disappeared"),
        )
    })?;
    for (name, descriptor) in &file.mappings {
        if name.is_empty() {
            return Err(StoreError::Parse {
                path: path.to_path_buf(),
                reason: "mapping with an empty layout name".to_string(),
            });
        }
        if descriptor.qualified_name.is_empty() {
            return Err(StoreError::Parse {
                path: path.to_path_buf(),
                reason: format!("class for '{name}' has no name"),
            });
        }
    }
    Ok(MetadataLog::from_mappings(file.mappings))
}

/// Writes this module's classes as its artifact into `dir` and returns the path.
pub fn publish_artifact(
    dir: &Path,
    package: &str,
    classes: &MetadataLog,
) -> Result<PathBuf, StoreError> {
    let path = dir.join(ArtifactName::new(package).file_name());
    let file = LogFile {
        format_version: FORMAT_VERSION,
        mappings: classes.mappings().clone(),
        ..LogFile::default()
    };
    write_log_file(&path, &file)?;
    Ok(path)
}

/// The result of merging every upstream artifact.
#[derive(Debug, Clone, Default)]
pub struct MergedArtifacts {
    /// Upstream classes keyed by layout name.
    pub classes: MetadataLog,
    /// The artifact each class was taken from.
    pub origins: BTreeMap<LayoutName, PathBuf>,
    /// Artifacts merged successfully, in merge order.
    pub loaded: Vec<PathBuf>,
    /// Artifacts that were skipped because they could not be read or parsed.
    pub skipped: Vec<PathBuf>,
}

/// Merges every artifact found in `dirs` into one log.
///
/// Folders are visited in the given order and files in sorted order, so the last
/// artifact wins when two define the same layout name. Missing folders contribute
/// nothing. A malformed artifact is skipped with a warning in `sink` and never
/// stops the remaining ones from merging. The artifact of `own_package` is ignored
/// when a module's output folder doubles as a dependency folder.
pub fn merge_artifacts(
    dirs: &[PathBuf],
    own_package: &str,
    sink: &DiagnosticSink,
) -> MergedArtifacts {
    let mut merged = MergedArtifacts::default();

    for dir in dirs {
        for path in list_artifact_candidates(dir, sink) {
            let name = match ArtifactName::from_path(&path) {
                Ok(name) => name,
                Err(_) => {
                    sink.emit(
                        Diagnostic::note(
                            codes::UNRECOGNIZED_ARTIFACT_FILE,
                            "ignoring file that is not a binding class artifact",
                        )
                        .with_path(&path)
                        .with_help(format!("artifact files are named <package>{ARTIFACT_SUFFIX}")),
                    );
                    continue;
                }
            };
            if name.package == own_package {
                tracing::debug!(path = %path.display(), "skipping this module's own artifact");
                continue;
            }

            match load_artifact(&path) {
                Ok(classes) => {
                    tracing::debug!(
                        path = %path.display(),
                        count = classes.len(),
                        "merged dependency artifact"
                    );
                    for (layout, descriptor) in classes.mappings() {
                        if let Some(previous) = merged.origins.get(layout) {
                            tracing::debug!(
                                layout = %layout,
                                previous = %previous.display(),
                                current = %path.display(),
                                "layout defined by more than one artifact, last one wins"
                            );
                        }
                        merged.classes.put(layout.clone(), descriptor.clone());
                        merged.origins.insert(layout.clone(), path.clone());
                    }
                    merged.loaded.push(path);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping dependency artifact");
                    sink.emit(
                        Diagnostic::warning(
                            codes::INVALID_DEPENDENCY_ARTIFACT,
                            format!("skipped invalid dependency artifact of '{}'", name.package),
                        )
                        .with_path(&path)
                        .with_note(e.to_string()),
                    );
                    merged.skipped.push(path);
                }
            }
        }
    }

    merged
}

/// Lists regular files in `dir`, sorted. Unreadable folders are reported and
/// contribute nothing.
fn list_artifact_candidates(dir: &Path, sink: &DiagnosticSink) -> Vec<PathBuf> {
    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "dependency folder does not exist");
        return Vec::new();
    }
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            sink.emit(
                Diagnostic::warning(
                    codes::INVALID_DEPENDENCY_ARTIFACT,
                    "cannot list dependency folder",
                )
                .with_path(dir)
                .with_note(e.to_string()),
            );
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    files
}
