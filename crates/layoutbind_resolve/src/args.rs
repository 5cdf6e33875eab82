//! Inputs to a resolution run.

use std::path::{Path, PathBuf};

use layoutbind_config::ResolvedPaths;
use layoutbind_store::{DependencyLog, DescriptorHasher, StoreError};

use crate::descriptors::list_descriptor_files;

/// Everything [`resolve`](crate::resolve) needs to know about one build of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverArgs {
    /// Descriptor files added or modified since the previous build.
    pub out_of_date: Vec<PathBuf>,
    /// Descriptor files deleted since the previous build.
    pub removed: Vec<PathBuf>,
    /// Folder holding every descriptor file currently present.
    pub info_dir: PathBuf,
    /// Folders holding artifacts published by upstream modules.
    pub dependency_dirs: Vec<PathBuf>,
    /// Folder holding this module's dependency log.
    pub log_dir: PathBuf,
    /// Folder this module publishes its own artifact into, if it has dependents.
    pub artifact_dir: Option<PathBuf>,
    /// Whether the previous log may be reused.
    pub incremental: bool,
    /// Package of this module.
    pub package: String,
}

impl ResolverArgs {
    /// Creates arguments for an incremental build with no known changes.
    pub fn new(package: impl Into<String>, info_dir: &Path, log_dir: &Path) -> Self {
        Self {
            out_of_date: Vec::new(),
            removed: Vec::new(),
            info_dir: info_dir.to_path_buf(),
            dependency_dirs: Vec::new(),
            log_dir: log_dir.to_path_buf(),
            artifact_dir: None,
            incremental: true,
            package: package.into(),
        }
    }

    /// Creates arguments from a resolved `layoutbind.toml`.
    pub fn from_config(paths: &ResolvedPaths) -> Self {
        Self {
            out_of_date: Vec::new(),
            removed: Vec::new(),
            info_dir: paths.info_dir.clone(),
            dependency_dirs: paths.dependency_dirs.clone(),
            log_dir: paths.log_dir.clone(),
            artifact_dir: Some(paths.artifact_dir.clone()),
            incremental: paths.incremental,
            package: paths.package.clone(),
        }
    }

    /// Sets the added or modified descriptor files.
    pub fn with_out_of_date(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.out_of_date = files.into_iter().collect();
        self
    }

    /// Sets the deleted descriptor files.
    pub fn with_removed(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.removed = files.into_iter().collect();
        self
    }

    /// Adds a folder of upstream artifacts.
    pub fn with_dependency_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dependency_dirs.push(dir.into());
        self
    }

    /// Sets the folder the module artifact is published into.
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    /// Enables or disables reuse of the previous log.
    pub fn incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    /// Path of the dependency log inside the log folder.
    pub fn log_path(&self) -> PathBuf {
        DependencyLog::path_in(&self.log_dir)
    }

    /// Fills `out_of_date` and `removed` by comparing descriptor fingerprints with
    /// the ones recorded in the previous log.
    ///
    /// For hosts that do not track changed files themselves. An unreadable previous
    /// log leaves every present file marked as new; resolution then falls back to a
    /// full build anyway.
    pub fn with_detected_changes(mut self) -> Result<Self, StoreError> {
        let present = list_descriptor_files(&self.info_dir)?;
        let current = DescriptorHasher::fingerprint(&present);
        let recorded = DependencyLog::read(&self.log_path())
            .ok()
            .flatten()
            .map(|log| log.input_fingerprints().clone())
            .unwrap_or_default();
        let changes = DescriptorHasher::detect_changes(&self.info_dir, &current, &recorded);
        tracing::debug!(
            new = changes.new_files.len(),
            modified = changes.modified_files.len(),
            deleted = changes.deleted_files.len(),
            unreadable = current.unreadable.len(),
            "detected descriptor changes"
        );
        self.out_of_date = changes.out_of_date();
        self.removed = changes.removed();
        Ok(self)
    }
}
