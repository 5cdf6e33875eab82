//! The per-module dependency log carried from one build to the next.
//!
//! Stored as `binder_log.json` in the module's log folder. Besides the class
//! mappings it records "depends on" edges between layout families (one layout
//! including another, or referencing an upstream module's class), the merged
//! upstream view that was in effect when it was written, and descriptor
//! fingerprints.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use layoutbind_common::{ContentHash, LayoutName};

use crate::error::StoreError;
use crate::metadata::MetadataLog;
use crate::schema::{read_log_file, write_log_file, LogFile, FORMAT_VERSION};

/// Name of the dependency log file within the log folder.
pub const LOG_FILE_NAME: &str = "binder_log.json";

/// A [`MetadataLog`] plus the dependency edges between layout families.
///
/// Edges may form cycles; nothing here checks for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyLog {
    /// Descriptors of this module's generated classes.
    classes: MetadataLog,

    /// Adjacency list: family -> families it depends on.
    dependencies: BTreeMap<LayoutName, BTreeSet<LayoutName>>,

    /// Upstream classes as merged when this log was written.
    dependency_classes: MetadataLog,

    /// Descriptor file name -> content hash at the time this log was written.
    input_fingerprints: BTreeMap<String, ContentHash>,
}

impl DependencyLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the log file path inside a log folder.
    pub fn path_in(log_dir: &Path) -> PathBuf {
        log_dir.join(LOG_FILE_NAME)
    }

    /// Loads a log from `path`; a missing file yields an empty log.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::read(path)?.unwrap_or_default())
    }

    /// Loads a log from `path`, distinguishing a missing file (`Ok(None)`) from
    /// an empty one.
    pub fn read(path: &Path) -> Result<Option<Self>, StoreError> {
        let Some(file) = read_log_file(path)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            classes: MetadataLog::from_mappings(file.mappings),
            dependencies: file.dependencies.unwrap_or_default(),
            dependency_classes: MetadataLog::from_mappings(
                file.dependency_mappings.unwrap_or_default(),
            ),
            input_fingerprints: file.input_fingerprints.unwrap_or_default(),
        }))
    }

    /// Saves the log to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let file = LogFile {
            format_version: FORMAT_VERSION,
            mappings: self.classes.mappings().clone(),
            dependencies: Some(self.dependencies.clone()),
            dependency_mappings: Some(self.dependency_classes.mappings().clone()),
            input_fingerprints: Some(self.input_fingerprints.clone()),
        };
        write_log_file(path, &file)
    }

    /// Returns the class mappings.
    pub fn class_log(&self) -> &MetadataLog {
        &self.classes
    }

    /// Returns the class mappings for modification.
    pub fn class_log_mut(&mut self) -> &mut MetadataLog {
        &mut self.classes
    }

    /// Records that layout family `from` depends on `to`.
    pub fn add_dependency(&mut self, from: impl Into<LayoutName>, to: impl Into<LayoutName>) {
        self.dependencies
            .entry(from.into())
            .or_default()
            .insert(to.into());
    }

    /// Returns the adjacency list.
    pub fn dependencies(&self) -> &BTreeMap<LayoutName, BTreeSet<LayoutName>> {
        &self.dependencies
    }

    /// Iterates over every `(from, to)` edge.
    pub fn edges(&self) -> impl Iterator<Item = (&LayoutName, &LayoutName)> {
        self.dependencies
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from, to)))
    }

    /// Keeps only the edges for which `keep` returns `true`.
    pub fn retain_edges(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        for (from, targets) in self.dependencies.iter_mut() {
            targets.retain(|to| keep(from, to));
        }
        self.dependencies.retain(|_, targets| !targets.is_empty());
    }

    /// Returns the upstream class view recorded when this log was written.
    pub fn dependency_classes(&self) -> &MetadataLog {
        &self.dependency_classes
    }

    /// Replaces the recorded upstream class view.
    pub fn set_dependency_classes(&mut self, classes: MetadataLog) {
        self.dependency_classes = classes;
    }

    /// Returns the recorded descriptor fingerprints.
    pub fn input_fingerprints(&self) -> &BTreeMap<String, ContentHash> {
        &self.input_fingerprints
    }

    /// Replaces the recorded descriptor fingerprints.
    pub fn set_input_fingerprints(&mut self, fingerprints: BTreeMap<String, ContentHash>) {
        self.input_fingerprints = fingerprints;
    }

    /// Merges `other` into this log: its classes and edges win on collisions, and
    /// every edge whose source `other` describes is replaced by `other`'s edges.
    pub fn merge_from(&mut self, other: &DependencyLog) {
        self.classes.put_all(&other.classes);
        for name in other.classes.mappings().keys() {
            self.dependencies.remove(name);
        }
        for (from, to) in other.edges() {
            self.add_dependency(from.clone(), to.clone());
        }
    }
}
