//! Generated-class descriptors and the log that maps layout families to them.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use layoutbind_common::LayoutName;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::schema::{read_log_file, write_log_file, LogFile, FORMAT_VERSION};

/// One concrete generated implementation contributed by a configuration variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Implementation {
    /// Tag identifying the variant's root view; unique within a module.
    pub tag: String,
    /// Whether the variant's root is a `<merge>` element.
    pub merge: bool,
    /// Fully-qualified name of the generated implementation class.
    pub qualified_name: String,
}

impl Implementation {
    /// Creates an implementation entry.
    pub fn new(tag: impl Into<String>, merge: bool, qualified_name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            merge,
            qualified_name: qualified_name.into(),
        }
    }
}

/// The signature of a generated binding class: its name, owner, variables, and
/// the implementations of every configuration variant of its layout family.
///
/// Two descriptors compare equal only when all of these match, which is what
/// [`MetadataLog::diff`] relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Fully-qualified name of the generated base class.
    #[serde(rename = "name")]
    pub qualified_name: String,
    /// Package of the module that owns the layout.
    pub module_package: String,
    /// Declared variables: name to type.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    /// Implementations across all configuration variants.
    #[serde(default)]
    pub implementations: BTreeSet<Implementation>,
}

impl ClassDescriptor {
    /// Creates a descriptor with no variables and no implementations.
    pub fn new(qualified_name: impl Into<String>, module_package: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            module_package: module_package.into(),
            variables: BTreeMap::new(),
            implementations: BTreeSet::new(),
        }
    }

    /// Adds a declared variable.
    pub fn with_variable(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.variables.insert(name.into(), ty.into());
        self
    }

    /// Adds an implementation.
    pub fn with_implementation(mut self, implementation: Implementation) -> Self {
        self.implementations.insert(implementation);
        self
    }
}

/// Mapping from layout family to the descriptor of its generated class.
///
/// Persisted as a JSON object with a `mappings` table. Iteration order is sorted
/// by layout name so saved files are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataLog {
    mappings: BTreeMap<LayoutName, ClassDescriptor>,
}

impl MetadataLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_mappings(mappings: BTreeMap<LayoutName, ClassDescriptor>) -> Self {
        Self { mappings }
    }

    /// Loads a log from `path`.
    ///
    /// A missing file yields an empty log. A file that exists but cannot be read or
    /// parsed is an error; callers on the resolution path recover from it.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        Ok(read_log_file(path)?
            .map(|file| Self::from_mappings(file.mappings))
            .unwrap_or_default())
    }

    /// Saves the log to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let file = LogFile {
            format_version: FORMAT_VERSION,
            mappings: self.mappings.clone(),
            ..LogFile::default()
        };
        write_log_file(path, &file)
    }

    /// Returns a read-only view of all mappings.
    pub fn mappings(&self) -> &BTreeMap<LayoutName, ClassDescriptor> {
        &self.mappings
    }

    /// Returns the descriptor for a layout family.
    pub fn get(&self, name: &str) -> Option<&ClassDescriptor> {
        self.mappings.get(name)
    }

    /// Returns `true` if the log has a descriptor for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.mappings.contains_key(name)
    }

    /// Inserts or overwrites the descriptor for a layout family.
    pub fn put(&mut self, name: impl Into<LayoutName>, descriptor: ClassDescriptor) {
        self.mappings.insert(name.into(), descriptor);
    }

    /// Folds every mapping of `other` into this log; `other` wins on collisions.
    pub fn put_all(&mut self, other: &MetadataLog) {
        for (name, descriptor) in &other.mappings {
            self.put(name.clone(), descriptor.clone());
        }
    }

    /// Keeps only the mappings for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &ClassDescriptor) -> bool) {
        self.mappings.retain(|name, descriptor| keep(name, descriptor));
    }

    /// Returns the number of mappings.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns `true` if the log has no mappings.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Returns every layout name whose descriptor differs between the two logs,
    /// including names present on only one side.
    pub fn diff(&self, other: &MetadataLog) -> BTreeSet<LayoutName> {
        let mut diff = BTreeSet::new();
        for (name, descriptor) in &other.mappings {
            if self.mappings.get(name) != Some(descriptor) {
                diff.insert(name.clone());
            }
        }
        for (name, descriptor) in &self.mappings {
            if other.mappings.get(name) != Some(descriptor) {
                diff.insert(name.clone());
            }
        }
        diff
    }

    /// Returns the qualified class names of the given layout names, skipping
    /// names this log does not know.
    pub fn qualified_names<'a>(
        &self,
        names: impl IntoIterator<Item = &'a LayoutName>,
    ) -> BTreeSet<String> {
        names
            .into_iter()
            .filter_map(|name| self.mappings.get(name))
            .map(|descriptor| descriptor.qualified_name.clone())
            .collect()
    }

    /// Returns implementation tags that appear under more than one layout name,
    /// with the names that claim each of them.
    pub fn duplicate_tags(&self) -> BTreeMap<String, BTreeSet<LayoutName>> {
        let mut owners: BTreeMap<String, BTreeSet<LayoutName>> = BTreeMap::new();
        for (name, descriptor) in &self.mappings {
            for implementation in &descriptor.implementations {
                owners
                    .entry(implementation.tag.clone())
                    .or_default()
                    .insert(name.clone());
            }
        }
        owners.retain(|_, names| names.len() > 1);
        owners
    }
}
