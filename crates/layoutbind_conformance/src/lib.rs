//! Conformance test helpers for incremental binding-class resolution.
//!
//! Provides a throwaway module layout on disk (descriptor folder, upstream
//! artifact folder, log folder) and a compact summary of a resolution result
//! for assertion in integration tests.

#![warn(missing_docs)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use layoutbind_common::DescriptorName;
use layoutbind_diagnostics::{Diagnostic, DiagnosticSink};
use layoutbind_resolve::{resolve, ResolutionResult, ResolverArgs};
use layoutbind_store::{
    publish_artifact, ClassDescriptor, DependencyLog, Implementation, MetadataLog,
};
use tempfile::TempDir;

/// Package used for every fixture class.
pub const MODULE_PACKAGE: &str = "android.x";

/// Package of the module under test.
pub const APP_PACKAGE: &str = "foo.bar.baz";

/// A module on disk: descriptor, upstream artifact, and log folders in a temp dir.
pub struct ModuleFixture {
    dir: TempDir,
}

/// The outcome of one resolution, reduced to comparable sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Qualified names of invalidated classes.
    pub invalidated: BTreeSet<String>,
    /// File names of descriptors to reparse.
    pub files: BTreeSet<String>,
    /// Layout names of every class visible without reparsing.
    pub existing: BTreeSet<String>,
    /// Layout names kept in the unchanged log.
    pub unchanged: BTreeSet<String>,
}

impl Snapshot {
    /// Reduces a result to its comparable sets.
    pub fn of(result: &ResolutionResult) -> Self {
        Self {
            invalidated: result.invalidated_classes.clone(),
            files: result
                .files_to_consider
                .iter()
                .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
                .collect(),
            existing: keys(&result.existing_binding_classes),
            unchanged: keys(result.unchanged_log.class_log()),
        }
    }
}

/// A resolution result together with the diagnostics it produced.
pub struct Run {
    /// The result.
    pub result: ResolutionResult,
    /// Diagnostics recorded while resolving.
    pub diagnostics: Vec<Diagnostic>,
}

impl Run {
    /// Shorthand for [`Snapshot::of`].
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.result)
    }

    /// Returns `true` if a diagnostic with the given code was recorded.
    pub fn has_code(&self, code: layoutbind_diagnostics::DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }
}

impl ModuleFixture {
    /// Creates an empty module.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("info")).unwrap();
        std::fs::create_dir_all(dir.path().join("deps")).unwrap();
        Self { dir }
    }

    /// Root of the module.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Descriptor folder.
    pub fn info_dir(&self) -> PathBuf {
        self.root().join("info")
    }

    /// Upstream artifact folder.
    pub fn deps_dir(&self) -> PathBuf {
        self.root().join("deps")
    }

    /// Log folder.
    pub fn log_dir(&self) -> PathBuf {
        self.root().join("log")
    }

    /// Path a descriptor would have, without creating it.
    pub fn info_path(&self, family: &str, config: Option<&str>) -> PathBuf {
        let name = DescriptorName {
            family: family.to_string(),
            config: config.map(String::from),
        };
        self.info_dir().join(name.file_name())
    }

    /// Writes a descriptor file for a layout family and optional configuration.
    pub fn create_info_file(&self, family: &str, config: Option<&str>) -> PathBuf {
        let path = self.info_path(family, config);
        std::fs::write(&path, format!("<layout name=\"{family}\"/>")).unwrap();
        path
    }

    /// Overwrites a descriptor file with new content.
    pub fn touch(&self, path: &Path) {
        let previous = std::fs::read_to_string(path).unwrap_or_default();
        std::fs::write(path, format!("{previous}<!-- edited -->")).unwrap();
    }

    /// Deletes a descriptor file.
    pub fn delete(&self, path: &Path) {
        std::fs::remove_file(path).unwrap();
    }

    /// Writes the previous build's log.
    pub fn write_log(&self, log: &DependencyLog) {
        log.save(&DependencyLog::path_in(&self.log_dir())).unwrap();
    }

    /// Reads back the log in the log folder.
    pub fn read_log(&self) -> DependencyLog {
        DependencyLog::load(&DependencyLog::path_in(&self.log_dir())).unwrap()
    }

    /// Publishes an upstream module's artifact into the dependency folder.
    pub fn write_artifact(&self, package: &str, classes: &MetadataLog) -> PathBuf {
        publish_artifact(&self.deps_dir(), package, classes).unwrap()
    }

    /// Resolver arguments for this module.
    pub fn args(&self) -> ResolverArgs {
        ResolverArgs::new(APP_PACKAGE, &self.info_dir(), &self.log_dir())
            .with_dependency_dir(self.deps_dir())
    }

    /// Runs the resolver.
    pub fn resolve(&self, args: &ResolverArgs) -> Run {
        let sink = DiagnosticSink::new();
        let result = resolve(args, &sink).unwrap();
        Run {
            result,
            diagnostics: sink.take_all(),
        }
    }
}

impl Default for ModuleFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The generated class of a layout family: `foo` becomes `com.Foo`.
pub fn create_class(family: &str) -> ClassDescriptor {
    let qualified_name = format!("com.{}", capitalize(family));
    ClassDescriptor::new(&qualified_name, MODULE_PACKAGE).with_implementation(
        Implementation::new(family, false, format!("{qualified_name}Impl")),
    )
}

/// A log with one generated class per family.
pub fn log_of(families: &[&str]) -> DependencyLog {
    let mut log = DependencyLog::new();
    for family in families {
        log.class_log_mut().put(*family, create_class(family));
    }
    log
}

/// A class table with one generated class per family.
pub fn classes_of(families: &[&str]) -> MetadataLog {
    let mut classes = MetadataLog::new();
    for family in families {
        classes.put(*family, create_class(family));
    }
    classes
}

/// Collects string slices into an owned set.
pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn keys(log: &MetadataLog) -> BTreeSet<String> {
    log.mappings().keys().cloned().collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_naming() {
        assert_eq!(create_class("foo").qualified_name, "com.Foo");
        assert_eq!(create_class("fooLand").qualified_name, "com.FooLand");
    }

    #[test]
    fn info_file_naming() {
        let module = ModuleFixture::new();
        let plain = module.create_info_file("foo", None);
        let land = module.create_info_file("foo", Some("land"));
        assert_eq!(plain.file_name().unwrap(), "foo-layout.xml");
        assert_eq!(land.file_name().unwrap(), "foo-layout-land.xml");
    }
}
