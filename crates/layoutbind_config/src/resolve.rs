//! Path resolution: anchoring configured folders at the project directory.

use crate::types::ModuleConfig;
use std::path::{Path, PathBuf};

/// A module configuration with every folder resolved to a usable path.
///
/// Relative paths from `layoutbind.toml` are joined onto the project directory;
/// absolute paths are kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// The module package.
    pub package: String,
    /// Folder of descriptor files.
    pub info_dir: PathBuf,
    /// Folders of upstream artifacts, in configuration order.
    pub dependency_dirs: Vec<PathBuf>,
    /// Folder holding the dependency log.
    pub log_dir: PathBuf,
    /// Folder this module publishes its artifact into.
    pub artifact_dir: PathBuf,
    /// Whether incremental resolution is enabled.
    pub incremental: bool,
}

/// Resolves every configured folder against `project_dir`.
pub fn resolve_paths(config: &ModuleConfig, project_dir: &Path) -> ResolvedPaths {
    let anchor = |raw: &str| -> PathBuf {
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_dir.join(path)
        }
    };

    ResolvedPaths {
        package: config.module.package.clone(),
        info_dir: anchor(&config.paths.info_dir),
        dependency_dirs: config
            .paths
            .dependency_dirs
            .iter()
            .map(|d| anchor(d))
            .collect(),
        log_dir: anchor(&config.paths.log_dir),
        artifact_dir: anchor(&config.paths.artifact_dir),
        incremental: config.build.incremental,
    }
}
