//! Configuration types deserialized from `layoutbind.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// Default folder holding the per-variant descriptor files.
pub const DEFAULT_INFO_DIR: &str = "build/layout-info";
/// Default folder holding artifacts published by upstream modules.
pub const DEFAULT_DEPENDENCY_DIR: &str = "build/dependency-classes";
/// Default per-module folder holding the dependency log.
pub const DEFAULT_LOG_DIR: &str = "build/binder-log";
/// Default folder this module publishes its own artifact into.
pub const DEFAULT_ARTIFACT_DIR: &str = "build/published-classes";

/// The top-level configuration parsed from `layoutbind.toml`.
#[derive(Debug, Deserialize)]
pub struct ModuleConfig {
    /// The module being built.
    pub module: ModuleMeta,
    /// Input and output folders, relative to the project directory.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Identity of the module whose binding classes are generated.
#[derive(Debug, Deserialize)]
pub struct ModuleMeta {
    /// Package of the module (the same package its resource class lives in).
    pub package: String,
}

/// Folders read and written by the resolver.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Folder containing one descriptor file per layout configuration variant.
    #[serde(default = "default_info_dir")]
    pub info_dir: String,
    /// Folders containing artifacts exported by upstream modules.
    ///
    /// Accepts either a single string or a list of strings.
    #[serde(
        default = "default_dependency_dirs",
        deserialize_with = "deserialize_string_or_vec"
    )]
    pub dependency_dirs: Vec<String>,
    /// Folder holding this module's dependency log between builds.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// Folder this module publishes its artifact into for dependents.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            info_dir: default_info_dir(),
            dependency_dirs: default_dependency_dirs(),
            log_dir: default_log_dir(),
            artifact_dir: default_artifact_dir(),
        }
    }
}

fn default_info_dir() -> String {
    DEFAULT_INFO_DIR.to_string()
}

fn default_dependency_dirs() -> Vec<String> {
    vec![DEFAULT_DEPENDENCY_DIR.to_string()]
}

fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}

fn default_artifact_dir() -> String {
    DEFAULT_ARTIFACT_DIR.to_string()
}

/// Build settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    /// Whether the previous dependency log may be reused. Defaults to `true`.
    #[serde(default = "default_incremental")]
    pub incremental: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            incremental: default_incremental(),
        }
    }
}

fn default_incremental() -> bool {
    true
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `dependency_dirs = "deps"` as well as `dependency_dirs = ["a", "b"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
