//! The outcome of a resolution run and the step that persists the next log.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use layoutbind_store::{
    publish_artifact, DependencyLog, DescriptorHasher, MetadataLog, StoreError,
};

use crate::args::ResolverArgs;

/// Why a run could not reuse the previous log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullBuildReason {
    /// The caller asked for a non-incremental build.
    NotIncremental,
    /// No log was found in the log folder.
    MissingLog,
    /// The log exists but could not be read, parsed, or understood.
    CorruptLog(String),
}

impl fmt::Display for FullBuildReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotIncremental => write!(f, "non-incremental build requested"),
            Self::MissingLog => write!(f, "no previous dependency log"),
            Self::CorruptLog(reason) => write!(f, "previous dependency log unusable: {reason}"),
        }
    }
}

/// How a result was computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionMode {
    /// The previous log was reused.
    Incremental,
    /// Everything is regenerated.
    Full(FullBuildReason),
}

impl ResolutionMode {
    /// Returns `true` for a full build.
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }
}

/// What the generator must do in this run.
#[derive(Debug, Clone)]
pub struct ResolutionResult {
    /// Qualified names of previously generated classes that are stale.
    pub invalidated_classes: BTreeSet<String>,
    /// Descriptor files that must be parsed again.
    pub files_to_consider: BTreeSet<PathBuf>,
    /// Every class visible to this module without reparsing: unchanged local
    /// classes plus upstream classes not shadowed by a local family.
    pub existing_binding_classes: MetadataLog,
    /// The previous log with every invalidated family and its edges removed.
    pub unchanged_log: DependencyLog,
    /// Whether the previous log was reused.
    pub mode: ResolutionMode,
    pub(crate) dependency_classes: MetadataLog,
    pub(crate) present_files: BTreeSet<PathBuf>,
}

impl ResolutionResult {
    /// Upstream classes merged during this run.
    pub fn dependency_classes(&self) -> &MetadataLog {
        &self.dependency_classes
    }

    /// Descriptor files present in the descriptor folder during this run.
    pub fn present_files(&self) -> &BTreeSet<PathBuf> {
        &self.present_files
    }

    /// Assembles the log the next run should start from.
    ///
    /// `fresh` holds the classes and edges produced by regenerating
    /// [`files_to_consider`](Self::files_to_consider); it wins over the unchanged
    /// log. The upstream view and descriptor fingerprints of this run are
    /// stamped onto the result.
    pub fn next_log(&self, fresh: &DependencyLog) -> DependencyLog {
        let mut next = self.unchanged_log.clone();
        next.merge_from(fresh);
        next.set_dependency_classes(self.dependency_classes.clone());
        next.set_input_fingerprints(DescriptorHasher::fingerprint(&self.present_files).hashes);
        next
    }

    /// Writes [`next_log`](Self::next_log) into `log_dir` and returns it.
    pub fn persist(&self, log_dir: &Path, fresh: &DependencyLog) -> Result<DependencyLog, StoreError> {
        let next = self.next_log(fresh);
        let path = DependencyLog::path_in(log_dir);
        next.save(&path)?;
        tracing::debug!(
            path = %path.display(),
            classes = next.class_log().len(),
            "persisted dependency log"
        );
        Ok(next)
    }

    /// Persists the next log and, when `args` names an artifact folder,
    /// publishes the module's classes there for downstream modules.
    ///
    /// Returns the persisted log.
    pub fn finish(
        &self,
        args: &ResolverArgs,
        fresh: &DependencyLog,
    ) -> Result<DependencyLog, StoreError> {
        let next = self.persist(&args.log_dir, fresh)?;
        if let Some(dir) = &args.artifact_dir {
            let path = publish_artifact(dir, &args.package, next.class_log())?;
            tracing::debug!(
                path = %path.display(),
                classes = next.class_log().len(),
                "published module artifact"
            );
        }
        Ok(next)
    }
}
