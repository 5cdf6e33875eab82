//! Persisted metadata for incremental binding-class generation.
//!
//! This crate owns the on-disk formats the resolver works from: the
//! [`MetadataLog`] mapping layout families to generated-class descriptors, the
//! [`DependencyLog`] that adds "depends on" edges between families, the artifacts
//! upstream modules publish for their dependents, and descriptor fingerprints for
//! change detection.

#![warn(missing_docs)]

pub mod artifact;
pub mod dependency_log;
pub mod error;
pub mod hasher;
pub mod metadata;
mod schema;

pub use artifact::{
    load_artifact, merge_artifacts, publish_artifact, ArtifactName, MergedArtifacts,
    ARTIFACT_SUFFIX,
};
pub use dependency_log::{DependencyLog, LOG_FILE_NAME};
pub use error::StoreError;
pub use hasher::{ChangeSet, DescriptorHasher, Fingerprints};
pub use metadata::{ClassDescriptor, Implementation, MetadataLog};
pub use schema::FORMAT_VERSION;
