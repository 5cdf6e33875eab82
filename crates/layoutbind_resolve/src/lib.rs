//! Incremental resolution for binding-class generation.
//!
//! Given the dependency log written by the previous build, the descriptor files
//! that changed since then, and the class artifacts of upstream modules,
//! [`resolve`] decides which generated classes are stale, which descriptor files
//! must be parsed again, and which metadata can be carried forward untouched.
//! Anything that makes the previous log untrustworthy degrades to a full build.

#![warn(missing_docs)]

pub mod args;
pub mod descriptors;
pub mod graph;
pub mod resolver;
pub mod result;

pub use args::ResolverArgs;
pub use descriptors::{family_of, list_descriptor_files};
pub use graph::DependencyGraph;
pub use resolver::resolve;
pub use result::{FullBuildReason, ResolutionMode, ResolutionResult};
