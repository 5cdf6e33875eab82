//! Shared foundational types used across the layoutbind workspace.
//!
//! This crate provides content fingerprints for descriptor files and the naming
//! convention that maps a physical descriptor file to its layout family.

#![warn(missing_docs)]

pub mod descriptor_name;
pub mod hash;

pub use descriptor_name::{DescriptorName, DESCRIPTOR_EXT, LAYOUT_MARKER};
pub use hash::{ContentHash, ParseHashError};

/// Key identifying a logical layout family: every configuration variant of one
/// layout resource shares it (e.g. `main_activity` for both the default and the
/// landscape file).
pub type LayoutName = String;
