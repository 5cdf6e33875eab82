//! Diagnostic codes with category prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
///
/// `W101` is a problem with an input artifact, `I201` explains an
/// incremental-build decision such as a fallback to a full build.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Error diagnostics, prefixed with `E`.
    Error,
    /// Problems with inputs that were recovered from, prefixed with `W`.
    Warning,
    /// Incremental-build decisions, prefixed with `I`.
    Incremental,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Incremental => 'I',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

/// Codes emitted by the resolver and the dependency artifact merger.
pub mod codes {
    use super::{Category, DiagnosticCode};

    /// A dependency artifact could not be read or parsed and was skipped.
    pub const INVALID_DEPENDENCY_ARTIFACT: DiagnosticCode =
        DiagnosticCode::new(Category::Warning, 101);
    /// A file in a dependency folder does not follow the artifact naming schema.
    pub const UNRECOGNIZED_ARTIFACT_FILE: DiagnosticCode =
        DiagnosticCode::new(Category::Warning, 102);
    /// An external class is shadowed by a local layout family of the same name.
    pub const SHADOWED_EXTERNAL_CLASS: DiagnosticCode =
        DiagnosticCode::new(Category::Warning, 103);
    /// No previous log exists for an incremental request.
    pub const MISSING_LOG: DiagnosticCode = DiagnosticCode::new(Category::Incremental, 201);
    /// The previous log could not be read, parsed, or has an unsupported schema.
    pub const CORRUPT_LOG: DiagnosticCode = DiagnosticCode::new(Category::Incremental, 202);
    /// A non-incremental build was requested.
    pub const FULL_BUILD_REQUESTED: DiagnosticCode =
        DiagnosticCode::new(Category::Incremental, 203);
}
