//! How serious a recorded condition is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic, least serious first.
///
/// Only [`Error`](Severity::Error) means the build step failed. Everything the
/// resolver itself records is at most a warning, since it always recovers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Context about a choice the caller made, such as a requested full build.
    Help,
    /// Something worth knowing that changes no output, such as a missing log.
    Note,
    /// Damaged input that was skipped or replaced.
    Warning,
    /// The step could not complete.
    Error,
}

impl Severity {
    /// Returns `true` for [`Severity::Error`].
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Lowercase name used in rendered output.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Help => "help",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// ANSI foreground color code for terminal output.
    pub(crate) fn ansi_color(self) -> &'static str {
        match self {
            Severity::Help => "32",
            Severity::Note => "36",
            Severity::Warning => "33",
            Severity::Error => "31",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_serious_first() {
        let mut all = vec![Severity::Error, Severity::Help, Severity::Warning, Severity::Note];
        all.sort();
        assert_eq!(
            all,
            vec![Severity::Help, Severity::Note, Severity::Warning, Severity::Error]
        );
    }

    #[test]
    fn only_error_fails() {
        assert!(Severity::Error.is_error());
        assert!(!Severity::Warning.is_error());
        assert!(!Severity::Help.is_error());
    }

    #[test]
    fn labels() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Help.label(), "help");
    }

    #[test]
    fn serialized_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Note).unwrap(), "\"note\"");
    }
}
