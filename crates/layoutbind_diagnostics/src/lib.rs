//! Structured diagnostics for recovered conditions during incremental resolution.
//!
//! Resolution never aborts on a stale cache or a malformed upstream artifact; it
//! records a [`Diagnostic`] instead. The thread-safe [`DiagnosticSink`] accumulates
//! them, and [`TerminalRenderer`] formats them for the build log.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{codes, Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
