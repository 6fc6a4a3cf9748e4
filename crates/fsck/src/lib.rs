//! Strata object consistency checker
//!
//! Validates the canonical byte form of store objects (blob, tree, commit,
//! tag) and reports findings through a configurable severity policy:
//! - Diagnostic catalog with per-id default severities
//! - Severity overrides, strict mode and a per-object skip-list
//! - Format validators for the four object kinds
//! - Reference walker enumerating an object's direct references
//!
//! Validators return signed verdicts: negative for structural failure,
//! zero for clean, positive for the summed sink returns of emitted
//! diagnostics. Configuration mistakes are surfaced as `Result` errors
//! instead.

pub mod catalog;
pub mod policy;
pub mod report;
pub mod skiplist;
mod tree;
mod validate;
mod walk;

pub use catalog::MessageId;
pub use policy::{FsckOptions, Severity};
pub use report::{LogSink, Sink};
pub use skiplist::SkipList;
pub use validate::check;
pub use walk::walk;

/// Result type for checker configuration operations
pub type Result<T> = anyhow::Result<T>;
