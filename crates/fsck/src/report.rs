//! Diagnostic reporting
//!
//! Applies the severity policy to a finding and hands the survivors to the
//! configured sink, framed as `<label>: <text>`.

use crate::catalog::MessageId;
use crate::policy::{FsckOptions, Severity};
use std::fmt;
use strata_core::Object;

/// Receives every delivered diagnostic
///
/// The return value feeds the caller's tally: zero for findings that should
/// not fail verification, positive to count an error, negative to abort the
/// surrounding check.
pub trait Sink {
    fn emit(&mut self, object: Option<&Object>, severity: Severity, message: &str) -> i32;
}

/// Stock sink writing findings through `tracing`
///
/// Warnings return 0 and errors return 1, so summed sink returns give an
/// error count.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl Sink for LogSink {
    fn emit(&mut self, object: Option<&Object>, severity: Severity, message: &str) -> i32 {
        if severity == Severity::Error {
            match object {
                Some(object) => tracing::error!("object {}: {}", object.id, message),
                None => tracing::error!("{}", message),
            }
            1
        } else {
            match object {
                Some(object) => tracing::warn!("object {}: {}", object.id, message),
                None => tracing::warn!("{}", message),
            }
            0
        }
    }
}

/// Emit one diagnostic, honoring severity overrides and the skip-list
///
/// Returns the sink's verdict, or zero when the finding was suppressed. A
/// zero return always means "keep checking".
pub(crate) fn report(
    options: &mut FsckOptions,
    object: Option<&Object>,
    id: MessageId,
    text: fmt::Arguments<'_>,
) -> i32 {
    let severity = options.effective_severity(id);
    if severity == Severity::Ignore {
        return 0;
    }
    // Info-level findings surface only when explicitly raised to warn or
    // error via an override.
    if severity == Severity::Info {
        return 0;
    }
    if let Some(object) = object {
        if options.skiplist.contains(&object.id) {
            return 0;
        }
    }

    let severity = if severity == Severity::Fatal {
        Severity::Error
    } else {
        severity
    };
    let message = format!("{}: {}", id.label(), text);
    options.sink.emit(object, severity, &message)
}
