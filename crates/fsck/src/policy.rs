//! Severity policy engine
//!
//! Resolves the effective severity of every diagnostic from catalog
//! defaults, user overrides and strict mode, and carries the per-object
//! skip-list plus the diagnostic sink.

use crate::catalog::{parse_message_id, MessageId};
use crate::report::{LogSink, Sink};
use crate::skiplist::SkipList;
use anyhow::{bail, Context, Result};
use std::path::Path;
use strata_core::ObjectId;

/// Severity of a diagnostic
///
/// `Fatal` and `Info` exist only as catalog defaults: the reporter
/// collapses them to `Error` and `Warn` on delivery, and user overrides
/// cannot name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ignore,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    fn parse(word: &str) -> Result<Severity> {
        match word.to_ascii_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warn" => Ok(Severity::Warn),
            "ignore" => Ok(Severity::Ignore),
            _ => bail!("Unknown message severity: '{}'", word),
        }
    }
}

/// Checker configuration: severity policy, skip-list and diagnostic sink
///
/// One `FsckOptions` value must not be shared between a running validation
/// and a concurrent configuration change; disjoint values are independent.
pub struct FsckOptions {
    /// Promote warning-level defaults to errors
    pub strict: bool,
    /// Per-id severities; allocated lazily on the first override
    overrides: Option<Box<[Severity]>>,
    pub(crate) skiplist: SkipList,
    pub(crate) sink: Box<dyn Sink>,
}

impl Default for FsckOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FsckOptions {
    pub fn new() -> Self {
        Self {
            strict: false,
            overrides: None,
            skiplist: SkipList::new(),
            sink: Box::new(LogSink),
        }
    }

    /// Replace the diagnostic sink
    pub fn set_sink(&mut self, sink: Box<dyn Sink>) {
        self.sink = sink;
    }

    /// Suppress every diagnostic about the given object
    pub fn skip_object(&mut self, id: ObjectId) {
        self.skiplist.push(id);
    }

    /// The current skip-list
    pub fn skiplist(&self) -> &SkipList {
        &self.skiplist
    }

    /// Override one diagnostic's severity
    ///
    /// `id_key` is case-insensitive with underscores ignored;
    /// `severity_word` is one of `error`, `warn`, `ignore`. Demoting a
    /// fatal-by-default diagnostic below error is refused.
    pub fn set_severity(&mut self, id_key: &str, severity_word: &str) -> Result<()> {
        let id = parse_message_id(id_key)
            .with_context(|| format!("Unhandled message id: {}", id_key))?;
        let severity = Severity::parse(severity_word)?;

        if severity != Severity::Error && id.default_severity() == Severity::Fatal {
            bail!("Cannot demote {} to {}", id_key, severity_word);
        }

        // Seed the table with the severities effective right now, so a
        // later strict toggle does not reshuffle already-configured ids.
        let mut table: Box<[Severity]> = match self.overrides.take() {
            Some(table) => table,
            None => MessageId::ALL
                .iter()
                .map(|&id| self.effective_severity(id))
                .collect(),
        };
        table[id as usize] = severity;
        self.overrides = Some(table);
        Ok(())
    }

    /// Apply a compact configuration string
    ///
    /// Tokens are separated by space, comma or `|`; each is `KEY=VALUE` or
    /// `KEY:VALUE`. The key `skiplist` takes a file path and loads it; any
    /// other key is a diagnostic id and its value a severity word.
    pub fn apply_config_string(&mut self, values: &str) -> Result<()> {
        for token in values.split([' ', ',', '|']) {
            if token.is_empty() {
                continue;
            }
            let (key, value) = match token.split_once(['=', ':']) {
                Some((key, value)) => (key, Some(value)),
                None => (token, None),
            };

            if key.eq_ignore_ascii_case("skiplist") {
                let path = value.context("skiplist requires a path")?;
                self.skiplist
                    .load(Path::new(path))
                    .with_context(|| format!("Could not load skip list: {}", path))?;
                continue;
            }

            let value = value.with_context(|| format!("Missing '=': '{}'", token))?;
            self.set_severity(key, value)?;
        }
        Ok(())
    }

    /// Resolve the severity a diagnostic carries under this policy
    ///
    /// `Fatal` and `Info` pass through untouched; the reporter resolves
    /// them at delivery time.
    pub fn effective_severity(&self, id: MessageId) -> Severity {
        match &self.overrides {
            Some(table) => table[id as usize],
            None => {
                let severity = id.default_severity();
                if self.strict && severity == Severity::Warn {
                    Severity::Error
                } else {
                    severity
                }
            }
        }
    }
}
