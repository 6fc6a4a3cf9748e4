//! Diagnostic catalog
//!
//! Every finding the checker can raise, paired with its default severity.
//! The catalog is fixed at compile time; the only runtime state is the
//! lookup-key table, built once on the first override request.

use crate::policy::Severity;
use std::collections::HashMap;
use std::sync::OnceLock;

macro_rules! declare_messages {
    ($($variant:ident => $severity:ident,)+) => {
        /// Identifier of a diagnostic the checker can raise
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MessageId {
            $($variant,)+
        }

        impl MessageId {
            /// Every diagnostic, in catalog order
            pub const ALL: &'static [MessageId] = &[$(MessageId::$variant,)+];

            fn variant_name(self) -> &'static str {
                match self {
                    $(MessageId::$variant => stringify!($variant),)+
                }
            }

            /// Severity before any user override
            pub fn default_severity(self) -> Severity {
                match self {
                    $(MessageId::$variant => Severity::$severity,)+
                }
            }
        }
    };
}

declare_messages! {
    // fatal errors
    NulInHeader => Fatal,
    UnterminatedHeader => Fatal,
    // errors
    BadDate => Error,
    BadDateOverflow => Error,
    BadEmail => Error,
    BadName => Error,
    BadObjectSha1 => Error,
    BadParentSha1 => Error,
    BadTagObject => Error,
    BadTimezone => Error,
    BadTree => Error,
    BadTreeSha1 => Error,
    BadType => Error,
    DuplicateEntries => Error,
    MissingAuthor => Error,
    MissingCommitter => Error,
    MissingEmail => Error,
    MissingGraft => Error,
    MissingNameBeforeEmail => Error,
    MissingObject => Error,
    MissingParent => Error,
    MissingSpaceBeforeDate => Error,
    MissingSpaceBeforeEmail => Error,
    MissingTag => Error,
    MissingTagEntry => Error,
    MissingTagObject => Error,
    MissingTree => Error,
    MissingType => Error,
    MissingTypeEntry => Error,
    MultipleAuthors => Error,
    TagObjectNotTag => Error,
    TreeNotSorted => Error,
    UnknownType => Error,
    ZeroPaddedDate => Error,
    // warnings
    BadFilemode => Warn,
    EmptyName => Warn,
    FullPathname => Warn,
    HasDot => Warn,
    HasDotdot => Warn,
    HasDotgit => Warn,
    NullSha1 => Warn,
    ZeroPaddedFilemode => Warn,
    // infos (reported as warnings, but ignored by default)
    BadTagName => Info,
    MissingTaggerEntry => Info,
}

impl MessageId {
    /// Stable UPPER_SNAKE identifier, e.g. `MISSING_EMAIL`
    pub fn symbol(self) -> String {
        let mut out = String::new();
        for (i, c) in self.variant_name().chars().enumerate() {
            if i > 0 && c.is_ascii_uppercase() {
                out.push('_');
            }
            out.push(c.to_ascii_uppercase());
        }
        out
    }

    /// Label used in emitted messages: the symbolic name with each
    /// underscore dropped and the byte after it kept as-is, so
    /// `BAD_DATE` renders as `badDate`
    pub(crate) fn label(self) -> String {
        let name = self.variant_name();
        let mut chars = name.chars();
        let mut out = String::with_capacity(name.len());
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_lowercase());
        }
        out.extend(chars);
        out
    }

    /// Lookup key: lowercase with underscores removed
    fn key(self) -> String {
        self.variant_name().to_ascii_lowercase()
    }
}

/// Resolve a user-supplied id key
///
/// Keys are case-insensitive and underscores are ignored, so
/// `MISSING_EMAIL`, `missingEmail` and `missingemail` all resolve.
pub fn parse_message_id(text: &str) -> Option<MessageId> {
    static KEYS: OnceLock<HashMap<String, MessageId>> = OnceLock::new();
    let keys = KEYS.get_or_init(|| {
        MessageId::ALL
            .iter()
            .map(|&id| (id.key(), id))
            .collect()
    });

    let mut normalized: String = text.chars().filter(|&c| c != '_').collect();
    normalized.make_ascii_lowercase();
    keys.get(&normalized).copied()
}
