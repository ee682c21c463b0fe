//! Path-safe instance names
//!
//! Instance names may contain characters that are unsafe as manifest
//! members or filenames in the remote format (parentheses, quotes,
//! angle brackets). Names are therefore tracked in a percent-escaped
//! path-safe form, while diagnostics and transform callbacks always
//! see the natural user-facing form.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters escaped in the path-safe form: everything outside the
/// unreserved set, except the space character, which stays literal.
const NAME_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// An instance (API) name held in its path-safe form.
///
/// Ordered by the path-safe representation so that name sets iterate
/// deterministically. Unescaping always recovers the user-facing form
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiName(String);

impl ApiName {
    /// The special member meaning "all instances actually present".
    pub const WILDCARD: &'static str = "*";

    /// Create a name from its user-facing form, escaping it.
    ///
    /// The wildcard marker passes through unescaped.
    pub fn new(user_facing: &str) -> Self {
        if user_facing == Self::WILDCARD {
            return Self(Self::WILDCARD.to_string());
        }
        Self(utf8_percent_encode(user_facing, NAME_ESCAPE).to_string())
    }

    /// Adopt an already path-safe string, such as a file-name stem
    /// from a retrieve directory.
    pub fn from_escaped(escaped: impl Into<String>) -> Self {
        Self(escaped.into())
    }

    /// The path-safe form, used for file names and manifest members.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the user-facing form by reversing the escaping.
    pub fn user_facing(&self) -> String {
        percent_decode_str(&self.0).decode_utf8_lossy().into_owned()
    }

    pub fn is_wildcard(&self) -> bool {
        self.0 == Self::WILDCARD
    }
}

impl fmt::Display for ApiName {
    /// Displays the user-facing form; diagnostics never show escapes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_facing())
    }
}
