//! Route segment derivation.
//!
//! Plugin ids are arbitrary strings and may contain `/`, `?`, `%` or
//! non-ASCII text. The gateway addresses routes by a single path component,
//! so the id is base64 encoded with the URL-safe alphabet and no padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::fmt;

/// Gateway-safe path component derived from a plugin id.
///
/// Only [`encode_segment`] constructs this type, so a value always holds
/// characters from `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteSegment(String);

impl RouteSegment {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteSegment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encode a plugin id into its route segment.
pub fn encode_segment(id: impl AsRef<[u8]>) -> RouteSegment {
    RouteSegment(URL_SAFE_NO_PAD.encode(id.as_ref()))
}
