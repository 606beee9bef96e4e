//! Error types for encoding and decoding.

use crate::registry::TagCode;

/// Errors from codec operations.
///
/// Every variant is a local, deterministic failure: nothing here is
/// retryable, and no partially written buffer is ever handed out alongside
/// one of these.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    /// `close()` with no open element, `finish()` with elements still open,
    /// or an `END` token with nothing to close.
    #[error("unbalanced element: {0}")]
    UnbalancedElement(&'static str),

    /// The registry has no entry for a tag or for a `(page, code)` pair.
    #[error("unknown tag: {0}")]
    UnknownTag(String),

    /// A registry produced a code that does not fit in a tag byte.
    #[error("tag code {code:#04x} on page {page} is outside 0x05..=0x3f")]
    CodeOutOfRange { page: u8, code: u8 },

    /// Input ended before a terminator or a declared length was satisfied.
    #[error("truncated input: needed {needed} more byte(s) at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    /// A variable-length integer ran past the byte limit or overflowed `u32`.
    #[error("malformed variable-length integer at offset {offset}")]
    MalformedLength { offset: usize },

    /// An inline string value contained a NUL byte.
    #[error("inline string contains a NUL terminator at byte {position}")]
    EmbeddedTerminator { position: usize },

    /// A global token or tag form this codec does not model.
    #[error("unsupported token 0x{token:02x} at offset {offset}")]
    UnsupportedToken { token: u8, offset: usize },

    #[error("inline string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    #[error("element value {0:?} is not an integer")]
    InvalidInteger(String),

    /// An element mixes text, opaque data or children.
    #[error("element {0} has mixed content")]
    MixedContent(String),

    /// Two registry entries claim the same name or the same `(page, code)`.
    #[error("duplicate tag entry: {0}")]
    DuplicateTag(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn unknown_code(code: TagCode) -> Self {
        Self::UnknownTag(format!("page {} code 0x{:02x}", code.page, code.code))
    }
}

impl From<toml::de::Error> for CodecError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias for codec operations.
pub type Result<T> = core::result::Result<T, CodecError>;
