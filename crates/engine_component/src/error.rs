//! Component-layer error types.

/// Errors produced when parsing a [`Uid`](crate::Uid) from its string form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UidParseError {
    /// The string was not exactly 32 characters long.
    #[error("expected 32 hex digits, got {0} characters")]
    Length(usize),

    /// The string contained a character that is not a hex digit.
    #[error("invalid hex digit {0:?}")]
    Digit(char),
}

/// Errors that can occur while decoding component payloads.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// A collision shape discriminant outside the known range.
    #[error("unknown collision shape {0}")]
    UnknownShape(u8),

    /// The payload of a known component tag did not match its schema.
    #[error("malformed {type_name} payload: {source}")]
    Payload {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
