use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A document could not be decoded into the requested shape.
    #[error("malformed {kind}: {message}")]
    Malformed { kind: &'static str, message: String },

    #[error("invalid quantity {input:?}: {reason}")]
    InvalidQuantity { input: String, reason: &'static str },

    /// A closed enumeration received a literal outside its set.
    #[error("unknown {kind} {value:?} (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("expected {expected}, got {actual}")]
    UnexpectedKind { expected: String, actual: String },

    #[error("kind {0} is already registered")]
    DuplicateKind(String),

    #[error("kind {0} is not registered")]
    UnknownKind(String),

    #[error("schema generation failed: {0}")]
    Schema(String),
}

impl Error {
    pub(crate) fn malformed(kind: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Malformed {
            kind,
            message: err.to_string(),
        }
    }

    pub(crate) fn unknown_variant(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}
