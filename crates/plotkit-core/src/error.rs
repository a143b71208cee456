// File: crates/plotkit-core/src/error.rs
// Summary: Codec error taxonomy. Geometry routines are infallible and have no errors.

/// Convenience result type for PNG encode/decode.
pub type PngResult<T> = Result<T, PngError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PngError {
    /// The first eight bytes are not the PNG signature.
    #[error("not a PNG stream (invalid signature)")]
    InvalidSignature,

    /// The stream ended while reading `context`.
    #[error("unexpected end of data while reading {context}")]
    UnexpectedEof { context: &'static str },

    /// Structurally invalid stream.
    #[error("invalid PNG data: {0}")]
    Format(String),

    /// Valid PNG, but a profile this codec does not handle.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("CRC mismatch in {chunk} chunk (expected {expected:#010x}, computed {actual:#010x})")]
    CrcMismatch { chunk: String, expected: u32, actual: u32 },

    #[error("Adler-32 mismatch in zlib stream (expected {expected:#010x}, computed {actual:#010x})")]
    AdlerMismatch { expected: u32, actual: u32 },

    /// Zero-width or zero-height pixel buffer.
    #[error("cannot encode an empty image")]
    EmptyImage,
}

impl PngError {
    /// Build a [`PngError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`PngError::NotImplemented`] value.
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Self::NotImplemented(msg.into())
    }

    pub(crate) fn eof(context: &'static str) -> Self {
        Self::UnexpectedEof { context }
    }
}
