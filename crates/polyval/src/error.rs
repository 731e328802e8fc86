/// Errors for [`Polyval`](crate::Polyval).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolyvalError {
    /// The key is not [`KEY_SIZE`](crate::KEY_SIZE) bytes long.
    #[error("invalid key length, expected {expected}, got {actual}")]
    KeyLength {
        /// Required length.
        expected: usize,
        /// Length that was provided.
        actual: usize,
    },
    /// The input is empty or not a whole number of blocks.
    #[error("invalid input length {0}, must be a positive multiple of {bs}", bs = crate::BLOCK_SIZE)]
    InputLength(usize),
    /// A serialized state could not be decoded.
    #[error("invalid serialized state: {0}")]
    InvalidState(#[from] StateError),
}

/// Reasons a serialized state is rejected.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
    #[error("unrecognized magic")]
    Magic,
    #[error("unsupported version {0}")]
    Version(u8),
}
