use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignatureError {
    /// The garbled buffer handed to the encoder was not made of whole 3-byte groups.
    #[error("signature assembly produced {len} bytes, expected a multiple of 3")]
    Assembly { len: usize },

    #[error("input is not representable as ISO-8859-1: {input}")]
    NonLatin1 { input: String },

    #[error("hex digest expected, got: {0}")]
    InvalidDigest(String),

    #[error("stream cipher key must not be empty")]
    EmptyKey,
}

pub type Result<T> = std::result::Result<T, SignatureError>;
