//! Error types for the tesseract engine
//!
//! Only configuration problems and credential intake failures are errors.
//! A denied rotation or an ambiguous drag is an ordinary outcome and is
//! reported through return values instead.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown shape: {0}")]
    UnknownShape(String),

    #[error("unknown rotation plane: {0}")]
    UnknownPlane(String),

    #[error("unknown key spec: {0}")]
    UnknownKeySpec(String),

    #[error("invalid key spec: {0}")]
    InvalidKeySpec(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl Error {
    /// Configuration errors are raised while building a session and are not
    /// recoverable internally.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnknownShape(_)
                | Error::UnknownPlane(_)
                | Error::UnknownKeySpec(_)
                | Error::InvalidKeySpec(_)
                | Error::InvalidConfig(_)
                | Error::Config(_)
        )
    }
}

/// Reasons a credential payload never reached (or failed inside) the verifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("credential payload is too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("unsupported credential content type: {0}")]
    UnsupportedContentType(String),

    #[error("malformed credential payload: {0}")]
    Malformed(String),

    #[error("credential verifier fault: {0}")]
    VerifierFault(String),
}
