use thiserror::Error;

use crate::config::ConfigError;
use crate::dispatch::TransportError;
use crate::params::CatalogError;
use crate::signature::SignatureError;

/// Errors surfaced to callers of the crate.
///
/// Ordinary remote failures are not errors: they surface as `Ok(None)`.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("signing failed: {0}")]
    Signature(#[from] SignatureError),

    #[error("invalid fingerprint catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, Error>;
