//! Request parameter assembly
//!
//! Every call carries the browser fingerprint catalog, the caller's own
//! parameters and two nonces (`msToken`, `webid`) generated fresh for that
//! call.

mod builder;
mod fingerprint;
mod nonce;

pub use builder::{MS_TOKEN, ParameterBuilder, ParameterSet, WEBID};
pub use fingerprint::{CatalogError, DEFAULT_FINGERPRINT, FingerprintCatalog};
pub use nonce::{MS_TOKEN_LEN, NonceGenerator, Nonces, ms_token, webid};
