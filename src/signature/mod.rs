//! X-Bogus request signing
//!
//! The remote web API rejects any query string that does not carry an
//! `X-Bogus` token derived from the user agent, the query itself, the current
//! second and a fixed constant. This module reproduces that derivation
//! byte for byte.
//!
//! ## Key Components
//!
//! - [`XBogus`] - Signer bound to one user agent
//! - [`SignedQuery`] - Query string with the token appended
//! - [`packing`] - Hex nibbles, dual-mode MD5, RC4 and the 4-char encoder
//!
//! ## Example
//!
//! ```rust,ignore
//! use dyfetch::signature::XBogus;
//!
//! let signer = XBogus::new(user_agent)?;
//! let signed = signer.sign("aweme_id=7300000000000000000")?;
//! println!("{}", signed.query);
//! ```

mod error;
pub mod packing;
mod xbogus;

pub use error::{Result, SignatureError};
pub use xbogus::{FIXED_CONSTANT, SignedQuery, XBogus};
