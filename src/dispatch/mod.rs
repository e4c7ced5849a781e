//! Signed request dispatch with bounded retries
//!
//! One logical call builds fresh parameters, signs them when the endpoint
//! demands it, performs the HTTP round-trip and classifies the outcome. Failed
//! attempts are retried with linear backoff; exhaustion is reported as
//! absence, never as an error.
//!
//! ## Key Components
//!
//! - [`RequestDispatcher`] - Runs one logical call end to end
//! - [`Transport`] - Single HTTP round-trip, swappable in tests
//! - [`RetryPolicy`] - Attempt bound and backoff schedule
//! - [`AttemptError`] - Why a single attempt failed

mod dispatcher;
mod error;
mod retry;
mod transport;

pub use dispatcher::RequestDispatcher;
pub use error::AttemptError;
pub use retry::{RetryPolicy, RetryState};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
