use std::sync::Arc;

use bon::bon;
use serde_json::Value;
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

use super::error::AttemptError;
use super::retry::{RetryPolicy, RetryState};
use super::transport::{HttpRequest, ReqwestTransport, Transport, TransportError};
use crate::config::Config;
use crate::endpoints::{Endpoint, EndpointCatalog, EndpointDescriptor};
use crate::observability::DispatchMetrics;
use crate::params::{FingerprintCatalog, NonceGenerator, ParameterBuilder, ParameterSet};
use crate::signature::{self, XBogus};

const ACCEPT: &str = "application/json, text/plain, */*";
const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9";

/// Executes logical calls against the remote API.
///
/// Configuration is read once at construction; a dispatcher holds no mutable
/// state apart from counters, so it can be shared across concurrent calls.
pub struct RequestDispatcher {
    catalog: EndpointCatalog,
    params: ParameterBuilder,
    signer: XBogus,
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    headers: Vec<(String, String)>,
    metrics: Arc<DispatchMetrics>,
}

#[bon]
impl RequestDispatcher {
    /// Wire a dispatcher from configuration. `transport` defaults to reqwest,
    /// `nonces` to the thread-local RNG.
    #[builder]
    pub fn new(
        config: &Config,
        transport: Option<Arc<dyn Transport>>,
        nonces: Option<NonceGenerator>,
        metrics: Option<Arc<DispatchMetrics>>,
    ) -> crate::error::Result<Self> {
        let client = &config.client;

        let transport: Arc<dyn Transport> = match transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(client.request_timeout.as_duration())?),
        };

        let catalog = FingerprintCatalog::from_overrides(&config.fingerprint)?;
        let params = ParameterBuilder::new(catalog, nonces.unwrap_or_default());

        let headers = vec![
            ("User-Agent".to_string(), client.user_agent.clone()),
            ("Referer".to_string(), config.endpoints.referer.clone()),
            ("Accept".to_string(), ACCEPT.to_string()),
            ("Accept-Language".to_string(), ACCEPT_LANGUAGE.to_string()),
            ("Cookie".to_string(), client.cookie.clone()),
        ];

        Ok(Self {
            catalog: EndpointCatalog::new(&config.endpoints),
            params,
            signer: XBogus::new(client.user_agent.clone())?,
            transport,
            policy: RetryPolicy::from_config(client),
            headers,
            metrics: metrics.unwrap_or_default(),
        })
    }
}

impl RequestDispatcher {
    pub fn catalog(&self) -> &EndpointCatalog {
        &self.catalog
    }

    pub fn signer(&self) -> &XBogus {
        &self.signer
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Dispatch with the endpoint's own verb and signing requirement.
    pub async fn call(
        &self,
        endpoint: Endpoint,
        params: &ParameterSet,
    ) -> signature::Result<Option<Value>> {
        let requires_signature = self.catalog.get(endpoint).requires_signature;
        self.dispatch(endpoint, params, None, requires_signature).await
    }

    /// Run one logical call.
    ///
    /// Returns the decoded JSON body of the first HTTP 200 response, or
    /// `None` once every attempt has failed. Only a signing failure is an
    /// error.
    pub async fn dispatch(
        &self,
        endpoint: Endpoint,
        params: &ParameterSet,
        body: Option<&Value>,
        require_signature: bool,
    ) -> signature::Result<Option<Value>> {
        let descriptor = self.catalog.get(endpoint);
        let span = info_span!(
            "dispatch",
            call_id = %Uuid::now_v7(),
            endpoint = descriptor.name,
            signed = require_signature,
        );

        self.run(descriptor, params, body, require_signature)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        descriptor: &EndpointDescriptor,
        params: &ParameterSet,
        body: Option<&Value>,
        require_signature: bool,
    ) -> signature::Result<Option<Value>> {
        let max_attempts = self.policy.max_attempts();
        let mut state = RetryState::new();

        loop {
            let attempt = state.attempt();
            let request = self.prepare(descriptor, params, body, require_signature)?;

            self.metrics.attempt();
            match self.attempt(request).await {
                Ok(value) => {
                    debug!(attempt = attempt + 1, max_attempts, "Request succeeded");
                    self.metrics.success();
                    return Ok(Some(value));
                }
                Err(err) => {
                    log_failure(&err, attempt + 1, max_attempts);
                    state.record_failure(err);
                }
            }

            match self.policy.delay_after(attempt) {
                Some(delay) => {
                    debug!(delay_ms = delay.as_millis() as u64, "Backing off before retry");
                    self.metrics.retry();
                    tokio::time::sleep(delay).await;
                    state.advance();
                }
                None => {
                    warn!(
                        attempts = attempt + 1,
                        last_error = ?state.last_error(),
                        "Giving up after exhausting attempts"
                    );
                    self.metrics.exhausted();
                    return Ok(None);
                }
            }
        }
    }

    /// Fresh parameters (and so fresh nonces and timestamp) for every attempt.
    fn prepare(
        &self,
        descriptor: &EndpointDescriptor,
        params: &ParameterSet,
        body: Option<&Value>,
        require_signature: bool,
    ) -> signature::Result<HttpRequest> {
        let query = self.params.build(params).to_query_string();
        let query = if require_signature {
            self.signer.sign(&query)?.query
        } else {
            query
        };

        Ok(HttpRequest {
            verb: descriptor.verb,
            url: format!("{}?{}", descriptor.url, query),
            headers: self.headers.clone(),
            body: body.cloned(),
        })
    }

    async fn attempt(&self, request: HttpRequest) -> Result<Value, AttemptError> {
        let response = self.transport.execute(request).await?;

        if response.status != 200 {
            return Err(AttemptError::RemoteRejection {
                status: response.status,
            });
        }

        Ok(serde_json::from_slice(&response.body)?)
    }
}

fn log_failure(err: &AttemptError, attempt: u32, max_attempts: u32) {
    match err {
        AttemptError::TransientNetwork(TransportError::Timeout) => {
            warn!(attempt, max_attempts, "Request timeout");
        }
        AttemptError::TransientNetwork(e) => {
            error!(attempt, max_attempts, error = %e, "Request error");
        }
        AttemptError::RemoteRejection { status } => {
            warn!(attempt, max_attempts, status, "Request failed with non-200 status");
        }
        AttemptError::MalformedResponse(e) => {
            error!(attempt, max_attempts, error = %e, "Response body is not valid JSON");
        }
    }
}
