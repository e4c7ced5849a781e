//! Dispatcher against a local HTTP server
//!
//! A mock of the remote API runs on an ephemeral port; the real reqwest
//! transport, signer and retry loop are exercised end to end.

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
};
use dyfetch::config::Config;
use dyfetch::dispatch::RequestDispatcher;
use dyfetch::endpoints::Endpoint;
use dyfetch::params::ParameterSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::{Duration, sleep};

/// What the mock answers once its failures are used up.
#[derive(Clone, Copy)]
enum Reply {
    Json,
    NotJson,
    Slow,
}

struct MockState {
    failures_left: AtomicUsize,
    reply: Reply,
    hits: AtomicUsize,
    seen: Mutex<Vec<(Uri, HeaderMap)>>,
}

impl MockState {
    fn new(failures: usize, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            failures_left: AtomicUsize::new(failures),
            reply,
            hits: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.seen.lock().unwrap().push((uri, headers));

    let failing = state
        .failures_left
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return (StatusCode::SERVICE_UNAVAILABLE, "busy".to_string());
    }

    match state.reply {
        Reply::Json => (StatusCode::OK, r#"{"status_code":0,"payload":"ok"}"#.to_string()),
        Reply::NotJson => (StatusCode::OK, "<html>verify</html>".to_string()),
        Reply::Slow => {
            sleep(Duration::from_secs(2)).await;
            (StatusCode::OK, r#"{"status_code":0}"#.to_string())
        }
    }
}

async fn start_mock_server(state: Arc<MockState>) -> Result<String, Box<dyn std::error::Error>> {
    let app = Router::new().fallback(handle).with_state(state);

    // Bind to random available port
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Ok(format!("http://{}", bound_addr))
}

fn config_for(base: &str, max_retries: u32) -> Config {
    let mut config = Config::default();
    config.client.max_retries = max_retries;
    config.client.retry_delay = Duration::from_millis(20).into();
    config.client.request_timeout = Duration::from_millis(300).into();
    config.client.cookie = "ttwid=1%7Cabc; sessionid=xyz".to_string();
    config.endpoints.web_api = format!("{base}/web");
    config.endpoints.live_api = format!("{base}/live");
    config.endpoints.referer = format!("{base}/");
    config
}

async fn setup(failures: usize, reply: Reply, max_retries: u32) -> (Arc<MockState>, RequestDispatcher) {
    let state = MockState::new(failures, reply);
    let base = start_mock_server(state.clone()).await.unwrap();
    let dispatcher = RequestDispatcher::builder()
        .config(&config_for(&base, max_retries))
        .build()
        .unwrap();
    (state, dispatcher)
}

fn video_params() -> ParameterSet {
    ParameterSet::new().with("aweme_id", "7300000000000000000")
}

#[tokio::test]
async fn test_recovers_after_failures() {
    let (state, dispatcher) = setup(2, Reply::Json, 3).await;

    let body = dispatcher
        .call(Endpoint::VideoDetail, &video_params())
        .await
        .unwrap()
        .expect("third attempt should succeed");

    assert_eq!(body["payload"], "ok");
    assert_eq!(state.hits(), 3);
}

#[tokio::test]
async fn test_always_failing_returns_absence() {
    let (state, dispatcher) = setup(usize::MAX, Reply::Json, 3).await;

    let body = dispatcher
        .call(Endpoint::VideoDetail, &video_params())
        .await
        .unwrap();

    assert!(body.is_none());
    assert_eq!(state.hits(), 3);
    assert_eq!(dispatcher.metrics().snapshot().exhausted, 1);
}

#[tokio::test]
async fn test_malformed_body_is_retried() {
    let (state, dispatcher) = setup(0, Reply::NotJson, 2).await;

    let body = dispatcher
        .call(Endpoint::VideoDetail, &video_params())
        .await
        .unwrap();

    assert!(body.is_none());
    assert_eq!(state.hits(), 2);
}

#[tokio::test]
async fn test_timeout_is_retried() {
    let (state, dispatcher) = setup(0, Reply::Slow, 2).await;

    let body = dispatcher
        .call(Endpoint::VideoDetail, &video_params())
        .await
        .unwrap();

    assert!(body.is_none());
    assert_eq!(state.hits(), 2);
}

#[tokio::test]
async fn test_signed_request_on_the_wire() {
    let (state, dispatcher) = setup(0, Reply::Json, 3).await;

    dispatcher
        .call(Endpoint::VideoDetail, &video_params())
        .await
        .unwrap()
        .unwrap();

    let seen = state.seen.lock().unwrap();
    let (uri, headers) = &seen[0];

    assert_eq!(uri.path(), "/web/aweme/detail/");
    let query = uri.query().unwrap();
    assert!(query.contains("aweme_id=7300000000000000000"));
    assert!(query.contains("&msToken="));
    assert!(query.contains("&webid=7"));
    let (_, token) = query.rsplit_once("&X-Bogus=").unwrap();
    assert_eq!(token.len(), 28);

    assert_eq!(headers["cookie"], "ttwid=1%7Cabc; sessionid=xyz");
    assert_eq!(headers["user-agent"], dyfetch::config::DEFAULT_USER_AGENT);
    assert_eq!(headers["accept-language"], "zh-CN,zh;q=0.9");
    assert!(headers["referer"].to_str().unwrap().starts_with("http://127.0.0.1:"));
}

#[tokio::test]
async fn test_live_request_is_unsigned() {
    let (state, dispatcher) = setup(0, Reply::Json, 3).await;

    dispatcher
        .call(Endpoint::LiveRoom, &ParameterSet::new().with("web_rid", "123"))
        .await
        .unwrap()
        .unwrap();

    let seen = state.seen.lock().unwrap();
    let (uri, _) = &seen[0];
    assert_eq!(uri.path(), "/live/room/web/enter/");
    assert!(!uri.query().unwrap().contains("X-Bogus"));
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let (state, dispatcher) = setup(0, Reply::Json, 1).await;
    let dispatcher = Arc::new(dispatcher);

    let calls = (0..8).map(|i| {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            let params = ParameterSet::new().with("aweme_id", 7_300_000_000_000_000_000u64 + i);
            dispatcher.call(Endpoint::VideoDetail, &params).await
        })
    });

    for call in calls {
        assert!(call.await.unwrap().unwrap().is_some());
    }
    assert_eq!(state.hits(), 8);

    let seen = state.seen.lock().unwrap();
    let mut tokens: Vec<&str> = seen
        .iter()
        .filter_map(|(uri, _)| uri.query())
        .filter_map(|q| q.split("&msToken=").nth(1))
        .collect();
    tokens.sort();
    tokens.dedup();
    assert_eq!(tokens.len(), 8);
}
