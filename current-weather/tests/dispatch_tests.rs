//! Delivery tests driven by in-process stub transports.
//!
//! These cover the branches a real HTTP server cannot produce (transport
//! failure, unrecognized response) and the exactly-once completion contract.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use current_weather::{
    HttpTransport, LocationSelector, TransportResponse, Url, WeatherClient, WeatherError,
};
use tokio::sync::{Notify, mpsc};

const LONDON: &str = r#"{"main":{"feels_like":10.2,"humidity":80,"pressure":1012,"temp":11.0,"temp_max":12.0,"temp_min":9.5},"wind":{"speed":3.1,"deg":240}}"#;

#[derive(Debug, Clone)]
enum Canned {
    Fail,
    Unrecognized,
    Status(u16, &'static str),
}

/// Answers every request with the same canned outcome and records the URLs.
#[derive(Debug)]
struct StubTransport {
    canned: Canned,
    calls: AtomicUsize,
    seen: Mutex<Vec<Url>>,
}

impl StubTransport {
    fn new(canned: Canned) -> Arc<Self> {
        Arc::new(Self { canned, calls: AtomicUsize::new(0), seen: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, WeatherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(url.clone());

        match &self.canned {
            Canned::Fail => Err(WeatherError::transport("dns lookup failed")),
            Canned::Unrecognized => Ok(TransportResponse::Unrecognized),
            Canned::Status(status, body) => {
                Ok(TransportResponse::Http { status: *status, body: body.as_bytes().to_vec() })
            }
        }
    }
}

fn client_with(transport: Arc<StubTransport>) -> WeatherClient {
    WeatherClient::builder("KEY").shared_transport(transport).build().unwrap()
}

fn kind(result: &Result<current_weather::WeatherData, WeatherError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(WeatherError::Transport(_)) => "transport",
        Err(WeatherError::InvalidResponse) => "invalid_response",
        Err(WeatherError::Http { .. }) => "http",
        Err(WeatherError::Parsing(_)) => "parsing",
        Err(WeatherError::InvalidBaseUrl { .. }) => "invalid_base_url",
    }
}

#[tokio::test]
async fn callback_fires_exactly_once_on_every_branch() {
    let cases = [
        (Canned::Fail, "transport"),
        (Canned::Unrecognized, "invalid_response"),
        (Canned::Status(500, "boom"), "http"),
        (Canned::Status(200, "{}"), "parsing"),
        (Canned::Status(200, LONDON), "ok"),
    ];

    for (canned, expected) in cases {
        let transport = StubTransport::new(canned);
        let client = client_with(transport.clone());
        let fired = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let counter = fired.clone();
        let handle = client.dispatch(LocationSelector::city("London"), move |result| {
            counter.fetch_add(1, Ordering::SeqCst);
            tx.send(kind(&result)).unwrap();
        });
        handle.await.expect("callback task completes");

        assert_eq!(rx.recv().await, Some(expected));
        assert_eq!(rx.recv().await, None, "callback must not fire twice");
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1, "exactly one request");
    }
}

#[tokio::test]
async fn transport_failure_keeps_underlying_error() {
    let client = client_with(StubTransport::new(Canned::Fail));

    let err = client.spawn_by_zip_code("10115,de").await.unwrap_err();

    let source = std::error::Error::source(&err).expect("underlying error is kept");
    assert_eq!(source.to_string(), "dns lookup failed");
}

#[tokio::test]
async fn spawned_request_starts_without_being_awaited() {
    let transport = StubTransport::new(Canned::Status(200, LONDON));
    let client = client_with(transport.clone());

    let task = client.spawn_by_coordinates(48.8566, 2.3522);

    for _ in 0..100 {
        if transport.calls.load(Ordering::SeqCst) == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

    let seen = transport.seen.lock().unwrap().clone();
    let pairs: Vec<String> = seen[0].query_pairs().map(|(k, v)| format!("{k}={v}")).collect();
    assert_eq!(pairs, ["appid=KEY", "units=metric", "lat=48.8566", "lon=2.3522"]);

    assert!(task.await.is_ok());
}

/// Holds the first request until released so completion order can be forced.
#[derive(Debug)]
struct GatedTransport {
    gate: Notify,
}

#[async_trait]
impl HttpTransport for GatedTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, WeatherError> {
        if url.query_pairs().any(|(k, v)| k == "q" && v == "Slow") {
            self.gate.notified().await;
        }
        Ok(TransportResponse::Http { status: 200, body: LONDON.as_bytes().to_vec() })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_requests_complete_independently() {
    let transport = Arc::new(GatedTransport { gate: Notify::new() });
    let client =
        WeatherClient::builder("KEY").shared_transport(transport.clone()).build().unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let slow_tx = tx.clone();
    let _slow = client.dispatch(LocationSelector::city("Slow"), move |r| {
        slow_tx.send(("slow", r.is_ok())).unwrap();
    });
    let _fast = client.dispatch(LocationSelector::city("Fast"), move |r| {
        tx.send(("fast", r.is_ok())).unwrap();
    });

    assert_eq!(rx.recv().await, Some(("fast", true)));

    transport.gate.notify_one();
    assert_eq!(rx.recv().await, Some(("slow", true)));
}
