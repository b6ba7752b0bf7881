use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use tokio::task::JoinHandle;
use tracing::{Instrument, debug};
use url::Url;

use crate::{
    config::{DEFAULT_BASE_URL, ServiceConfig},
    error::WeatherError,
    fetcher::WeatherFetcher,
    model::{LocationSelector, WeatherData},
    query::QueryBuilder,
    transport::{HttpTransport, ReqwestTransport},
};

/// Entry point for current-weather lookups.
///
/// Read-only after construction and cheap to clone: clones share the same
/// configuration and transport.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    config: Arc<ServiceConfig>,
    query: QueryBuilder,
    fetcher: WeatherFetcher,
}

impl WeatherClient {
    /// Client for the public endpoint using a fresh `reqwest` transport.
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: impl Into<String>) -> WeatherClientBuilder {
        WeatherClientBuilder::new(api_key)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The exact URL a request for `selector` would hit.
    pub fn url_for(&self, selector: &LocationSelector) -> Url {
        self.query.build(&self.config, selector)
    }

    /// Fetch current conditions for `selector` in the calling task.
    pub async fn current(&self, selector: &LocationSelector) -> Result<WeatherData, WeatherError> {
        let url = self.url_for(selector);
        let span = tracing::debug_span!("weather", kind = selector.kind());
        self.fetcher.fetch(&url).instrument(span).await
    }

    pub async fn current_by_city(&self, name: &str) -> Result<WeatherData, WeatherError> {
        self.current(&LocationSelector::city(name)).await
    }

    pub async fn current_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherData, WeatherError> {
        self.current(&LocationSelector::coordinates(lat, lon)).await
    }

    pub async fn current_by_zip_code(&self, code: &str) -> Result<WeatherData, WeatherError> {
        self.current(&LocationSelector::zip_code(code)).await
    }

    /// Start the request on the tokio runtime and return right away.
    ///
    /// The request is already in flight when this returns. Await the
    /// returned [`WeatherTask`] for the outcome; dropping it does not cancel
    /// the request.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, selector: LocationSelector) -> WeatherTask {
        let url = self.url_for(&selector);
        let fetcher = self.fetcher.clone();
        let span = tracing::debug_span!("weather", kind = selector.kind());

        debug!(kind = selector.kind(), "Dispatching weather request");
        let handle = tokio::spawn(async move { fetcher.fetch(&url).await }.instrument(span));

        WeatherTask { handle }
    }

    pub fn spawn_by_city(&self, name: impl Into<String>) -> WeatherTask {
        self.spawn(LocationSelector::city(name))
    }

    pub fn spawn_by_coordinates(&self, lat: f64, lon: f64) -> WeatherTask {
        self.spawn(LocationSelector::coordinates(lat, lon))
    }

    pub fn spawn_by_zip_code(&self, code: impl Into<String>) -> WeatherTask {
        self.spawn(LocationSelector::zip_code(code))
    }

    /// Start the request and hand its outcome to `on_complete`.
    ///
    /// `on_complete` runs exactly once, on a runtime worker thread that may
    /// differ from the caller's.
    pub fn dispatch<F>(&self, selector: LocationSelector, on_complete: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<WeatherData, WeatherError>) + Send + 'static,
    {
        let task = self.spawn(selector);
        tokio::spawn(async move { on_complete(task.await) })
    }
}

/// Handle to a request started by [`WeatherClient::spawn`].
#[derive(Debug)]
#[must_use = "the request runs regardless, but its outcome is only available by awaiting"]
pub struct WeatherTask {
    handle: JoinHandle<Result<WeatherData, WeatherError>>,
}

impl Future for WeatherTask {
    type Output = Result<WeatherData, WeatherError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // A panicked or aborted task surfaces as a transport failure.
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|joined| joined.unwrap_or_else(|err| Err(WeatherError::transport(err))))
    }
}

/// Configures a [`WeatherClient`]. Defaults to the public endpoint and a
/// `reqwest` transport.
#[derive(Debug)]
pub struct WeatherClientBuilder {
    config: ServiceConfig,
    base_url: String,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl WeatherClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            config: ServiceConfig::new(api_key),
            base_url: DEFAULT_BASE_URL.to_string(),
            transport: None,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn transport<T>(self, transport: T) -> Self
    where
        T: HttpTransport + 'static,
    {
        self.shared_transport(Arc::new(transport))
    }

    /// Use a transport that is also shared with other clients.
    pub fn shared_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Fails with [`WeatherError::InvalidBaseUrl`] if the endpoint does not parse.
    pub fn build(self) -> Result<WeatherClient, WeatherError> {
        let query = QueryBuilder::new(&self.base_url)?;
        let transport = self.transport.unwrap_or_else(|| Arc::new(ReqwestTransport::new()));

        Ok(WeatherClient {
            config: Arc::new(self.config),
            query,
            fetcher: WeatherFetcher::new(transport),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_targets_public_endpoint() {
        let client = WeatherClient::new("KEY").expect("default endpoint is valid");
        let url = client.url_for(&LocationSelector::city("Berlin"));

        assert_eq!(url.host_str(), Some("api.openweathermap.org"));
        assert_eq!(url.path(), "/data/2.5/weather");
        assert_eq!(client.config().api_key(), "KEY");
    }

    #[test]
    fn builder_rejects_invalid_base_url() {
        let err = WeatherClient::builder("KEY").base_url("::nope::").build().unwrap_err();
        assert!(matches!(err, WeatherError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn builder_honours_custom_base_url() {
        let client = WeatherClient::builder("KEY")
            .base_url("http://127.0.0.1:8080/weather")
            .build()
            .unwrap();

        let url = client.url_for(&LocationSelector::zip_code("10001"));
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/weather?appid=KEY&units=metric&zip=10001");
    }

    #[test]
    fn client_debug_hides_api_key() {
        let client = WeatherClient::new("super-secret").unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
