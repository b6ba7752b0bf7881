use std::sync::Arc;

use tracing::{debug, instrument};
use url::Url;

use crate::{
    error::WeatherError,
    model::WeatherData,
    query::redacted,
    transport::{HttpTransport, TransportResponse},
};

/// Runs one GET through the shared transport and classifies the outcome.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    transport: Arc<dyn HttpTransport>,
}

impl WeatherFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    #[instrument(skip_all, fields(url = %redacted(url)))]
    pub async fn fetch(&self, url: &Url) -> Result<WeatherData, WeatherError> {
        debug!("Fetching current weather");

        let outcome = self.transport.get(url).await.and_then(resolve);

        match &outcome {
            Ok(_) => debug!("Weather request succeeded"),
            Err(err) => debug!(error = %err, status = ?err.status(), "Weather request failed"),
        }

        outcome
    }
}

/// Map a transport response onto the decoded data or the matching error.
///
/// Only a 200 is decoded; any other status keeps its body for the caller.
pub fn resolve(response: TransportResponse) -> Result<WeatherData, WeatherError> {
    let (status, body) = match response {
        TransportResponse::Http { status, body } => (status, body),
        TransportResponse::Unrecognized => return Err(WeatherError::InvalidResponse),
    };

    if status != 200 {
        let body = (!body.is_empty()).then(|| String::from_utf8_lossy(&body).into_owned());
        return Err(WeatherError::Http { status, body });
    }

    WeatherData::from_json(&body).map_err(WeatherError::Parsing)
}
