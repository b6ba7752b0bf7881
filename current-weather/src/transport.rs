use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::WeatherError;

/// What came back from the wire for one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportResponse {
    /// A well-formed HTTP response with its status and full body.
    Http { status: u16, body: Vec<u8> },
    /// Something answered, but not in a shape the transport recognizes as HTTP.
    Unrecognized,
}

/// The network seam of the fetcher.
///
/// One instance is shared by every request a client issues, so
/// implementations must be safe to call concurrently.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    /// Issue one GET. Network-level failures come back as
    /// [`WeatherError::Transport`].
    async fn get(&self, url: &Url) -> Result<TransportResponse, WeatherError>;
}

/// Default transport backed by a pooled [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client, e.g. one shared process-wide.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build().map_err(WeatherError::transport)?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, WeatherError> {
        let res = self.http.get(url.clone()).send().await.map_err(WeatherError::transport)?;

        let status = res.status().as_u16();
        let body = res.bytes().await.map_err(WeatherError::transport)?;

        Ok(TransportResponse::Http { status, body: body.to_vec() })
    }
}
