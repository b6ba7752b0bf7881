//! Async client for current weather conditions from the OpenWeatherMap API.
//!
//! This crate defines:
//! - Request URL construction for city, coordinate and postal-code lookups
//! - A pluggable HTTP transport (`reqwest` by default)
//! - Strict decoding of the response into typed models
//! - A closed error taxonomy covering every failure branch
//!
//! It is used by `current-weather-cli`, but is meant to be embedded in any
//! program that runs on a tokio runtime. The library never prints; it only
//! emits `tracing` events.

pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod query;
pub mod transport;

pub use client::{WeatherClient, WeatherClientBuilder, WeatherTask};
pub use config::{DEFAULT_BASE_URL, ServiceConfig, Units};
pub use error::{BoxError, WeatherError};
pub use model::{LocationSelector, Main, WeatherData, Wind};
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse};
pub use url::Url;
