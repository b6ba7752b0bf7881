use std::fmt;

/// Current-conditions endpoint of the OpenWeatherMap API.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Unit system requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    /// Celsius, metres per second, hPa.
    #[default]
    Metric,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed per-client settings sent with every request.
///
/// Built once when the client is constructed and never mutated afterwards,
/// so it can be shared between concurrent requests without locking.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    api_key: String,
    units: Units,
}

impl ServiceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), units: Units::Metric }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn units(&self) -> Units {
        self.units
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"<redacted>")
            .field("units", &self.units)
            .finish()
    }
}
