use serde::{Deserialize, Serialize};

/// Where to look up the weather. Exactly one form is used per request.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSelector {
    /// City name, optionally with state and country code (`"London,uk"`).
    ByCity(String),
    /// Geographic coordinates in decimal degrees.
    ByCoordinates { lat: f64, lon: f64 },
    /// Postal code, optionally with country code (`"94040,us"`).
    ByZipCode(String),
}

impl LocationSelector {
    pub fn city(name: impl Into<String>) -> Self {
        Self::ByCity(name.into())
    }

    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Self::ByCoordinates { lat, lon }
    }

    pub fn zip_code(code: impl Into<String>) -> Self {
        Self::ByZipCode(code.into())
    }

    /// Short name of the variant, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ByCity(_) => "city",
            Self::ByCoordinates { .. } => "coordinates",
            Self::ByZipCode(_) => "zip",
        }
    }
}

/// Decoded current-conditions payload.
///
/// Only the fields below are read. Unknown fields in the response are
/// ignored, but every modeled field must be present and well-typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub main: Main,
    pub wind: Wind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Main {
    /// Perceived temperature, °C.
    pub feels_like: f64,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Sea-level pressure, hPa.
    pub pressure: u16,
    /// Temperature, °C.
    pub temp: f64,
    pub temp_max: f64,
    pub temp_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Wind speed, m/s.
    pub speed: f64,
    /// Meteorological direction the wind blows from, degrees.
    pub deg: u16,
}

impl WeatherData {
    /// Strictly decode a response body.
    pub fn from_json(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }
}
