use url::Url;

use crate::{config::ServiceConfig, error::WeatherError, model::LocationSelector};

/// Builds request URLs for one endpoint and one [`ServiceConfig`].
///
/// The base endpoint is parsed once in [`QueryBuilder::new`], so a broken
/// endpoint is reported when the client is set up rather than per request.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base: Url,
}

impl QueryBuilder {
    pub fn new(base_url: &str) -> Result<Self, WeatherError> {
        let base = Url::parse(base_url).map_err(|source| WeatherError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        if base.cannot_be_a_base() {
            return Err(WeatherError::InvalidBaseUrl {
                url: base_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }

        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `appid` and `units` first, then the selector's own parameters.
    pub fn build(&self, config: &ServiceConfig, selector: &LocationSelector) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("appid", config.api_key())
                .append_pair("units", config.units().as_str());

            match selector {
                LocationSelector::ByCity(name) => {
                    pairs.append_pair("q", name);
                }
                LocationSelector::ByCoordinates { lat, lon } => {
                    pairs
                        .append_pair("lat", &lat.to_string())
                        .append_pair("lon", &lon.to_string());
                }
                LocationSelector::ByZipCode(code) => {
                    pairs.append_pair("zip", code);
                }
            }
        }

        url
    }
}

/// Copy of `url` safe to put in logs: the `appid` value is masked.
pub(crate) fn redacted(url: &Url) -> String {
    let mut out = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "appid" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    out.query_pairs_mut().clear().extend_pairs(pairs);
    out.to_string()
}
