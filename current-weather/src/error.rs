use std::error::Error as StdError;

use thiserror::Error;

/// Boxed source error carried by [`WeatherError::Transport`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Every way a current-weather lookup can fail.
///
/// Exactly one variant describes a failed request. Nothing is retried or
/// defaulted: the caller decides what to do with each kind.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The configured endpoint is not an absolute URL.
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The transport produced something that is not an HTTP response.
    #[error("response is not a valid HTTP response")]
    InvalidResponse,

    /// The server answered with a status other than 200.
    #[error("weather request failed with status {status}: {}", describe_body(.body.as_deref()))]
    Http { status: u16, body: Option<String> },

    /// A 200 response whose body does not match the expected schema.
    #[error("failed to parse weather response")]
    Parsing(#[source] serde_json::Error),

    /// DNS, connect, TLS, timeout or body-read failure.
    #[error("failed to reach weather service")]
    Transport(#[source] BoxError),
}

impl WeatherError {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Transport(err.into())
    }

    /// HTTP status of a rejected request, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether re-issuing the same request might succeed.
    ///
    /// Network failures, 429 and 5xx count as transient. The library itself
    /// never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

fn describe_body(body: Option<&str>) -> String {
    match body {
        Some(body) => truncate_body(body),
        None => "<empty body>".to_string(),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
