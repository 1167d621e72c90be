use std::path::PathBuf;

use thiserror::Error;

/// Core error type for ScholarScope.
#[derive(Debug, Error)]
pub enum ScholarScopeError {
    #[error("configuration error: {0}")]
    InvalidConfiguration(String),
    #[error("missing environment variable: {0}")]
    MissingSecret(String),
    #[error("I/O error while reading {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("research query must not be empty")]
    EmptyQuery,
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// A failure that escaped every section's own fallback handling.
    #[error("{0}")]
    Aborted(String),
}

impl ScholarScopeError {
    pub fn config_io(path: PathBuf, source: std::io::Error) -> Self {
        Self::ConfigIo { path, source }
    }
}

/// Failure of a single outbound provider call.
///
/// Provider errors never leave the adapter that produced them; they are
/// recorded as the reason a category fell back to synthesized data.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },
    #[error("{provider} response could not be decoded: {reason}")]
    Decode {
        provider: &'static str,
        reason: String,
    },
    #[error("{provider} response carried no generated text")]
    EmptyResponse { provider: &'static str },
    #[error("{provider} is unavailable")]
    Unavailable { provider: &'static str },
}

impl ProviderError {
    pub fn http(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Http { provider, source }
    }

    pub fn decode(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::Decode {
            provider,
            reason: reason.into(),
        }
    }

    /// Name of the provider the failure originated from.
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Http { provider, .. }
            | Self::Status { provider, .. }
            | Self::Decode { provider, .. }
            | Self::EmptyResponse { provider }
            | Self::Unavailable { provider } => provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_provider_and_code() {
        let err = ProviderError::Status {
            provider: "serpapi",
            status: 503,
        };
        assert_eq!(err.to_string(), "serpapi returned HTTP 503");
        assert_eq!(err.provider(), "serpapi");
    }

    #[test]
    fn empty_query_message() {
        assert_eq!(
            ScholarScopeError::EmptyQuery.to_string(),
            "research query must not be empty"
        );
    }
}
