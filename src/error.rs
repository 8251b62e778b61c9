use std::fmt;
use thiserror::Error;

/// Coarse classification of a non-2xx store response. Callers pick
/// user-facing wording from this, never from the raw message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    BadRequest,
    Auth,
    Forbidden,
    NotFound,
    RateLimited,
    ServerError,
    UpstreamUnavailable,
    Other,
}

impl FailureClass {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => FailureClass::BadRequest,
            401 => FailureClass::Auth,
            403 => FailureClass::Forbidden,
            404 => FailureClass::NotFound,
            429 => FailureClass::RateLimited,
            502 | 503 | 504 => FailureClass::UpstreamUnavailable,
            500..=599 => FailureClass::ServerError,
            _ => FailureClass::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureClass::BadRequest => "bad-request",
            FailureClass::Auth => "auth",
            FailureClass::Forbidden => "forbidden",
            FailureClass::NotFound => "not-found",
            FailureClass::RateLimited => "rate-limited",
            FailureClass::ServerError => "server-error",
            FailureClass::UpstreamUnavailable => "upstream-unavailable",
            FailureClass::Other => "other",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum VodError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("hash computation failed: {0}")]
    HashComputation(String),

    #[error("store request failed ({classification}): HTTP {status}: {message}")]
    Request {
        classification: FailureClass,
        status: u16,
        message: String,
    },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("store request timed out after {0}s")]
    Timeout(u64),

    #[error("malformed store response: {0}")]
    ResponseFormat(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VodError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(FailureClass::from_status(400), FailureClass::BadRequest);
        assert_eq!(FailureClass::from_status(401), FailureClass::Auth);
        assert_eq!(FailureClass::from_status(403), FailureClass::Forbidden);
        assert_eq!(FailureClass::from_status(404), FailureClass::NotFound);
        assert_eq!(FailureClass::from_status(429), FailureClass::RateLimited);
        assert_eq!(FailureClass::from_status(500), FailureClass::ServerError);
        assert_eq!(FailureClass::from_status(502), FailureClass::UpstreamUnavailable);
        assert_eq!(FailureClass::from_status(503), FailureClass::UpstreamUnavailable);
        assert_eq!(FailureClass::from_status(504), FailureClass::UpstreamUnavailable);
        assert_eq!(FailureClass::from_status(418), FailureClass::Other);
    }

    #[test]
    fn test_classification_display() {
        assert_eq!(FailureClass::NotFound.to_string(), "not-found");
        assert_eq!(FailureClass::UpstreamUnavailable.to_string(), "upstream-unavailable");
    }
}
