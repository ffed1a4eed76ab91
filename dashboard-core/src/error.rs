use std::fmt;

use thiserror::Error;

/// Broad classification of why a single source failed.
///
/// The aggregation engine treats every kind the same way; the kind only
/// matters to outer layers that want to pick a status code or exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorKind {
    NotFound,
    Unauthorized,
    RateLimited,
    Timeout,
    UpstreamMalformed,
    Unknown,
}

impl SourceErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceErrorKind::NotFound => "not-found",
            SourceErrorKind::Unauthorized => "unauthorized",
            SourceErrorKind::RateLimited => "rate-limited",
            SourceErrorKind::Timeout => "timeout",
            SourceErrorKind::UpstreamMalformed => "upstream-malformed",
            SourceErrorKind::Unknown => "unknown",
        }
    }

    /// HTTP status a boundary layer may surface for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            SourceErrorKind::NotFound => 404,
            SourceErrorKind::Unauthorized => 401,
            SourceErrorKind::RateLimited => 429,
            SourceErrorKind::Timeout => 504,
            SourceErrorKind::UpstreamMalformed => 502,
            SourceErrorKind::Unknown => 500,
        }
    }
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of one upstream call, always carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SourceError {
    pub kind: SourceErrorKind,
    pub message: String,
}

impl SourceError {
    pub fn new<S: Into<String>>(kind: SourceErrorKind, message: S) -> Self {
        Self { kind, message: message.into() }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::new(SourceErrorKind::NotFound, message)
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::new(SourceErrorKind::Unauthorized, message)
    }

    pub fn rate_limited<S: Into<String>>(message: S) -> Self {
        Self::new(SourceErrorKind::RateLimited, message)
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::new(SourceErrorKind::Timeout, message)
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::new(SourceErrorKind::UpstreamMalformed, message)
    }

    pub fn unknown<S: Into<String>>(message: S) -> Self {
        Self::new(SourceErrorKind::Unknown, message)
    }

    /// Map a non-success upstream HTTP status to an error.
    ///
    /// `context` names the upstream call, e.g. "OpenWeather forecast".
    pub fn from_status(status: u16, context: &str, body: &str) -> Self {
        match status {
            401 => Self::unauthorized(format!("Invalid API key for {context}")),
            404 => Self::not_found(format!("{context} returned 404: {}", truncate_body(body))),
            429 => Self::rate_limited(format!("{context} rate limit exceeded")),
            _ => Self::unknown(format!(
                "{context} request failed with status {status}: {}",
                truncate_body(body)
            )),
        }
    }
}

/// Raised when an upstream value falls outside the range the classifier accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("air quality index {0} is outside the expected range 1-5")]
    AqiOutOfRange(i64),
}

impl From<ClassifyError> for SourceError {
    fn from(err: ClassifyError) -> Self {
        SourceError::malformed(err.to_string())
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
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
