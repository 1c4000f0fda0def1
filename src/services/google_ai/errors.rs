use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoogleAiError {
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: {source}")]
    NetworkError { source: reqwest::Error },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Content blocked by safety filters")]
    ContentBlocked,

    #[error("Quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("Server error: {status} - {message}")]
    ServerError {
        status: u16,
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl GoogleAiError {
    pub fn is_retryable(&self) -> bool {
        match self {
            GoogleAiError::RateLimitExceeded { .. } => true,
            GoogleAiError::Timeout { .. } => true,
            GoogleAiError::NetworkError { .. } => true,
            GoogleAiError::ServerError { status, .. } => *status >= 500,
            GoogleAiError::ServiceUnavailable { .. } => true,
            _ => false,
        }
    }

    /// Delay the server asked for, from `Retry-After` or a `RetryInfo` detail.
    ///
    /// `None` leaves the delay to the exponential backoff.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GoogleAiError::RateLimitExceeded { retry_after, .. }
            | GoogleAiError::ServerError { retry_after, .. }
            | GoogleAiError::ServiceUnavailable { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    pub fn from_reqwest_error(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            GoogleAiError::Timeout { timeout_ms }
        } else if let Some(status) = error.status() {
            let status_code = status.as_u16();
            let message = error.to_string();

            match status_code {
                401 => GoogleAiError::AuthenticationFailed { message },
                403 => GoogleAiError::QuotaExceeded { message },
                429 => GoogleAiError::RateLimitExceeded {
                    message,
                    retry_after: None,
                },
                500..=599 => GoogleAiError::ServerError {
                    status: status_code,
                    message,
                    retry_after: None,
                },
                _ => GoogleAiError::InvalidRequest { message },
            }
        } else {
            GoogleAiError::NetworkError { source: error }
        }
    }

    pub fn from_status_and_body(status: reqwest::StatusCode, body: &str) -> Self {
        Self::from_response_parts(status, None, body)
    }

    /// Map an error response, taking the retry hint from the `Retry-After`
    /// header or, failing that, from the body's `RetryInfo` detail.
    pub fn from_response_parts(
        status: reqwest::StatusCode,
        retry_after_header: Option<&str>,
        body: &str,
    ) -> Self {
        let status_code = status.as_u16();
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();

        let error_message = parsed
            .as_ref()
            .and_then(|value| value.get("error"))
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or(body)
            .to_string();

        let retry_after = retry_after_header
            .and_then(parse_retry_after_header)
            .or_else(|| parsed.as_ref().and_then(retry_delay_from_body));

        match status_code {
            400 => GoogleAiError::InvalidRequest {
                message: error_message,
            },
            401 => GoogleAiError::AuthenticationFailed {
                message: error_message,
            },
            403 => {
                if error_message.to_lowercase().contains("quota") {
                    GoogleAiError::QuotaExceeded {
                        message: error_message,
                    }
                } else {
                    GoogleAiError::AuthenticationFailed {
                        message: error_message,
                    }
                }
            }
            429 => GoogleAiError::RateLimitExceeded {
                message: error_message,
                retry_after,
            },
            503 => GoogleAiError::ServiceUnavailable {
                message: error_message,
                retry_after,
            },
            500..=599 => GoogleAiError::ServerError {
                status: status_code,
                message: error_message,
                retry_after,
            },
            _ => GoogleAiError::InvalidRequest {
                message: format!("HTTP {status_code}: {error_message}"),
            },
        }
    }
}

/// `Retry-After: <seconds>`. HTTP dates are not used by this API.
pub fn parse_retry_after_header(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// `error.details[]` entry of type `google.rpc.RetryInfo`, e.g. `"retryDelay": "13s"`
fn retry_delay_from_body(body: &serde_json::Value) -> Option<Duration> {
    body.get("error")?
        .get("details")?
        .as_array()?
        .iter()
        .filter(|detail| {
            detail
                .get("@type")
                .and_then(|t| t.as_str())
                .is_some_and(|t| t.ends_with("google.rpc.RetryInfo"))
        })
        .find_map(|detail| detail.get("retryDelay")?.as_str().and_then(parse_proto_duration))
}

fn parse_proto_duration(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().strip_suffix('s')?.parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

#[derive(Debug, Error)]
pub enum RetryError {
    #[error("Maximum retry attempts exceeded after {attempts} attempts: {source}")]
    MaxAttemptsExceeded {
        attempts: usize,
        source: GoogleAiError,
    },

    #[error("Retry timeout exceeded")]
    TimeoutExceeded,

    #[error("Non-retryable error: {source}")]
    NonRetryable { source: GoogleAiError },
}
