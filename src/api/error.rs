use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the listing API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}")]
    Status { endpoint: String, status: StatusCode },
    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Endpoint the failing request was sent to
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Transport { endpoint, .. }
            | ApiError::Status { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => endpoint,
        }
    }

    /// Text to show the user, or `fallback` when the error renders empty
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_the_error_text() {
        let err = ApiError::Status {
            endpoint: "property/GetAllProperties".to_string(),
            status: StatusCode::BAD_GATEWAY,
        };
        let message = err.user_message("Failed to load properties.");
        assert!(message.starts_with("property/GetAllProperties returned 502"));
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    }
}
