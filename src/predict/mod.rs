use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::data::example::ImagePayload;

/// One predictor answer: the count plus the model's stated reasoning, when the
/// predictor surfaces one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CountPrediction {
    pub number_of_people: u32,
    pub reasoning: Option<String>,
}

impl CountPrediction {
    pub fn new(number_of_people: u32) -> Self {
        Self {
            number_of_people,
            reasoning: None,
        }
    }

    pub fn with_reasoning(number_of_people: u32, reasoning: impl Into<String>) -> Self {
        Self {
            number_of_people,
            reasoning: Some(reasoning.into()),
        }
    }
}

/// Failure from a single predictor call.
///
/// Network, rate-limit, and timeout failures are transient; a `Parse` failure
/// means the model replied but no count could be extracted, which a retry may
/// also fix. `Provider` failures are not retryable. During evaluation any of
/// these is absorbed per example and scored as incorrect; retry policy belongs
/// to the caller (or the external optimizer), not this harness.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// Could not reach the model endpoint (DNS, connection refused, etc.).
    #[error("could not reach {endpoint}")]
    Network {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The provider returned a rate limit response (HTTP 429).
    #[error("rate limited by provider")]
    RateLimit { retry_after: Option<Duration> },

    /// The request exceeded the configured timeout.
    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },

    /// The provider returned an unexpected HTTP status.
    #[error("invalid response from provider: HTTP {status}")]
    InvalidResponse { status: u16, body: String },

    /// The model responded, but no count could be parsed from the reply.
    #[error("could not parse a count from the model response")]
    Parse { raw_response: String },

    /// A provider-specific error that doesn't fit the other categories.
    #[error("provider error from {provider}: {message}")]
    Provider { provider: String, message: String },
}

impl PredictError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::RateLimit { .. } => true,
            Self::Timeout { .. } => true,
            Self::InvalidResponse { status, .. } => *status >= 500,
            Self::Parse { .. } => true,
            Self::Provider { .. } => false,
        }
    }
}

/// The black-box image-to-count predictor.
///
/// Implementations wrap a prompted model call; the harness holds no session
/// state and invokes `predict` once per example.
#[allow(async_fn_in_trait)]
pub trait Predictor {
    async fn predict(&self, image: &ImagePayload) -> Result<CountPrediction, PredictError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability_classes() {
        assert!(
            PredictError::Timeout {
                after: Duration::from_secs(30)
            }
            .is_retryable()
        );
        assert!(
            PredictError::InvalidResponse {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !PredictError::InvalidResponse {
                status: 400,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !PredictError::Provider {
                provider: "local".into(),
                message: "boom".into()
            }
            .is_retryable()
        );
    }
}
