/// Errors returned by [`crate::ApiClient`].
///
/// The `Api` variant is the structured error envelope the provider returns
/// for client-side problems (bad parameters, throttling, missing
/// permissions). Everything else is a transport or decoding failure.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("tencent cloud api error {code}: {message} (request id: {request_id})")]
    Api {
        code: String,
        message: String,
        request_id: String,
    },
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode api response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("missing credential environment variable {0}")]
    MissingCredential(&'static str),
}

impl ApiError {
    /// True for structured provider errors, false for transport-level ones.
    pub fn is_api_error(&self) -> bool {
        matches!(self, ApiError::Api { .. })
    }

    pub fn is_throttled(&self) -> bool {
        matches!(self, ApiError::Api { code, .. } if code.starts_with("RequestLimitExceeded"))
    }
}
