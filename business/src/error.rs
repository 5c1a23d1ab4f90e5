use serde::Deserialize;
use thiserror::Error;

use crate::http::{HttpError, RequestBuilder, Response};

/// Why a backend call did not produce the expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never got a response (network, DNS, CORS...).
    #[error("{0}")]
    Transport(String),
    /// The backend answered with an unexpected status.
    #[error("unexpected status {status}")]
    Status {
        status: u16,
        /// `message` field of the JSON body, if any.
        message: Option<String>,
    },
    /// The backend answered with the expected status but an unreadable body.
    #[error("invalid response body: {0}")]
    Decode(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// Builds a `Status` error, keeping the body's `message` when it has one.
    pub fn from_response(response: &Response) -> Self {
        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty());
        Self::Status {
            status: response.status,
            message,
        }
    }

    /// Text shown to the user: the server's message, the transport error, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Transport(message) => message.clone(),
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Status { message: None, .. } | Self::Decode(_) => fallback.to_owned(),
        }
    }

    /// Server message or `fallback`; transport errors also map to `fallback`.
    pub fn server_message_or(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_owned(),
        }
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        Self::Transport(err.message)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Sends `request` and accepts only `expected` as a status.
pub async fn send_expecting(request: RequestBuilder, expected: u16) -> Result<Response, ApiError> {
    let response = request.send().await?;
    if response.status == expected {
        Ok(response)
    } else {
        Err(ApiError::from_response(&response))
    }
}
