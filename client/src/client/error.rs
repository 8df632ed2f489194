use thiserror::Error;

#[derive(Error, Debug)]
pub enum TonRpcError {
    #[error("Transport error (method: {method}): {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP status {status} (method: {method})")]
    HttpStatus { method: &'static str, status: u16 },

    #[error("Toncenter error (method: {method}, code: {code}): {message}")]
    ApiError {
        method: &'static str,
        code: i32,
        message: String,
    },

    #[error("Invalid response (method: {method}): {message}")]
    InvalidResponse {
        method: &'static str,
        message: String,
    },

    #[error("Illegal argument: {message}")]
    IllegalArgument { message: String },
}

impl TonRpcError {
    pub fn invalid_response<M: ToString>(method: &'static str, message: M) -> TonRpcError {
        TonRpcError::InvalidResponse {
            method,
            message: message.to_string(),
        }
    }

    /// Status code reported by the endpoint, either on the HTTP layer or in the response body.
    pub fn code(&self) -> Option<i32> {
        match self {
            TonRpcError::HttpStatus { status, .. } => Some(*status as i32),
            TonRpcError::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }
}
