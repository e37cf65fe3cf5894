//! Error types shared by the clients and transaction services

use serde_json::Value;
use thiserror::Error;

/// Failure of a backend or chain read
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// A required identifier was empty; no request was issued
    #[error("{0}")]
    Validation(String),

    /// The server answered with a non-2xx status
    #[error("API request failed: {message}")]
    Http {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    /// The request could not be completed or its body could not be read
    #[error("Network error: {0}")]
    Network(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Worth another attempt under a query's retry policy
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Failure of a supply or withdraw submission
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Transaction confirmation failed: {0}")]
    Confirmation(String),

    #[error("No transaction hash returned")]
    MissingHash,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_error_keeps_status_and_body() {
        let err = ApiError::Http {
            status: 503,
            message: "Service Unavailable".into(),
            body: Some(json!({"error": "down"})),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "API request failed: Service Unavailable");
        assert!(err.is_retryable());
    }

    #[test]
    fn validation_is_not_retryable() {
        let err = ApiError::validation("Asset address is required");
        assert!(!err.is_retryable());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn missing_hash_message_is_fixed() {
        assert_eq!(
            TransactionError::MissingHash.to_string(),
            "No transaction hash returned"
        );
    }
}
