use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entry-function call handed to a wallet for signing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFunctionPayload {
    pub function: String,
    pub type_arguments: Vec<String>,
    pub function_arguments: Vec<Value>,
}

impl EntryFunctionPayload {
    pub fn new(function: impl Into<String>, function_arguments: Vec<Value>) -> Self {
        Self {
            function: function.into(),
            type_arguments: Vec::new(),
            function_arguments,
        }
    }
}

/// What a wallet returns after sign-and-submit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub hash: Option<String>,
}

/// Outcome of a supply or withdraw submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionResult {
    pub success: bool,
    pub hash: Option<String>,
    pub error: Option<String>,
}

impl TransactionResult {
    pub fn confirmed(hash: impl Into<String>) -> Self {
        Self {
            success: true,
            hash: Some(hash.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            hash: None,
            error: Some(error.into()),
        }
    }
}
