use alloy::providers::PendingTransactionError;

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("unknown ABI file: {0}")]
    UnknownAbi(String),
    #[error("failed to parse ABI {name}: {source}")]
    Abi {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("contract call failed: {0}")]
    Call(#[from] alloy::contract::Error),
    #[error("transaction confirmation failed: {0}")]
    Confirmation(#[from] PendingTransactionError),
    #[error("unexpected {method} response: {reason}")]
    Decode {
        method: &'static str,
        reason: String,
    },
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    pub(crate) fn decode(method: &'static str, reason: impl Into<String>) -> Self {
        Self::Decode {
            method,
            reason: reason.into(),
        }
    }
}
