use crate::models::ValidationError;
use crate::web3::WalletError;

pub type SendFailure = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the transaction context. The messages match what the
/// browser front-end showed; the cause is kept as the source.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("No ethereum object.")]
    NoEthereumObject(#[source] WalletError),
    #[error("Transaction failed.")]
    TransactionFailed(#[source] SendFailure),
    #[error("Invalid transfer: {0}")]
    InvalidForm(#[from] ValidationError),
    #[error("A transaction is already in flight")]
    SendInProgress,
}
