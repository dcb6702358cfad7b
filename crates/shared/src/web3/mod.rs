pub mod contracts;
pub mod gateway;
pub mod mock;
pub mod node_wallet;
pub mod wallet;

pub use contracts::implementations::transactions_contract::{
    PendingLedgerTx, TransactionLedger, TransactionsContract,
};
pub use gateway::Gateway;
pub use node_wallet::NodeWallet;
pub use wallet::{NativeTransfer, SignerProvider, Wallet, WalletError, WalletProvider};
