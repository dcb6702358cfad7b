use std::fmt;
use std::future::Future;

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::Provider;
use async_trait::async_trait;
use futures::future::BoxFuture;
use log::debug;

use crate::web3::contracts::constants::addresses::TRANSACTIONS_ABI;
use crate::web3::contracts::core::contract::Contract;
use crate::web3::contracts::core::error::ContractError;
use crate::web3::contracts::structs::transaction::TransferStruct;

/// A submitted `addToBlockchain` call whose confirmation has not been awaited yet.
pub struct PendingLedgerTx {
    hash: TxHash,
    confirmation: BoxFuture<'static, Result<TxHash, ContractError>>,
}

impl PendingLedgerTx {
    pub fn new<F>(hash: TxHash, confirmation: F) -> Self
    where
        F: Future<Output = Result<TxHash, ContractError>> + Send + 'static,
    {
        Self {
            hash,
            confirmation: Box::pin(confirmation),
        }
    }

    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Resolves once the transaction is included.
    pub async fn wait(self) -> Result<TxHash, ContractError> {
        self.confirmation.await
    }
}

impl fmt::Debug for PendingLedgerTx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLedgerTx")
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}

/// Read and write access to a deployed `Transactions` contract.
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    async fn get_all_transactions(&self) -> Result<Vec<TransferStruct>, ContractError>;

    async fn get_transaction_count(&self) -> Result<u64, ContractError>;

    /// Records transfer metadata on chain. This moves no value by itself.
    async fn add_to_blockchain(
        &self,
        receiver: Address,
        amount: U256,
        message: &str,
        keyword: &str,
    ) -> Result<PendingLedgerTx, ContractError>;
}

#[derive(Clone)]
pub struct TransactionsContract<P: Provider> {
    pub instance: Contract<P>,
    from: Option<Address>,
}

impl<P: Provider> TransactionsContract<P> {
    pub fn new(address: Address, provider: P) -> Result<Self, ContractError> {
        let instance = Contract::new(address, provider, TRANSACTIONS_ABI)?;
        Ok(Self {
            instance,
            from: None,
        })
    }

    /// Sets the sender for write calls. Needed when the provider has no local
    /// signer and the node signs on the account's behalf.
    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub fn address(&self) -> Address {
        self.instance.address()
    }
}

#[async_trait]
impl<P: Provider + 'static> TransactionLedger for TransactionsContract<P> {
    async fn get_all_transactions(&self) -> Result<Vec<TransferStruct>, ContractError> {
        let result = self
            .instance
            .instance()
            .function("getAllTransactions", &[])?
            .call()
            .await?;

        let entries = result
            .first()
            .ok_or_else(|| ContractError::decode("getAllTransactions", "empty response"))?
            .as_array()
            .ok_or_else(|| ContractError::decode("getAllTransactions", "result is not an array"))?;

        entries.iter().map(TransferStruct::try_from).collect()
    }

    async fn get_transaction_count(&self) -> Result<u64, ContractError> {
        let result = self
            .instance
            .instance()
            .function("getTransactionCount", &[])?
            .call()
            .await?;

        let count = result
            .first()
            .ok_or_else(|| ContractError::decode("getTransactionCount", "empty response"))?
            .as_uint()
            .ok_or_else(|| ContractError::decode("getTransactionCount", "result is not a uint"))?
            .0;

        u64::try_from(count).map_err(|_| {
            ContractError::decode("getTransactionCount", format!("count {count} overflows"))
        })
    }

    async fn add_to_blockchain(
        &self,
        receiver: Address,
        amount: U256,
        message: &str,
        keyword: &str,
    ) -> Result<PendingLedgerTx, ContractError> {
        let mut call = self.instance.instance().function(
            "addToBlockchain",
            &[
                receiver.into(),
                amount.into(),
                message.to_string().into(),
                keyword.to_string().into(),
            ],
        )?;
        if let Some(from) = self.from {
            call = call.from(from);
        }

        let pending = call.send().await?;
        let hash = *pending.tx_hash();
        debug!("addToBlockchain on {} submitted: {hash}", self.address());

        Ok(PendingLedgerTx::new(hash, async move {
            Ok(pending.watch().await?)
        }))
    }
}
