use std::sync::Arc;

use alloy::primitives::{Address, TxHash};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use log::{debug, info};
use url::Url;

use crate::web3::contracts::implementations::transactions_contract::{
    TransactionLedger, TransactionsContract,
};
use crate::web3::wallet::{NativeTransfer, WalletError, WalletProvider};

/// Wallet whose accounts live in the node (anvil, hardhat, geth --dev, ...).
/// Every request goes over JSON-RPC and the node signs.
#[derive(Clone)]
pub struct NodeWallet {
    provider: DynProvider,
}

impl NodeWallet {
    pub fn new(provider_url: Url) -> Self {
        Self::with_provider(ProviderBuilder::new().connect_http(provider_url).erased())
    }

    pub fn with_provider(provider: DynProvider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> DynProvider {
        self.provider.clone()
    }
}

#[async_trait]
impl WalletProvider for NodeWallet {
    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.provider
            .get_accounts()
            .await
            .map_err(|e| WalletError::transport("eth_accounts", e))
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        let accounts: Vec<Address> = self
            .provider
            .raw_request("eth_requestAccounts".into(), ())
            .await
            .map_err(|e| WalletError::transport("eth_requestAccounts", e))?;
        info!("Node granted access to {} account(s)", accounts.len());
        Ok(accounts)
    }

    async fn send_transaction(&self, transfer: NativeTransfer) -> Result<TxHash, WalletError> {
        let pending = self
            .provider
            .send_transaction(transfer.into_request())
            .await
            .map_err(|e| WalletError::transport("eth_sendTransaction", e))?;
        let hash = *pending.tx_hash();
        debug!("Native transfer of {} wei sent: {hash}", transfer.value);
        Ok(hash)
    }

    async fn get_signer(
        &self,
        contract: Address,
    ) -> Result<Arc<dyn TransactionLedger>, WalletError> {
        let signer = self
            .accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(WalletError::NoAccount)?;
        let ledger = TransactionsContract::new(contract, self.provider())?.with_from(signer);
        Ok(Arc::new(ledger))
    }
}
