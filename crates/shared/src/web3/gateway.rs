use std::sync::Arc;

use alloy::primitives::Address;
use log::info;

use crate::web3::contracts::implementations::transactions_contract::TransactionLedger;
use crate::web3::wallet::{WalletError, WalletProvider};

/// Hands out signer-bound ledger handles. The wallet is optional: without one
/// every lookup yields `None`.
#[derive(Clone)]
pub struct Gateway {
    wallet: Option<Arc<dyn WalletProvider>>,
    contract_address: Address,
}

impl Gateway {
    pub fn new(wallet: Option<Arc<dyn WalletProvider>>, contract_address: Address) -> Self {
        Self {
            wallet,
            contract_address,
        }
    }

    pub fn wallet(&self) -> Option<&Arc<dyn WalletProvider>> {
        self.wallet.as_ref()
    }

    pub async fn get_ethereum_contract(
        &self,
    ) -> Result<Option<Arc<dyn TransactionLedger>>, WalletError> {
        let Some(wallet) = &self.wallet else {
            info!("Ethereum object not found, configure a wallet provider");
            return Ok(None);
        };

        wallet.get_signer(self.contract_address).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web3::mock::{MockLedger, MockWallet};

    #[tokio::test]
    async fn test_gateway_without_wallet_returns_none() {
        let gateway = Gateway::new(None, Address::ZERO);
        assert!(gateway.wallet().is_none());
        assert!(gateway.get_ethereum_contract().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_gateway_binds_ledger_through_wallet() {
        let ledger = Arc::new(MockLedger::new(vec![]));
        let wallet: Arc<dyn WalletProvider> =
            Arc::new(MockWallet::new(vec![Address::repeat_byte(1)], ledger));
        let gateway = Gateway::new(Some(wallet), Address::repeat_byte(9));

        let contract = gateway.get_ethereum_contract().await.unwrap().unwrap();
        assert_eq!(contract.get_transaction_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_gateway_surfaces_signer_rejection() {
        let ledger = Arc::new(MockLedger::new(vec![]));
        let wallet: Arc<dyn WalletProvider> = Arc::new(MockWallet::new(vec![], ledger).rejecting());
        let gateway = Gateway::new(Some(wallet), Address::ZERO);

        assert!(gateway.get_ethereum_contract().await.is_err());
    }
}
