use std::sync::Arc;

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::{LocalSignerError, PrivateKeySigner};
use alloy::transports::TransportError;
use async_trait::async_trait;
use log::{debug, info};
use url::Url;

use crate::web3::contracts::core::error::ContractError;
use crate::web3::contracts::helpers::utils::NATIVE_TRANSFER_GAS;
use crate::web3::contracts::implementations::transactions_contract::{
    TransactionLedger, TransactionsContract,
};

/// Provider with the recommended fillers and a local signer attached.
pub type SignerProvider = DynProvider;

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("invalid private key: {0}")]
    InvalidKey(#[from] LocalSignerError),
    #[error("{method} rejected: {reason}")]
    Rejected {
        method: &'static str,
        reason: String,
    },
    #[error("{method} failed: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("no account available to sign with")]
    NoAccount,
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl WalletError {
    pub(crate) fn transport(method: &'static str, source: TransportError) -> Self {
        Self::Transport { method, source }
    }
}

/// The `eth_sendTransaction` payload for a plain value transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeTransfer {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub gas: u64,
}

impl NativeTransfer {
    pub fn new(from: Address, to: Address, value: U256) -> Self {
        Self {
            from,
            to,
            value,
            gas: NATIVE_TRANSFER_GAS,
        }
    }

    pub fn into_request(self) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.from)
            .with_to(self.to)
            .with_gas_limit(self.gas)
            .with_value(self.value)
    }
}

/// Capability handed to the transaction context in place of an injected
/// browser wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts already authorized, without prompting (`eth_accounts`).
    async fn accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Asks for account access, which may prompt (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Submits a value transfer (`eth_sendTransaction`) without waiting for inclusion.
    async fn send_transaction(&self, transfer: NativeTransfer) -> Result<TxHash, WalletError>;

    /// Binds the ledger contract at `contract` to the active signing key.
    async fn get_signer(&self, contract: Address)
        -> Result<Arc<dyn TransactionLedger>, WalletError>;
}

#[derive(Clone)]
pub struct Wallet {
    pub wallet: EthereumWallet,
    pub signer: PrivateKeySigner,
    pub provider: SignerProvider,
}

impl Wallet {
    pub fn new(private_key: &str, provider_url: Url) -> Result<Self, WalletError> {
        let signer: PrivateKeySigner = private_key.trim().parse()?;
        let wallet = EthereumWallet::from(signer.clone());

        let provider = ProviderBuilder::new()
            .wallet(wallet.clone())
            .connect_http(provider_url)
            .erased();

        Ok(Self {
            wallet,
            signer,
            provider,
        })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn provider(&self) -> SignerProvider {
        self.provider.clone()
    }
}

#[async_trait]
impl WalletProvider for Wallet {
    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.address()])
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        info!("Using local signer {}", self.address());
        Ok(vec![self.address()])
    }

    async fn send_transaction(&self, transfer: NativeTransfer) -> Result<TxHash, WalletError> {
        if transfer.from != self.address() {
            return Err(WalletError::Rejected {
                method: "eth_sendTransaction",
                reason: format!("{} is not the local signer", transfer.from),
            });
        }

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
        let ledger = TransactionsContract::new(contract, self.provider())?;
        Ok(Arc::new(ledger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const TEST_KEY: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    fn wallet() -> Wallet {
        Wallet::new(TEST_KEY, Url::parse("http://localhost:8545").unwrap()).unwrap()
    }

    #[test]
    fn test_wallet_address_from_private_key() {
        assert_eq!(
            wallet().address(),
            address!("0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf")
        );
    }

    #[test]
    fn test_invalid_private_key_is_rejected() {
        let result = Wallet::new("not-a-key", Url::parse("http://localhost:8545").unwrap());
        assert!(matches!(result, Err(WalletError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_local_wallet_reports_its_signer_as_only_account() {
        let wallet = wallet();
        assert_eq!(wallet.accounts().await.unwrap(), vec![wallet.address()]);
        assert_eq!(
            wallet.request_accounts().await.unwrap(),
            vec![wallet.address()]
        );
    }

    #[tokio::test]
    async fn test_local_wallet_refuses_foreign_sender() {
        let transfer = NativeTransfer::new(Address::repeat_byte(0x99), Address::ZERO, U256::from(1u64));
        let result = wallet().send_transaction(transfer).await;
        assert!(matches!(result, Err(WalletError::Rejected { .. })));
    }

    #[test]
    fn test_native_transfer_request_uses_fixed_gas() {
        let from = Address::repeat_byte(0x01);
        let to = Address::repeat_byte(0x02);
        let request = NativeTransfer::new(from, to, U256::from(5u64)).into_request();
        assert_eq!(request.from, Some(from));
        assert_eq!(request.gas, Some(0x5208));
        assert_eq!(request.value, Some(U256::from(5u64)));
    }
}
