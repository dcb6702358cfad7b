use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use alloy::primitives::{keccak256, Address, TxHash, U256};
use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use crate::web3::contracts::core::error::ContractError;
use crate::web3::contracts::implementations::transactions_contract::{
    PendingLedgerTx, TransactionLedger,
};
use crate::web3::contracts::structs::transaction::TransferStruct;
use crate::web3::wallet::{NativeTransfer, WalletError, WalletProvider};

const USER_REJECTED: &str = "User rejected the request.";

/// In-memory `Transactions` contract.
pub struct MockLedger {
    transfers: Arc<Mutex<Vec<TransferStruct>>>,
    signer: Address,
    fail_reads: bool,
    fail_confirmations: bool,
    confirmation_gate: Option<Arc<Notify>>,
    submissions: AtomicU64,
}

impl MockLedger {
    pub fn new(transfers: Vec<TransferStruct>) -> Self {
        Self {
            transfers: Arc::new(Mutex::new(transfers)),
            signer: Address::ZERO,
            fail_reads: false,
            fail_confirmations: false,
            confirmation_gate: None,
            submissions: AtomicU64::new(0),
        }
    }

    /// Address recorded as `sender` for new entries.
    pub fn with_signer(mut self, signer: Address) -> Self {
        self.signer = signer;
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_confirmations(mut self) -> Self {
        self.fail_confirmations = true;
        self
    }

    /// Holds every confirmation until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.confirmation_gate = Some(gate);
        self
    }

    pub async fn transfers(&self) -> Vec<TransferStruct> {
        self.transfers.lock().await.clone()
    }

    pub fn submissions(&self) -> u64 {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionLedger for MockLedger {
    async fn get_all_transactions(&self) -> Result<Vec<TransferStruct>, ContractError> {
        if self.fail_reads {
            return Err(ContractError::Other("mock ledger unavailable".into()));
        }
        Ok(self.transfers.lock().await.clone())
    }

    async fn get_transaction_count(&self) -> Result<u64, ContractError> {
        if self.fail_reads {
            return Err(ContractError::Other("mock ledger unavailable".into()));
        }
        Ok(self.transfers.lock().await.len() as u64)
    }

    async fn add_to_blockchain(
        &self,
        receiver: Address,
        amount: U256,
        message: &str,
        keyword: &str,
    ) -> Result<PendingLedgerTx, ContractError> {
        let nonce = self.submissions.fetch_add(1, Ordering::SeqCst);
        let hash = keccak256(format!("mock-ledger-{nonce}"));

        let entry = TransferStruct {
            sender: self.signer,
            receiver,
            amount,
            message: message.to_string(),
            timestamp: chrono::Utc::now().timestamp().max(0) as u64,
            keyword: keyword.to_string(),
        };
        let transfers = self.transfers.clone();
        let gate = self.confirmation_gate.clone();
        let fail = self.fail_confirmations;

        Ok(PendingLedgerTx::new(hash, async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if fail {
                return Err(ContractError::Other("mock confirmation failed".into()));
            }
            transfers.lock().await.push(entry);
            Ok(hash)
        }))
    }
}

/// In-memory wallet. Accounts only show up in `accounts()` once authorized,
/// mirroring how an extension answers `eth_accounts`.
pub struct MockWallet {
    accounts: Vec<Address>,
    authorized: AtomicBool,
    reject_requests: bool,
    reject_transfers: bool,
    sent: Mutex<Vec<NativeTransfer>>,
    ledger: Arc<MockLedger>,
}

impl MockWallet {
    pub fn new(accounts: Vec<Address>, ledger: Arc<MockLedger>) -> Self {
        Self {
            accounts,
            authorized: AtomicBool::new(false),
            reject_requests: false,
            reject_transfers: false,
            sent: Mutex::new(Vec::new()),
            ledger,
        }
    }

    /// Starts out with access already granted.
    pub fn authorized(self) -> Self {
        self.authorized.store(true, Ordering::SeqCst);
        self
    }

    /// Rejects every prompt, as a user clicking "Reject" would.
    pub fn rejecting(mut self) -> Self {
        self.reject_requests = true;
        self
    }

    /// Grants account access but rejects the value transfer prompt.
    pub fn rejecting_transfers(mut self) -> Self {
        self.reject_transfers = true;
        self
    }

    pub async fn sent_transfers(&self) -> Vec<NativeTransfer> {
        self.sent.lock().await.clone()
    }

    fn rejected(method: &'static str) -> WalletError {
        WalletError::Rejected {
            method,
            reason: USER_REJECTED.to_string(),
        }
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        if self.authorized.load(Ordering::SeqCst) {
            Ok(self.accounts.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        if self.reject_requests {
            return Err(Self::rejected("eth_requestAccounts"));
        }
        self.authorized.store(true, Ordering::SeqCst);
        Ok(self.accounts.clone())
    }

    async fn send_transaction(&self, transfer: NativeTransfer) -> Result<TxHash, WalletError> {
        if self.reject_requests || self.reject_transfers {
            return Err(Self::rejected("eth_sendTransaction"));
        }
        let mut sent = self.sent.lock().await;
        sent.push(transfer);
        Ok(keccak256(format!("mock-transfer-{}", sent.len())))
    }

    async fn get_signer(
        &self,
        _contract: Address,
    ) -> Result<Arc<dyn TransactionLedger>, WalletError> {
        if self.reject_requests {
            return Err(Self::rejected("eth_requestAccounts"));
        }
        let ledger: Arc<dyn TransactionLedger> = self.ledger.clone();
        Ok(ledger)
    }
}
