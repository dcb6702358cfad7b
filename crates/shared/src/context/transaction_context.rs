use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::{watch, Mutex};

use crate::context::error::{ContextError, SendFailure};
use crate::context::state::{reduce, Effect, Event, TransactionState};
use crate::models::{FormField, PartyOrder, TransactionRecord, ValidationError};
use crate::storage::{LocalStorage, TRANSACTION_COUNT_KEY};
use crate::web3::contracts::implementations::transactions_contract::TransactionLedger;
use crate::web3::{Gateway, NativeTransfer, WalletError};

fn transaction_failed<E>(e: E) -> ContextError
where
    E: std::error::Error + Send + Sync + 'static,
{
    error!("Transaction failed: {e}");
    ContextError::TransactionFailed(SendFailure::from(e))
}

/// Owns the client state and runs every wallet and ledger action against it.
///
/// State changes go through [`reduce`]; observers see each new state through
/// [`TransactionContext::subscribe`].
pub struct TransactionContext {
    gateway: Gateway,
    storage: Arc<LocalStorage>,
    party_order: PartyOrder,
    state: watch::Sender<TransactionState>,
    send_guard: Mutex<()>,
}

impl TransactionContext {
    pub fn new(gateway: Gateway, storage: Arc<LocalStorage>, party_order: PartyOrder) -> Self {
        let transaction_count = storage
            .get_item(TRANSACTION_COUNT_KEY)
            .and_then(|count| count.parse::<u64>().ok());
        debug!("Seeded transaction count from storage: {transaction_count:?}");

        let (state, _) = watch::channel(TransactionState {
            transaction_count,
            ..Default::default()
        });

        Self {
            gateway,
            storage,
            party_order,
            state,
            send_guard: Mutex::new(()),
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransactionState> {
        self.state.subscribe()
    }

    /// Reduces `event` into the state and runs the effects that need no
    /// network access. Whatever is left is returned to the caller.
    fn apply(&self, event: Event) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.state.send_modify(|state| {
            let (next, emitted) = reduce(std::mem::take(state), event);
            *state = next;
            effects = emitted;
        });

        effects
            .into_iter()
            .filter(|effect| match effect {
                Effect::Alert(message) => {
                    warn!("{message}");
                    false
                }
                Effect::PersistTransactionCount(count) => {
                    if let Err(e) = self
                        .storage
                        .set_item(TRANSACTION_COUNT_KEY, &count.to_string())
                    {
                        error!("Failed to persist transaction count: {e}");
                    }
                    false
                }
                Effect::RefreshTransactions => true,
            })
            .collect()
    }

    /// Resolves the ledger handle. `None` means no wallet is configured and
    /// the missing-wallet alert has already been raised.
    async fn ledger(&self) -> Result<Option<Arc<dyn TransactionLedger>>, WalletError> {
        let ledger = self.gateway.get_ethereum_contract().await?;
        if ledger.is_none() {
            self.apply(Event::WalletMissing);
        }
        Ok(ledger)
    }

    pub fn handle_change(&self, field: FormField, value: impl Into<String>) {
        self.apply(Event::FieldChanged {
            field,
            value: value.into(),
        });
    }

    pub async fn connect_wallet(&self) -> Result<(), ContextError> {
        let Some(wallet) = self.gateway.wallet() else {
            self.apply(Event::WalletMissing);
            return Ok(());
        };

        let accounts = wallet.request_accounts().await.map_err(|e| {
            error!("Failed to connect wallet: {e}");
            ContextError::NoEthereumObject(e)
        })?;

        match accounts.first() {
            Some(&account) => {
                info!("Connected account {account}");
                self.apply(Event::AccountConnected(account));
            }
            None => {
                info!("No accounts found");
                self.apply(Event::NoAccounts);
            }
        }
        Ok(())
    }

    /// Silent account lookup. Loads the ledger when an account is already
    /// authorized.
    pub async fn check_if_wallet_is_connected(&self) -> Result<(), ContextError> {
        let Some(wallet) = self.gateway.wallet() else {
            self.apply(Event::WalletMissing);
            return Ok(());
        };

        let accounts = wallet.accounts().await.map_err(|e| {
            error!("Failed to read accounts: {e}");
            ContextError::NoEthereumObject(e)
        })?;

        match accounts.first() {
            Some(&account) => {
                self.apply(Event::AccountConnected(account));
                self.get_all_transactions().await;
            }
            None => {
                info!("No accounts found");
                self.apply(Event::NoAccounts);
            }
        }
        Ok(())
    }

    pub async fn check_if_transactions_exist(&self) -> Result<(), ContextError> {
        let Some(ledger) = self.ledger().await.map_err(|e| {
            error!("Failed to bind ledger contract: {e}");
            ContextError::NoEthereumObject(e)
        })?
        else {
            return Ok(());
        };

        let count = ledger.get_transaction_count().await.map_err(|e| {
            error!("Failed to read transaction count: {e}");
            ContextError::NoEthereumObject(WalletError::Contract(e))
        })?;
        debug!("Ledger holds {count} transactions");
        self.apply(Event::TransactionCountLoaded(count));
        Ok(())
    }

    /// Runs the startup checks. Both always run; the first error is returned.
    pub async fn initialize(&self) -> Result<(), ContextError> {
        let connected = self.check_if_wallet_is_connected().await;
        let counted = self.check_if_transactions_exist().await;
        connected.and(counted)
    }

    /// Reloads the ledger into the state. Failures are logged, never returned.
    pub async fn get_all_transactions(&self) {
        let ledger = match self.ledger().await {
            Ok(Some(ledger)) => ledger,
            Ok(None) => return,
            Err(e) => {
                error!("Failed to bind ledger contract: {e}");
                return;
            }
        };

        match ledger.get_all_transactions().await {
            Ok(transfers) => {
                let records: Vec<TransactionRecord> = transfers
                    .into_iter()
                    .map(|transfer| TransactionRecord::from_transfer(transfer, self.party_order))
                    .collect();
                debug!("Loaded {} transactions", records.len());
                self.apply(Event::TransactionsLoaded(records));
            }
            Err(e) => error!("Failed to fetch transactions: {e}"),
        }
    }

    /// Sends the form amount to the form recipient, then records the transfer
    /// on the ledger contract. The two are independent transactions.
    pub async fn send_transaction(&self) -> Result<(), ContextError> {
        let Some(wallet) = self.gateway.wallet().cloned() else {
            self.apply(Event::WalletMissing);
            return Ok(());
        };

        let Ok(_guard) = self.send_guard.try_lock() else {
            warn!("Ignoring send while another transaction is in flight");
            return Err(ContextError::SendInProgress);
        };

        let snapshot = self.state();
        let from = snapshot
            .current_account
            .ok_or(ValidationError::NotConnected)?;
        let request = snapshot.form_data.validate()?;

        let Some(ledger) = self.ledger().await.map_err(transaction_failed)? else {
            return Ok(());
        };

        let transfer = NativeTransfer::new(from, request.to, request.amount);
        let transfer_hash = wallet
            .send_transaction(transfer)
            .await
            .map_err(transaction_failed)?;
        info!("Native transfer submitted: {transfer_hash}");

        let pending = ledger
            .add_to_blockchain(
                request.to,
                request.amount,
                &request.message,
                &request.keyword,
            )
            .await
            .map_err(transaction_failed)?;

        let hash = pending.hash();
        self.apply(Event::SendStarted(hash));
        info!("Loading - {hash}");

        let follow_up = match pending.wait().await {
            Ok(hash) => {
                info!("Success - {hash}");
                self.apply(Event::SendConfirmed(hash))
            }
            Err(e) => {
                self.apply(Event::SendFailed);
                return Err(transaction_failed(e));
            }
        };

        let count = ledger
            .get_transaction_count()
            .await
            .map_err(transaction_failed)?;
        self.apply(Event::TransactionCountLoaded(count));

        if follow_up.contains(&Effect::RefreshTransactions) {
            self.get_all_transactions().await;
        }
        Ok(())
    }
}
