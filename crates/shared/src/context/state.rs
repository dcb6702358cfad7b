use alloy::primitives::{Address, TxHash};
use serde::Serialize;

use crate::models::{FormData, FormField, TransactionRecord};

pub const WALLET_MISSING_ALERT: &str = "Please install a wallet provider";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionState {
    pub current_account: Option<Address>,
    pub form_data: FormData,
    pub is_loading: bool,
    pub transaction_count: Option<u64>,
    pub transactions: Vec<TransactionRecord>,
    pub pending_hash: Option<TxHash>,
    pub alert: Option<String>,
}

impl TransactionState {
    pub fn is_connected(&self) -> bool {
        self.current_account.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FieldChanged { field: FormField, value: String },
    WalletMissing,
    AccountConnected(Address),
    NoAccounts,
    SendStarted(TxHash),
    SendConfirmed(TxHash),
    SendFailed,
    TransactionsLoaded(Vec<TransactionRecord>),
    TransactionCountLoaded(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Alert(String),
    PersistTransactionCount(u64),
    RefreshTransactions,
}

/// Folds one event into the state. Side effects are returned, never run here.
pub fn reduce(mut state: TransactionState, event: Event) -> (TransactionState, Vec<Effect>) {
    let mut effects = Vec::new();

    match event {
        Event::FieldChanged { field, value } => state.form_data.set(field, value),
        Event::WalletMissing => {
            state.alert = Some(WALLET_MISSING_ALERT.to_string());
            effects.push(Effect::Alert(WALLET_MISSING_ALERT.to_string()));
        }
        Event::AccountConnected(account) => {
            state.current_account = Some(account);
            state.alert = None;
        }
        Event::NoAccounts => {}
        Event::SendStarted(hash) => {
            state.is_loading = true;
            state.pending_hash = Some(hash);
        }
        Event::SendConfirmed(_) => {
            state.is_loading = false;
            state.pending_hash = None;
            effects.push(Effect::RefreshTransactions);
        }
        Event::SendFailed => {
            state.is_loading = false;
            state.pending_hash = None;
        }
        Event::TransactionsLoaded(transactions) => state.transactions = transactions,
        Event::TransactionCountLoaded(count) => {
            state.transaction_count = Some(count);
            effects.push(Effect::PersistTransactionCount(count));
        }
    }

    (state, effects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_change_updates_single_field() {
        let mut state = TransactionState::default();
        state.form_data.amount = "0.1".to_string();

        let (state, effects) = reduce(
            state,
            Event::FieldChanged {
                field: FormField::AddressTo,
                value: "0xABC".to_string(),
            },
        );

        assert!(effects.is_empty());
        assert_eq!(state.form_data.address_to, "0xABC");
        assert_eq!(state.form_data.amount, "0.1");
        assert!(state.form_data.keyword.is_empty());
        assert!(state.form_data.message.is_empty());
    }

    #[test]
    fn test_send_lifecycle() {
        let hash = TxHash::repeat_byte(7);
        let (state, _) = reduce(TransactionState::default(), Event::SendStarted(hash));
        assert!(state.is_loading);
        assert_eq!(state.pending_hash, Some(hash));

        let (state, effects) = reduce(state, Event::SendConfirmed(hash));
        assert!(!state.is_loading);
        assert_eq!(state.pending_hash, None);
        assert_eq!(effects, vec![Effect::RefreshTransactions]);
    }

    #[test]
    fn test_send_failure_returns_to_idle() {
        let (state, _) = reduce(
            TransactionState::default(),
            Event::SendStarted(TxHash::ZERO),
        );
        let (state, effects) = reduce(state, Event::SendFailed);
        assert!(!state.is_loading);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_count_is_persisted() {
        let (state, effects) = reduce(
            TransactionState::default(),
            Event::TransactionCountLoaded(4),
        );
        assert_eq!(state.transaction_count, Some(4));
        assert_eq!(effects, vec![Effect::PersistTransactionCount(4)]);
    }

    #[test]
    fn test_connect_clears_alert() {
        let (state, effects) = reduce(TransactionState::default(), Event::WalletMissing);
        assert_eq!(state.alert.as_deref(), Some(WALLET_MISSING_ALERT));
        assert_eq!(
            effects,
            vec![Effect::Alert(WALLET_MISSING_ALERT.to_string())]
        );

        let account = Address::repeat_byte(1);
        let (state, _) = reduce(state, Event::AccountConnected(account));
        assert_eq!(state.current_account, Some(account));
        assert!(state.alert.is_none());
        assert!(state.is_connected());
    }
}
