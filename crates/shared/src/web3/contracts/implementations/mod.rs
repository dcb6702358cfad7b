pub mod transactions_contract;
