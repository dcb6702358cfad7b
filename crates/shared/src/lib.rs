pub mod context;
pub mod models;
pub mod storage;
pub mod web3;
