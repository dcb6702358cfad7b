use alloy::primitives::{address, Address};

/// Where the first contract deployed by the default anvil/hardhat account lands.
pub const LOCAL_TRANSACTIONS_ADDRESS: Address =
    address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

pub const TRANSACTIONS_ABI: &str = "transactions.json";
