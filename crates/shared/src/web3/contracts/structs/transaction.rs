use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};

use crate::web3::contracts::core::error::ContractError;

const GET_ALL_TRANSACTIONS: &str = "getAllTransactions";

/// One ledger entry exactly as `Transactions.sol` stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferStruct {
    pub sender: Address,
    pub receiver: Address,
    pub amount: U256,
    pub message: String,
    pub timestamp: u64,
    pub keyword: String,
}

impl TryFrom<&DynSolValue> for TransferStruct {
    type Error = ContractError;

    fn try_from(value: &DynSolValue) -> Result<Self, Self::Error> {
        let fields = value
            .as_tuple()
            .ok_or_else(|| ContractError::decode(GET_ALL_TRANSACTIONS, "entry is not a tuple"))?;
        if fields.len() != 6 {
            return Err(ContractError::decode(
                GET_ALL_TRANSACTIONS,
                format!("expected 6 fields, got {}", fields.len()),
            ));
        }

        let sender = fields[0]
            .as_address()
            .ok_or_else(|| ContractError::decode(GET_ALL_TRANSACTIONS, "sender is not an address"))?;
        let receiver = fields[1].as_address().ok_or_else(|| {
            ContractError::decode(GET_ALL_TRANSACTIONS, "receiver is not an address")
        })?;
        let amount = fields[2]
            .as_uint()
            .ok_or_else(|| ContractError::decode(GET_ALL_TRANSACTIONS, "amount is not a uint"))?
            .0;
        let message = fields[3]
            .as_str()
            .ok_or_else(|| ContractError::decode(GET_ALL_TRANSACTIONS, "message is not a string"))?
            .to_string();
        let timestamp = fields[4]
            .as_uint()
            .ok_or_else(|| ContractError::decode(GET_ALL_TRANSACTIONS, "timestamp is not a uint"))?
            .0;
        let timestamp = u64::try_from(timestamp).map_err(|_| {
            ContractError::decode(GET_ALL_TRANSACTIONS, format!("timestamp {timestamp} overflows"))
        })?;
        let keyword = fields[5]
            .as_str()
            .ok_or_else(|| ContractError::decode(GET_ALL_TRANSACTIONS, "keyword is not a string"))?
            .to_string();

        Ok(Self {
            sender,
            receiver,
            amount,
            message,
            timestamp,
            keyword,
        })
    }
}
