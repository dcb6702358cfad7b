use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::web3::contracts::helpers::utils::{format_ether_trimmed, format_timestamp};
use crate::web3::contracts::structs::transaction::TransferStruct;

/// How ledger parties map onto the displayed from/to columns.
///
/// The deployed front-end has always shown the contract's `receiver` as the
/// sender and `sender` as the recipient. `Swapped` keeps that; `Direct` maps
/// the fields literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyOrder {
    #[default]
    Swapped,
    Direct,
}

impl FromStr for PartyOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "swapped" => Ok(Self::Swapped),
            "direct" => Ok(Self::Direct),
            _ => Err(format!(
                "Invalid party order: {s}. Use 'swapped' or 'direct'"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub address_from: Address,
    pub address_to: Address,
    pub timestamp: String,
    pub message: String,
    pub keyword: String,
    pub amount: String,
}

impl TransactionRecord {
    pub fn from_transfer(transfer: TransferStruct, order: PartyOrder) -> Self {
        let (address_from, address_to) = match order {
            PartyOrder::Swapped => (transfer.receiver, transfer.sender),
            PartyOrder::Direct => (transfer.sender, transfer.receiver),
        };

        Self {
            address_from,
            address_to,
            timestamp: format_timestamp(transfer.timestamp),
            message: transfer.message,
            keyword: transfer.keyword,
            amount: format_ether_trimmed(transfer.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn transfer() -> TransferStruct {
        TransferStruct {
            sender: Address::repeat_byte(0xaa),
            receiver: Address::repeat_byte(0xbb),
            amount: U256::from(1_000_000_000_000_000_000u64),
            message: "hello".to_string(),
            timestamp: 1_700_000_000,
            keyword: "wave".to_string(),
        }
    }

    #[test]
    fn test_swapped_order_reproduces_deployed_mapping() {
        let record = TransactionRecord::from_transfer(transfer(), PartyOrder::Swapped);
        assert_eq!(record.address_from, Address::repeat_byte(0xbb));
        assert_eq!(record.address_to, Address::repeat_byte(0xaa));
        assert_eq!(record.amount, "1.0");
        assert_eq!(record.message, "hello");
        assert_eq!(record.keyword, "wave");
        assert!(!record.timestamp.is_empty());
    }

    #[test]
    fn test_direct_order_maps_literally() {
        let record = TransactionRecord::from_transfer(transfer(), PartyOrder::Direct);
        assert_eq!(record.address_from, Address::repeat_byte(0xaa));
        assert_eq!(record.address_to, Address::repeat_byte(0xbb));
    }

    #[test]
    fn test_party_order_parsing() {
        assert_eq!("Direct".parse::<PartyOrder>(), Ok(PartyOrder::Direct));
        assert_eq!("swapped".parse::<PartyOrder>(), Ok(PartyOrder::Swapped));
        assert!("reversed".parse::<PartyOrder>().is_err());
        assert_eq!(PartyOrder::default(), PartyOrder::Swapped);
    }
}
