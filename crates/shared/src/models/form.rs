use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::web3::contracts::helpers::utils::parse_ether_amount;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no account connected")]
    NotConnected,
    #[error("invalid recipient address {0:?}")]
    InvalidAddress(String),
    #[error("{0}")]
    InvalidAmount(String),
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("unknown form field {0:?}")]
    UnknownField(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    AddressTo,
    Amount,
    Keyword,
    Message,
}

impl FromStr for FormField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addressTo" | "address_to" => Ok(Self::AddressTo),
            "amount" => Ok(Self::Amount),
            "keyword" => Ok(Self::Keyword),
            "message" => Ok(Self::Message),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AddressTo => "addressTo",
            Self::Amount => "amount",
            Self::Keyword => "keyword",
            Self::Message => "message",
        };
        f.write_str(name)
    }
}

/// Raw, user-typed form contents. Nothing here is checked until `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
    pub address_to: String,
    pub amount: String,
    pub keyword: String,
    pub message: String,
}

impl FormData {
    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::AddressTo => &mut self.address_to,
            FormField::Amount => &mut self.amount,
            FormField::Keyword => &mut self.keyword,
            FormField::Message => &mut self.message,
        };
        *slot = value;
    }

    /// Syntactic checks only; nothing is compared against chain state.
    pub fn validate(&self) -> Result<TransferRequest, ValidationError> {
        let to = Address::from_str(self.address_to.trim())
            .map_err(|_| ValidationError::InvalidAddress(self.address_to.clone()))?;
        let amount = parse_ether_amount(&self.amount).map_err(ValidationError::InvalidAmount)?;
        if amount.is_zero() {
            return Err(ValidationError::ZeroAmount);
        }

        Ok(TransferRequest {
            to,
            amount,
            keyword: self.keyword.clone(),
            message: self.message.clone(),
        })
    }
}

/// A validated transfer, amount already in wei.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: Address,
    pub amount: U256,
    pub keyword: String,
    pub message: String,
}
