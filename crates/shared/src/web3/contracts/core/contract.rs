use alloy::{
    contract::{ContractInstance, Interface},
    json_abi::JsonAbi,
    primitives::Address,
    providers::Provider,
};

use std::include_bytes;

use super::error::ContractError;

macro_rules! include_abi {
    ($path:expr) => {{
        const ABI_BYTES: &[u8] = include_bytes!($path);
        ABI_BYTES
    }};
}

#[derive(Clone)]
pub struct Contract<P: Provider> {
    instance: ContractInstance<P>,
}

impl<P: Provider> Contract<P> {
    pub fn new(address: Address, provider: P, abi_file_path: &str) -> Result<Self, ContractError> {
        let abi = Self::parse_abi(abi_file_path)?;
        let instance = ContractInstance::new(address, provider, Interface::new(abi));
        Ok(Self { instance })
    }

    fn parse_abi(path: &str) -> Result<JsonAbi, ContractError> {
        let artifact = match path {
            "transactions.json" => include_abi!("../../../../artifacts/abi/transactions.json"),
            _ => return Err(ContractError::UnknownAbi(path.to_string())),
        };

        serde_json::from_slice(artifact).map_err(|source| ContractError::Abi {
            name: path.to_string(),
            source,
        })
    }

    pub fn instance(&self) -> &ContractInstance<P> {
        &self.instance
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::providers::ProviderBuilder;

    #[test]
    fn test_bundled_abi_exposes_ledger_functions() {
        let abi = Contract::<alloy::providers::RootProvider>::parse_abi("transactions.json").unwrap();
        for name in ["addToBlockchain", "getAllTransactions", "getTransactionCount"] {
            assert!(abi.function(name).is_some(), "missing {name}");
        }
        assert!(abi.event("Transfer").is_some());
    }

    #[test]
    fn test_unknown_abi_is_rejected() {
        let provider = ProviderBuilder::new().connect_http("http://localhost:8545".parse().unwrap());
        let result = Contract::new(Address::ZERO, provider, "missing.json");
        assert!(matches!(result, Err(ContractError::UnknownAbi(_))));
    }
}
