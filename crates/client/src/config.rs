use alloy::primitives::Address;
use clap::ValueEnum;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::models::PartyOrder;
use shared::web3::contracts::constants::addresses::LOCAL_TRANSACTIONS_ADDRESS;
use std::path::Path;
use std::str::FromStr;
use url::Url;

const DEFAULT_RPC_URL: &str = "http://localhost:8545";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WalletMode {
    /// Sign locally with a private key
    #[default]
    Local,
    /// Let the node sign with one of its unlocked accounts
    Node,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub(crate) struct Config {
    pub(crate) rpc_url: Option<String>,
    pub(crate) contract_address: Option<String>,
    pub(crate) wallet_mode: Option<WalletMode>,
    pub(crate) party_order: Option<PartyOrder>,
    pub(crate) state_dir: Option<String>,
    #[serde(skip)]
    pub(crate) private_key: Option<String>,
}

impl Config {
    pub(crate) fn load(config_path: &Option<String>, env_file: &str) -> Result<Self> {
        dotenv::from_filename(env_file).ok();

        let mut config = if let Some(path) = config_path {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };

        config.load_from_env()?;
        Ok(config)
    }

    pub(crate) fn load_from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path}"))?;

        Ok(config)
    }

    pub(crate) fn load_from_env(&mut self) -> Result<()> {
        if let Ok(rpc_url) = std::env::var("RPC_URL") {
            self.rpc_url = Some(rpc_url);
        }
        if let Ok(address) = std::env::var("CONTRACT_ADDRESS") {
            self.contract_address = Some(address);
        }
        if let Ok(key) = std::env::var("PRIVATE_KEY") {
            self.private_key = Some(key);
        }
        if let Ok(mode) = std::env::var("WALLET_MODE") {
            self.wallet_mode = Some(
                WalletMode::from_str(&mode, true)
                    .map_err(|e| eyre::eyre!("Invalid WALLET_MODE: {e}"))?,
            );
        }
        if let Ok(order) = std::env::var("PARTY_ORDER") {
            self.party_order = Some(
                PartyOrder::from_str(&order).map_err(|e| eyre::eyre!("Invalid PARTY_ORDER: {e}"))?,
            );
        }
        if let Ok(dir) = std::env::var("STATE_DIR") {
            self.state_dir = Some(dir);
        }
        Ok(())
    }

    pub(crate) fn with_rpc_url(mut self, rpc_url: String) -> Self {
        self.rpc_url = Some(rpc_url);
        self
    }

    pub(crate) fn with_contract_address(mut self, address: String) -> Self {
        self.contract_address = Some(address);
        self
    }

    pub(crate) fn with_wallet_mode(mut self, mode: WalletMode) -> Self {
        self.wallet_mode = Some(mode);
        self
    }

    pub(crate) fn with_party_order(mut self, order: PartyOrder) -> Self {
        self.party_order = Some(order);
        self
    }

    pub(crate) fn with_state_dir(mut self, dir: String) -> Self {
        self.state_dir = Some(dir);
        self
    }

    pub(crate) fn get_rpc_url(&self) -> Result<Url> {
        let rpc_url = self.rpc_url.as_deref().unwrap_or(DEFAULT_RPC_URL);
        Url::parse(rpc_url).with_context(|| format!("Invalid RPC URL: {rpc_url}"))
    }

    /// Falls back to the address of a fresh local deployment.
    pub(crate) fn get_contract_address(&self) -> Result<Address> {
        match &self.contract_address {
            Some(address) => Address::from_str(address.trim())
                .with_context(|| format!("Invalid contract address: {address}")),
            None => Ok(LOCAL_TRANSACTIONS_ADDRESS),
        }
    }

    pub(crate) fn wallet_mode(&self) -> WalletMode {
        self.wallet_mode.unwrap_or_default()
    }

    pub(crate) fn party_order(&self) -> PartyOrder {
        self.party_order.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load_from_file("/definitely/not/here.toml").unwrap();
        assert!(config.rpc_url.is_none());
        assert_eq!(config.wallet_mode(), WalletMode::Local);
        assert_eq!(config.party_order(), PartyOrder::Swapped);
        assert_eq!(
            config.get_contract_address().unwrap(),
            LOCAL_TRANSACTIONS_ADDRESS
        );
        assert_eq!(config.get_rpc_url().unwrap().as_str(), "http://localhost:8545/");
    }

    #[test]
    fn test_file_values_are_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(
            &path,
            r#"
rpc_url = "http://10.0.0.2:8545"
contract_address = "0x1111111111111111111111111111111111111111"
wallet_mode = "node"
party_order = "direct"
state_dir = "/tmp/ledger"
"#,
        )
        .unwrap();

        let config = Config::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.get_rpc_url().unwrap().host_str(), Some("10.0.0.2"));
        assert_eq!(
            config.get_contract_address().unwrap(),
            Address::repeat_byte(0x11)
        );
        assert_eq!(config.wallet_mode(), WalletMode::Node);
        assert_eq!(config.party_order(), PartyOrder::Direct);
        assert_eq!(config.state_dir.as_deref(), Some("/tmp/ledger"));
        assert!(config.private_key.is_none());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config {
            rpc_url: Some("http://a:1".to_string()),
            ..Default::default()
        }
        .with_rpc_url("http://b:2".to_string())
        .with_party_order(PartyOrder::Direct);

        assert_eq!(config.get_rpc_url().unwrap().host_str(), Some("b"));
        assert_eq!(config.party_order(), PartyOrder::Direct);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let config = Config {
            rpc_url: Some("not a url".to_string()),
            contract_address: Some("0x123".to_string()),
            ..Default::default()
        };
        assert!(config.get_rpc_url().is_err());
        assert!(config.get_contract_address().is_err());
    }
}
