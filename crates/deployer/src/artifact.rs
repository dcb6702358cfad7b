use alloy::primitives::Bytes;
use eyre::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Hardhat writes `bytecode` as a hex string, Foundry nests it under `object`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Bytecode {
    Hex(String),
    Object { object: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactFile {
    contract_name: Option<String>,
    bytecode: Bytecode,
}

#[derive(Debug)]
pub(crate) struct Artifact {
    pub(crate) contract_name: Option<String>,
    pub(crate) bytecode: Bytes,
}

impl Artifact {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read artifact: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid artifact: {}", path.display()))
    }

    pub(crate) fn parse(content: &str) -> Result<Self> {
        let file: ArtifactFile = serde_json::from_str(content)?;
        let hex_code = match file.bytecode {
            Bytecode::Hex(code) | Bytecode::Object { object: code } => code,
        };

        let code = hex::decode(hex_code.trim().trim_start_matches("0x"))
            .context("Bytecode is not valid hex")?;
        if code.is_empty() {
            eyre::bail!("Artifact has no bytecode, is the contract abstract?");
        }

        Ok(Self {
            contract_name: file.contract_name,
            bytecode: Bytes::from(code),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_hardhat_artifact() {
        let artifact =
            Artifact::parse(r#"{"contractName":"Transactions","abi":[],"bytecode":"0x6080604052"}"#)
                .unwrap();
        assert_eq!(artifact.contract_name.as_deref(), Some("Transactions"));
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_foundry_artifact() {
        let artifact =
            Artifact::parse(r#"{"abi":[],"bytecode":{"object":"0x6080","linkReferences":{}}}"#)
                .unwrap();
        assert!(artifact.contract_name.is_none());
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn test_empty_or_broken_bytecode_is_rejected() {
        assert!(Artifact::parse(r#"{"bytecode":"0x"}"#).is_err());
        assert!(Artifact::parse(r#"{"bytecode":"0xzz"}"#).is_err());
        assert!(Artifact::parse(r#"{"abi":[]}"#).is_err());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Transactions.json");
        std::fs::write(&path, r#"{"bytecode":"6080"}"#).unwrap();

        assert_eq!(Artifact::load(&path).unwrap().bytecode.len(), 2);
        assert!(Artifact::load(&dir.path().join("missing.json")).is_err());
    }
}
