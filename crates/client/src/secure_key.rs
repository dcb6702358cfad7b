use eyre::{Context, Result};
use log::warn;
use std::env;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KeySource {
    Environment(String),
    File(String),
    Interactive,
}

impl KeySource {
    /// Parses `env:VAR`, `file:PATH` or `prompt`. A raw key on the command
    /// line is refused and falls back to the prompt.
    pub(crate) fn from_arg(key_arg: &str) -> Self {
        if let Some(var) = key_arg.strip_prefix("env:") {
            return Self::Environment(var.to_string());
        }
        if let Some(path) = key_arg.strip_prefix("file:") {
            return Self::File(path.to_string());
        }
        if key_arg != "prompt" {
            warn!("Direct private key arguments are not accepted for security reasons.");
            warn!("Use 'env:VAR_NAME', 'file:/path/to/key' or 'prompt' instead.");
        }
        Self::Interactive
    }

    pub(crate) fn resolve(&self) -> Result<String> {
        match self {
            Self::Environment(var_name) => env::var(var_name)
                .with_context(|| format!("Environment variable {var_name} not found")),
            Self::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read private key from file: {path}"))
                .map(|s| s.trim().to_string()),
            Self::Interactive => {
                print!("Enter private key (hidden): ");
                io::stdout().flush().context("Failed to flush stdout")?;
                rpassword::read_password().context("Failed to read private key")
            }
        }
    }
}

/// An explicit `--key` wins over the configured key. `None` means the
/// client runs without a wallet.
pub(crate) fn get_private_key(
    key_arg: Option<&str>,
    configured: Option<&str>,
) -> Result<Option<String>> {
    match key_arg {
        Some(arg) => KeySource::from_arg(arg).resolve().map(Some),
        None => Ok(configured.map(str::to_string)),
    }
}
