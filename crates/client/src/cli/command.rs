use crate::config::{Config, WalletMode};
use crate::console::Console;
use crate::secure_key::get_private_key;
use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use log::{info, warn};
use shared::context::{TransactionContext, TransactionState};
use shared::models::{FormField, PartyOrder};
use shared::storage::LocalStorage;
use shared::web3::{Gateway, NodeWallet, Wallet, WalletProvider};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

#[derive(Parser)]
#[command(name = "client")]
#[command(author, version, about = "Send ETH with a message and browse the on-chain ledger", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub(crate) config: Option<String>,

    /// Environment file path
    #[arg(long, global = true, default_value = ".env")]
    pub(crate) env_file: String,

    /// RPC URL (overrides config)
    #[arg(long, global = true)]
    pub(crate) rpc_url: Option<String>,

    /// Transactions contract address (overrides config)
    #[arg(long, global = true)]
    pub(crate) contract_address: Option<String>,

    /// Private key source: env:VAR_NAME, file:/path/to/key or prompt
    #[arg(long, global = true)]
    pub(crate) key: Option<String>,

    /// Who signs transactions
    #[arg(long, global = true, value_enum)]
    pub(crate) wallet_mode: Option<WalletMode>,

    /// How ledger parties map to the displayed from/to (swapped, direct)
    #[arg(long, global = true)]
    pub(crate) party_order: Option<PartyOrder>,

    /// Optional state storage directory overwrite
    #[arg(long, global = true)]
    pub(crate) state_dir: Option<String>,

    /// Disable state storing
    #[arg(long, global = true, default_value = "false")]
    pub(crate) disable_state_storing: bool,

    /// Log level
    #[arg(long, global = true)]
    pub(crate) log_level: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Request account access from the wallet
    Connect,

    /// Send ETH and record the transfer on the ledger
    Send {
        /// Recipient address
        #[arg(long)]
        to: String,

        /// Amount in ETH, e.g. 0.01
        #[arg(long)]
        amount: String,

        /// Keyword stored alongside the transfer
        #[arg(long, default_value = "")]
        keyword: String,

        /// Message stored alongside the transfer
        #[arg(long, default_value = "")]
        message: String,
    },

    /// List every transfer recorded on the ledger, latest first
    List {
        /// Print the records as JSON in ledger order
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Show how many transfers the ledger holds
    Count,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(&self.config, &self.env_file)?;

        if let Some(rpc_url) = &self.rpc_url {
            config = config.with_rpc_url(rpc_url.clone());
        }
        if let Some(address) = &self.contract_address {
            config = config.with_contract_address(address.clone());
        }
        if let Some(mode) = self.wallet_mode {
            config = config.with_wallet_mode(mode);
        }
        if let Some(order) = self.party_order {
            config = config.with_party_order(order);
        }
        if let Some(dir) = &self.state_dir {
            config = config.with_state_dir(dir.clone());
        }
        Ok(config)
    }

    fn build_wallet(&self, config: &Config) -> Result<Option<Arc<dyn WalletProvider>>> {
        let rpc_url = config.get_rpc_url()?;

        match config.wallet_mode() {
            WalletMode::Node => {
                info!("Using node-managed accounts at {rpc_url}");
                let wallet: Arc<dyn WalletProvider> = Arc::new(NodeWallet::new(rpc_url));
                Ok(Some(wallet))
            }
            WalletMode::Local => {
                let Some(private_key) =
                    get_private_key(self.key.as_deref(), config.private_key.as_deref())?
                else {
                    warn!("No private key configured, running without a wallet");
                    return Ok(None);
                };
                let wallet = Wallet::new(&private_key, rpc_url)
                    .context("Failed to create wallet")?;
                info!("Using local signer {}", wallet.address());
                let wallet: Arc<dyn WalletProvider> = Arc::new(wallet);
                Ok(Some(wallet))
            }
        }
    }

    fn build_context(&self) -> Result<TransactionContext> {
        let config = self.load_config()?;
        let wallet = self.build_wallet(&config)?;
        let gateway = Gateway::new(wallet, config.get_contract_address()?);
        let storage = Arc::new(LocalStorage::new(
            config.state_dir.clone(),
            self.disable_state_storing,
        ));

        Ok(TransactionContext::new(
            gateway,
            storage,
            config.party_order(),
        ))
    }

    pub async fn run(self) -> Result<()> {
        let context = self.build_context()?;

        match self.command {
            Commands::Connect => connect(&context).await,
            Commands::Send {
                to,
                amount,
                keyword,
                message,
            } => send(&context, to, amount, keyword, message).await,
            Commands::List { json } => list(&context, json).await,
            Commands::Count => count(&context).await,
        }
    }
}

/// Prints the pending alert, if any. Returns whether one was shown.
fn report_alert(context: &TransactionContext) -> bool {
    match context.state().alert {
        Some(alert) => {
            Console::warning(&alert);
            true
        }
        None => false,
    }
}

async fn startup(context: &TransactionContext) {
    if let Err(e) = context.initialize().await {
        warn!("Startup checks failed: {e}");
    }
}

async fn connect(context: &TransactionContext) -> Result<()> {
    context.connect_wallet().await?;
    if report_alert(context) {
        return Ok(());
    }

    match context.state().current_account {
        Some(account) => Console::success(&format!("Connected {account}")),
        None => Console::warning("No accounts found"),
    }
    Ok(())
}

async fn send(
    context: &TransactionContext,
    to: String,
    amount: String,
    keyword: String,
    message: String,
) -> Result<()> {
    startup(context).await;
    if report_alert(context) {
        return Ok(());
    }
    if !context.state().is_connected() {
        context.connect_wallet().await?;
    }

    context.handle_change(FormField::AddressTo, to);
    context.handle_change(FormField::Amount, amount);
    context.handle_change(FormField::Keyword, keyword);
    context.handle_change(FormField::Message, message);

    let (done, finished) = oneshot::channel();
    let progress = track_confirmation(context.subscribe(), finished);

    let result = context.send_transaction().await;
    let _ = done.send(());
    if let Err(e) = progress.await {
        warn!("Confirmation display failed: {e}");
    }

    if let Err(e) = result {
        Console::error(&e.to_string());
        return Err(e.into());
    }

    let state = context.state();
    Console::success("Transfer recorded on the ledger");
    if let Some(count) = state.transaction_count {
        Console::info("Transaction count", &count.to_string());
    }
    Ok(())
}

/// Shows a spinner while a ledger write is pending. Resolves to whether the
/// spinner was shown. `finished` fires once the send returns; if loading never
/// started by then the task stops without drawing anything.
fn track_confirmation(
    mut states: watch::Receiver<TransactionState>,
    finished: oneshot::Receiver<()>,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let started = tokio::select! {
            loading = async { states.wait_for(|state| state.is_loading).await.is_ok() } => loading,
            _ = finished => false,
        };
        if !started {
            return false;
        }

        let pending = states
            .borrow()
            .pending_hash
            .map(|hash| hash.to_string())
            .unwrap_or_default();
        let spinner = Console::spinner(&format!("Waiting for confirmation {pending}"));
        let _ = states.wait_for(|state| !state.is_loading).await;
        spinner.finish_and_clear();
        true
    })
}

async fn list(context: &TransactionContext, json: bool) -> Result<()> {
    startup(context).await;
    let state = context.state();

    if json {
        println!("{}", serde_json::to_string_pretty(&state.transactions)?);
        return Ok(());
    }

    report_alert(context);
    Console::section("Latest Transactions");
    if state.transactions.is_empty() {
        Console::warning("No transactions found");
    }
    for record in state.transactions.iter().rev() {
        Console::record(record);
    }
    Ok(())
}

async fn count(context: &TransactionContext) -> Result<()> {
    context.check_if_transactions_exist().await?;
    report_alert(context);

    match context.state().transaction_count {
        Some(count) => Console::info("Transaction count", &count.to_string()),
        None => Console::warning("Transaction count unknown"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_arguments_parse() {
        let cli = Cli::try_parse_from([
            "client",
            "--party-order",
            "direct",
            "send",
            "--to",
            "0x2222222222222222222222222222222222222222",
            "--amount",
            "0.5",
            "--message",
            "lunch",
        ])
        .unwrap();

        assert_eq!(cli.party_order, Some(PartyOrder::Direct));
        match cli.command {
            Commands::Send {
                amount,
                keyword,
                message,
                ..
            } => {
                assert_eq!(amount, "0.5");
                assert_eq!(keyword, "");
                assert_eq!(message, "lunch");
            }
            _ => panic!("expected send command"),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "client",
            "list",
            "--json",
            "--wallet-mode",
            "node",
            "--disable-state-storing",
        ])
        .unwrap();

        assert_eq!(cli.wallet_mode, Some(WalletMode::Node));
        assert!(cli.disable_state_storing);
        assert!(matches!(cli.command, Commands::List { json: true }));
    }

    #[test]
    fn test_invalid_party_order_is_rejected() {
        let result = Cli::try_parse_from(["client", "--party-order", "sideways", "count"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_local_mode_without_key_runs_walletless() {
        let cli = Cli::try_parse_from(["client", "count"]).unwrap();
        let config = Config::default();

        assert!(cli.build_wallet(&config).unwrap().is_none());
    }

    #[test]
    fn test_node_mode_always_has_wallet() {
        let cli = Cli::try_parse_from(["client", "count"]).unwrap();
        let config = Config::default().with_wallet_mode(WalletMode::Node);

        assert!(cli.build_wallet(&config).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_confirmation_tracker_stops_when_send_fails_early() {
        let (_state, states) = watch::channel(TransactionState::default());
        let (done, finished) = oneshot::channel();
        let progress = track_confirmation(states, finished);

        done.send(()).unwrap();
        assert!(!progress.await.unwrap());
    }

    #[tokio::test]
    async fn test_confirmation_tracker_waits_for_loading_to_end() {
        let (state, states) = watch::channel(TransactionState {
            is_loading: true,
            ..Default::default()
        });
        let (done, finished) = oneshot::channel();
        let progress = track_confirmation(states, finished);
        tokio::task::yield_now().await;

        state.send_modify(|state| state.is_loading = false);
        drop(done);
        assert!(progress.await.unwrap());
    }
}
