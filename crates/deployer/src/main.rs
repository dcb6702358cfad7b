use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use clap::Parser;
use eyre::{Context, Result};
use log::{error, info, LevelFilter};
use shared::web3::Wallet;
use std::path::PathBuf;
use std::process::ExitCode;
use url::Url;

mod artifact;

use artifact::Artifact;

const DEFAULT_RPC_URL: &str = "http://localhost:8545";

#[derive(Parser)]
#[command(author, version, about = "Deploy the Transactions ledger contract", long_about = None)]
struct Args {
    /// Compiled contract artifact (Hardhat or Foundry JSON)
    #[arg(long, default_value = "artifacts/contracts/Transactions.sol/Transactions.json")]
    artifact: PathBuf,

    /// RPC URL, falls back to RPC_URL and then the local node
    #[arg(long)]
    rpc_url: Option<String>,

    /// Environment variable holding the deployer private key
    #[arg(long, default_value = "PRIVATE_KEY")]
    key_env: String,

    /// Environment file path
    #[arg(long, default_value = ".env")]
    env_file: String,
}

async fn deploy(args: &Args) -> Result<()> {
    let artifact = Artifact::load(&args.artifact)?;
    let private_key = std::env::var(&args.key_env)
        .with_context(|| format!("Environment variable {} not found", args.key_env))?;
    let rpc_url = args
        .rpc_url
        .clone()
        .or_else(|| std::env::var("RPC_URL").ok())
        .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
    let rpc_url =
        Url::parse(&rpc_url).with_context(|| format!("Invalid RPC URL: {rpc_url}"))?;

    let wallet = Wallet::new(&private_key, rpc_url).context("Failed to create wallet")?;
    info!(
        "Deploying {} ({} bytes) from {}",
        artifact.contract_name.as_deref().unwrap_or("Transactions"),
        artifact.bytecode.len(),
        wallet.address()
    );

    let tx = TransactionRequest::default()
        .with_from(wallet.address())
        .with_deploy_code(artifact.bytecode);

    let pending = wallet.provider.send_transaction(tx).await?;
    info!("Deployment submitted: {}", pending.tx_hash());
    let receipt = pending.get_receipt().await?;

    if !receipt.status() {
        eyre::bail!("Deployment reverted in tx {}", receipt.transaction_hash);
    }
    let address = receipt
        .contract_address
        .ok_or_else(|| eyre::eyre!("Receipt has no contract address"))?;

    println!("Transactions deployed to: {address}");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let args = Args::parse();
    dotenv::from_filename(&args.env_file).ok();

    match deploy(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
