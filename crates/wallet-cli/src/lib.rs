//! `ethwallet`: a small command-line Ethereum wallet.
//!
//! Key handling, message signing and transaction construction live in
//! `chain-eth`; this crate adds argument parsing, configuration, the node
//! JSON-RPC client and the command glue around them.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod rpc;
pub mod types;

use cli::{Cli, Command};
use config::{TransferRequest, WalletConfig};
use error::WalletError;
use rpc::NodeClient;

/// Runs one parsed command and returns the text to print on stdout.
pub async fn run(cli: Cli) -> Result<String, WalletError> {
    let config = WalletConfig::from_cli(&cli);

    let output = match cli.command {
        Command::CreateAccount => commands::create_account()?.to_string(),
        Command::SignMessage { message } => commands::sign_message(&config, &message)?.to_string(),
        Command::VerifyMessage {
            message,
            signature,
            address,
        } => commands::verify_message(&message, &signature, &address)?.to_string(),
        Command::Balance { address } => {
            let node = connect(&config)?;
            commands::balance(&node, &address).await?.to_string()
        }
        Command::SendTx {
            address,
            amount,
            gas_limit,
            dry_run,
        } => {
            let request = TransferRequest::parse(&address, &amount, gas_limit, dry_run)?;
            let node = connect(&config)?;
            commands::send_transaction(&node, &config, &request)
                .await?
                .to_string()
        }
        Command::CheckTx { tx } => {
            let node = connect(&config)?;
            commands::check_transaction(&node, &tx).await?.to_string()
        }
    };

    Ok(output)
}

fn connect(config: &WalletConfig) -> Result<NodeClient, WalletError> {
    let url = config.rpc_url()?;
    tracing::debug!(url, timeout = ?config.request_timeout, "connecting to node");
    Ok(NodeClient::new(url, config.request_timeout)?)
}
