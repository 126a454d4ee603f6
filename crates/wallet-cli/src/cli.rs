//! Command-line arguments.

use clap::{ArgAction, Parser, Subcommand};

use chain_eth::transaction::TRANSFER_GAS;

/// Minimal Ethereum wallet: create accounts, sign messages and send ether.
#[derive(Debug, Parser)]
#[command(name = "ethwallet", version)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON-RPC endpoint of the Ethereum node
    #[arg(long, env = "NET_URL", global = true, value_name = "URL")]
    pub rpc_url: Option<String>,

    /// Hex private key used by `sign-message` and `send-tx`
    #[arg(long, env = "PRIVATE_KEY", global = true, hide_env_values = true)]
    pub private_key: Option<String>,

    /// Node request timeout in seconds
    #[arg(long, global = true, default_value_t = 30, value_name = "SECS")]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a new account and print its address and private key
    CreateAccount,

    /// Show the ether balance of an address
    Balance {
        #[arg(long)]
        address: String,
    },

    /// Sign a message with the personal_sign (EIP-191) scheme
    SignMessage {
        #[arg(long)]
        message: String,
    },

    /// Check that a signature over a message was made by an address
    VerifyMessage {
        #[arg(long)]
        message: String,

        /// 65-byte signature as hex
        #[arg(long)]
        signature: String,

        /// Expected signer
        #[arg(long)]
        address: String,
    },

    /// Send ether to an address
    SendTx {
        /// Recipient address
        #[arg(long)]
        address: String,

        /// Amount in ether, e.g. `0.01`
        #[arg(long)]
        amount: String,

        #[arg(long, default_value_t = TRANSFER_GAS)]
        gas_limit: u64,

        /// Sign and print the raw transaction without broadcasting it
        #[arg(long)]
        dry_run: bool,
    },

    /// Look up a transaction and its receipt
    CheckTx {
        /// Transaction hash
        #[arg(long)]
        tx: String,
    },
}
