use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ctfkit::config::{self, Config};
use ctfkit::{
    create_account, format_value, load_account, load_interface, parse_address, parse_args,
    parse_slot, parse_tx_hash, receipt_status, BlockingClient, ContractInterface, MethodSpec,
};

#[derive(Debug, Parser)]
#[command(
    name = "ctfkit",
    version,
    about = "ctfkit: query and transact against an Ethereum JSON-RPC node"
)]
struct Args {
    /// HTTP JSON-RPC endpoint (e.g. http://localhost:8545)
    #[arg(long, global = true)]
    rpc: Option<String>,

    /// Config file path (defaults to ~/.config/ctfkit/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the latest block height
    Block,

    /// Read a raw storage slot
    Storage { address: String, slot: String },

    /// Print a transaction receipt
    Receipt { hash: String },

    /// Call a view method and print the decoded outputs
    Call {
        /// ABI JSON file (bare array or build artifact)
        #[arg(long)]
        abi: PathBuf,

        /// Sender address for the call
        #[arg(long)]
        from: Option<String>,

        address: String,
        method: String,

        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Sign and submit a transaction calling a method
    Send {
        #[arg(long)]
        abi: PathBuf,

        /// Hex private key (defaults to the configured key)
        #[arg(long)]
        key: Option<String>,

        address: String,
        method: String,

        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List the methods of an ABI file with their selectors
    Abi { path: PathBuf },

    /// Manage local keys
    #[command(subcommand)]
    Account(AccountCommand),
}

#[derive(Debug, Subcommand)]
enum AccountCommand {
    /// Generate a new random account
    New,

    /// Show the address for a private key
    Show {
        #[arg(long)]
        key: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args);

    match args.command {
        Command::Block => {
            let mut client = connect(&config)?;
            let height = client
                .latest_block_height()
                .context("Failed to fetch latest block")?;
            println!("{}", height);
        }
        Command::Storage { address, slot } => {
            let address = parse_address(&address)?;
            let slot = parse_slot(&slot)?;
            let mut client = connect(&config)?;
            let word = client
                .get_storage_at(address, slot)
                .context("Failed to read storage")?;
            println!("{}", word);
        }
        Command::Receipt { hash } => {
            let hash = parse_tx_hash(&hash)?;
            let mut client = connect(&config)?;
            match client
                .get_transaction_receipt(hash)
                .context("Failed to fetch receipt")?
            {
                Some(receipt) => {
                    println!("{}", serde_json::to_string_pretty(&receipt)?);
                    match receipt_status(&receipt) {
                        Some(true) => eprintln!("status: success"),
                        Some(false) => eprintln!("status: reverted"),
                        None => {}
                    }
                }
                None => println!("pending"),
            }
        }
        Command::Call {
            abi,
            from,
            address,
            method,
            args,
        } => {
            let interface = load_interface(&abi)
                .with_context(|| format!("Failed to load ABI from {}", abi.display()))?;
            let spec = find_method(&interface, &method, &abi)?;
            let values = parse_args(spec, &args)?;
            let to = parse_address(&address)?;
            let from = match from {
                Some(from) => parse_address(&from)?,
                None => Address::ZERO,
            };

            let mut client = connect(&config)?;
            let outputs = client
                .query(from, to, &interface, &method, &values)
                .with_context(|| format!("Call to {} failed", spec.signature))?;
            for output in &outputs {
                println!("{}", format_value(output));
            }
        }
        Command::Send {
            abi,
            key,
            address,
            method,
            args,
        } => {
            let Some(key) = key.or_else(|| config.private_key.clone()) else {
                bail!("No private key: pass --key or set private_key in the config");
            };
            let account = load_account(&key)?;

            let interface = load_interface(&abi)
                .with_context(|| format!("Failed to load ABI from {}", abi.display()))?;
            let spec = find_method(&interface, &method, &abi)?;
            let values = parse_args(spec, &args)?;
            let to = parse_address(&address)?;

            let mut client = connect(&config)?;
            let hash = client
                .submit_transaction(&account, to, &interface, &method, &values)
                .with_context(|| format!("Transaction to {} failed", spec.signature))?;
            println!("{}", hash);
        }
        Command::Abi { path } => {
            let interface = load_interface(&path)
                .with_context(|| format!("Failed to load ABI from {}", path.display()))?;
            let mut methods: Vec<_> = interface.methods().collect();
            methods.sort_by(|a, b| a.signature.cmp(&b.signature));
            for method in methods {
                println!("{}  {}", method.selector_hex(), method.signature);
            }
        }
        Command::Account(AccountCommand::New) => {
            let (address, key) = create_account().export();
            println!("address: {}", address);
            println!("private key: {}", key);
        }
        Command::Account(AccountCommand::Show { key }) => {
            let Some(key) = key.or_else(|| config.private_key.clone()) else {
                bail!("No private key: pass --key or set private_key in the config");
            };
            let account = load_account(&key)?;
            println!("{}", account.address().to_checksum(None));
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// File config, then env overrides, then the `--rpc` flag
fn load_config(args: &Args) -> Config {
    config::load_with(args.config.as_deref()).apply_overrides(args.rpc.clone(), None)
}

fn find_method<'a>(
    interface: &'a ContractInterface,
    method: &str,
    abi: &Path,
) -> Result<&'a MethodSpec> {
    interface.method(method).with_context(|| {
        format!(
            "Method `{}` not found in {} (available: {})",
            method,
            abi.display(),
            interface.names().join(", ")
        )
    })
}

fn connect(config: &Config) -> Result<BlockingClient> {
    let url = config.rpc_url();
    let mut client = BlockingClient::new(url.clone())?;
    client
        .init()
        .with_context(|| format!("Failed to connect to {}", url))?;
    Ok(client)
}
