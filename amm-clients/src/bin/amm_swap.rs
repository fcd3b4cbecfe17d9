//! Command line front end for native-token swaps.
//!
//! Run with:
//! ```
//! RPC_URL=<rpc> KEYPAIR=~/.config/solana/id.json \
//!   cargo run --bin amm-swap -- buy <pool> 0.1 --variant legacy
//! ```

use std::path::PathBuf;

use amm_clients::prelude::*;
use anchor_client::solana_sdk::signature::read_keypair_file;
use anchor_client::solana_sdk::signer::Signer;
use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "amm-swap")]
#[command(about = "Swap SOL against legacy and constant-product AMM pools")]
struct Args {
  /// RPC endpoint, defaults to the network's public endpoint
  #[arg(long, env = "RPC_URL")]
  rpc_url: Option<String>,

  /// Payer keypair file
  #[arg(long, env = "KEYPAIR")]
  keypair: Option<PathBuf>,

  #[arg(long, default_value = "mainnet")]
  network: Network,

  /// TOML file overriding swap defaults
  #[arg(long)]
  config: Option<PathBuf>,

  /// Verbose logging
  #[arg(short, long)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Spend SOL on the pool's token
  Buy {
    pool: Pubkey,
    /// SOL to spend
    amount: Decimal,
    #[arg(long, default_value = "legacy")]
    variant: PoolVariant,
    #[arg(long)]
    slippage_bps: Option<u16>,
  },
  /// Sell a share of the held token for SOL
  Sell {
    pool: Pubkey,
    /// Share of the balance to sell, 1 to 100
    #[arg(default_value_t = 100)]
    percentage: u8,
    #[arg(long, default_value = "legacy")]
    variant: PoolVariant,
    #[arg(long)]
    slippage_bps: Option<u16>,
  },
  /// Price a buy or sell without submitting
  Quote {
    pool: Pubkey,
    input_mint: Pubkey,
    output_mint: Pubkey,
    amount: Decimal,
    #[arg(long, default_value = "legacy")]
    variant: PoolVariant,
    #[arg(long)]
    slippage_bps: Option<u16>,
  },
  /// Current SOL price of the pool's token
  Price {
    pool: Pubkey,
    #[arg(long, default_value = "legacy")]
    variant: PoolVariant,
  },
}

impl Command {
  /// Whether the command signs and sends a transaction.
  fn submits(&self) -> bool {
    matches!(self, Command::Buy { .. } | Command::Sell { .. })
  }
}

/// Read-only commands run with a throwaway keypair; submitting ones need
/// the payer's.
fn load_keypair(
  path: Option<&PathBuf>,
  command: &Command,
) -> anyhow::Result<Keypair> {
  match path {
    Some(path) => read_keypair_file(path)
      .map_err(|e| anyhow!("Failed to read keypair {}: {e}", path.display())),
    None if command.submits() => {
      Err(anyhow!("--keypair or KEYPAIR is required to submit a swap"))
    }
    None => Ok(Keypair::new()),
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let args = Args::parse();

  let default_level = if args.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level)),
    )
    .init();

  let config = match &args.config {
    Some(path) => SwapConfig::load(path).context("Invalid swap config")?,
    None => SwapConfig::default(),
  };
  let rpc_url = args
    .rpc_url
    .clone()
    .unwrap_or_else(|| args.network.default_rpc_url().to_string());
  let keypair = load_keypair(args.keypair.as_ref(), &args.command)?;
  info!(
    network = %args.network,
    rpc_url = %rpc_url,
    payer = %keypair.pubkey(),
    "starting"
  );

  let client = SwapClient::new(rpc_url, keypair, args.network, config);

  let message = match args.command {
    Command::Buy {
      pool,
      amount,
      variant,
      slippage_bps,
    } => client.buy_report(&pool, variant, amount, slippage_bps).await,
    Command::Sell {
      pool,
      percentage,
      variant,
      slippage_bps,
    } => {
      client
        .sell_report(&pool, variant, percentage, slippage_bps)
        .await
    }
    Command::Quote {
      pool,
      input_mint,
      output_mint,
      amount,
      variant,
      slippage_bps,
    } => {
      let intent = SwapIntent {
        pool,
        input_mint,
        output_mint,
        amount_in: amount,
        slippage_bps: client.config().slippage(slippage_bps).slippage_bps(),
      };
      match client.quote(&intent, variant).await {
        Ok(quote) => format!(
          "{} {} -> expected {} (minimum {} raw), reserves {} / {}",
          quote.direction,
          quote.amount_in,
          quote.expected_out,
          quote.minimum_amount_out,
          quote.reserves.base,
          quote.reserves.quote,
        ),
        Err(err) => format!("Error occurred during quote: {err}"),
      }
    }
    Command::Price { pool, variant } => {
      match client.token_price(&pool, variant).await {
        Ok(price) => format!("{price} SOL"),
        Err(err) => format!("Error occurred during price lookup: {err}"),
      }
    }
  };
  println!("{message}");
  Ok(())
}
