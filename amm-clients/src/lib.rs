//! # AMM Clients
//!
//! Offchain Rust clients that swap the native token against legacy
//! (order-book backed) and constant-product AMM pools on Solana.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use amm_clients::prelude::*;
//!
//! # async fn example(pool: Pubkey) -> Result<()> {
//! let client = SwapClient::new(
//!     Network::Mainnet.default_rpc_url().to_string(),
//!     Keypair::new(),
//!     Network::Mainnet,
//!     SwapConfig::default(),
//! );
//!
//! // Spend 0.1 SOL with 3% slippage tolerance
//! let message = client
//!     .buy_report(&pool, PoolVariant::Legacy, Decimal::new(1, 1), Some(300))
//!     .await;
//! println!("{message}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! - [`resolver`] decodes pool and market state into [`pool_keys::PoolKeys`]
//! - [`reserves`] reads both vaults and canonicalizes them
//! - [`transaction`] assembles and signs the instruction list
//! - [`confirmation`] polls the submitted signature with bounded retries
//! - [`swap_client::SwapClient`] runs the stages and renders the outcome

pub mod confirmation;
pub mod pool_keys;
pub mod prelude;
pub mod report;
pub mod reserves;
pub mod resolver;
pub mod rpc;
pub mod swap_client;
pub mod transaction;
