pub use amm_core::config::SwapConfig;
pub use amm_core::error::{SwapError, SwapResult};
pub use amm_core::swap_intent::{SwapDirection, SwapIntent};
pub use amm_idl::programs::{Network, NATIVE_MINT};
pub use anchor_client::solana_sdk::signature::{Keypair, Signature};
pub use anchor_lang::prelude::Pubkey;
pub use anyhow::Result;
pub use rust_decimal::Decimal;

pub use crate::confirmation::{ConfirmationResult, ConfirmationStatus};
pub use crate::pool_keys::{PoolKeys, PoolVariant};
pub use crate::rpc::{RpcProvider, SolanaRpcProvider};
pub use crate::swap_client::{SwapClient, SwapQuote};
