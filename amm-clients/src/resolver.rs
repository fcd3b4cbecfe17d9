//! Pool resolution: raw account bytes to [`PoolKeys`].

use amm_core::error::{SwapError, SwapResult};
use amm_idl::layout::{AmmInfo, CpPoolState, Layout, MarketState};
use amm_idl::pda::market_authority;
use amm_idl::programs::Network;
use anchor_client::solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::pool_keys::{CpPoolKeys, LegacyPoolKeys, PoolKeys, PoolVariant};
use crate::rpc::RpcProvider;

/// Fetches and decodes one account; empty, absent or malformed data is
/// [`SwapError::PoolNotFound`].
async fn fetch_decoded<L: Layout, R: RpcProvider>(
  rpc: &R,
  key: &Pubkey,
) -> SwapResult<L> {
  let data = rpc.get_account_data(key).await.map_err(|e| {
    debug!(account = %key, error = %e, "account fetch failed");
    SwapError::PoolNotFound
  })?;
  match data {
    Some(bytes) if !bytes.is_empty() => L::decode(&bytes).map_err(|e| {
      debug!(account = %key, error = %e, "account decode failed");
      SwapError::PoolNotFound
    }),
    _ => {
      debug!(account = %key, layout = L::NAME, "account missing or empty");
      Err(SwapError::PoolNotFound)
    }
  }
}

fn decimals(raw: u64) -> SwapResult<u8> {
  u8::try_from(raw).map_err(|_| SwapError::PoolNotFound)
}

/// Resolves every address a swap against `pool` needs.
///
/// # Errors
/// * [`SwapError::PoolNotFound`] if pool or market state cannot be fetched,
///   decoded, or its market authority cannot be derived. No partial keys are
///   returned.
pub async fn resolve<R: RpcProvider>(
  rpc: &R,
  network: Network,
  pool: &Pubkey,
  variant: PoolVariant,
) -> SwapResult<PoolKeys> {
  debug!(pool = %pool, variant = %variant, "resolving pool keys");
  let keys = match variant {
    PoolVariant::Legacy => {
      PoolKeys::Legacy(resolve_legacy(rpc, network, pool).await?)
    }
    PoolVariant::ConstantProduct => {
      PoolKeys::ConstantProduct(resolve_cp(rpc, network, pool).await?)
    }
  };
  debug!(pool = %pool, "pool keys resolved");
  Ok(keys)
}

async fn resolve_legacy<R: RpcProvider>(
  rpc: &R,
  network: Network,
  pool: &Pubkey,
) -> SwapResult<LegacyPoolKeys> {
  let programs = network.programs();
  let info: AmmInfo = fetch_decoded(rpc, pool).await?;
  let market: MarketState = fetch_decoded(rpc, &info.market_id).await?;
  if info.market_program_id != programs.order_book {
    warn!(
      pool = %pool,
      market_program = %info.market_program_id,
      expected = %programs.order_book,
      "pool is linked to an unexpected order-book program"
    );
  }
  let authority = market_authority(
    &info.market_id,
    market.vault_signer_nonce,
    &info.market_program_id,
  )
  .map_err(|e| {
    debug!(
      market = %info.market_id,
      error = %e,
      "market authority derivation failed"
    );
    SwapError::PoolNotFound
  })?;
  Ok(LegacyPoolKeys {
    id: *pool,
    program_id: programs.legacy_amm,
    authority: programs.legacy_amm_authority,
    base_mint: info.base_mint,
    quote_mint: info.quote_mint,
    base_decimals: decimals(info.base_decimal)?,
    quote_decimals: decimals(info.quote_decimal)?,
    open_orders: info.open_orders,
    target_orders: info.target_orders,
    base_vault: info.base_vault,
    quote_vault: info.quote_vault,
    market_program_id: info.market_program_id,
    market_id: info.market_id,
    market_authority: authority,
    market_base_vault: market.base_vault,
    market_quote_vault: market.quote_vault,
    market_bids: market.bids,
    market_asks: market.asks,
    market_event_queue: market.event_queue,
  })
}

async fn resolve_cp<R: RpcProvider>(
  rpc: &R,
  network: Network,
  pool: &Pubkey,
) -> SwapResult<CpPoolKeys> {
  let programs = network.programs();
  let state: CpPoolState = fetch_decoded(rpc, pool).await?;
  Ok(CpPoolKeys {
    id: *pool,
    program_id: programs.cp_amm,
    authority: programs.cp_amm_authority,
    amm_config: state.amm_config,
    pool_creator: state.pool_creator,
    token_0_vault: state.token_0_vault,
    token_1_vault: state.token_1_vault,
    token_0_mint: state.token_0_mint,
    token_1_mint: state.token_1_mint,
    token_0_program: state.token_0_program,
    token_1_program: state.token_1_program,
    mint_0_decimals: state.mint_0_decimals,
    mint_1_decimals: state.mint_1_decimals,
    lp_mint: state.lp_mint,
    observation_key: state.observation_key,
    earmarked_0: state.earmarked_0(),
    earmarked_1: state.earmarked_1(),
  })
}
