//! Reserve oracle: live vault balances in canonical `(base, quote)` order.

use amm_core::error::{SwapError, SwapResult};
use amm_core::reserves::Reserves;
use amm_idl::layout::TokenAccountState;
use anchor_client::solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::pool_keys::PoolKeys;
use crate::rpc::RpcProvider;

fn vault_amount(key: &Pubkey, data: Option<&Vec<u8>>) -> SwapResult<u64> {
  let bytes = data.ok_or_else(|| {
    debug!(vault = %key, "vault account missing");
    SwapError::ReserveUnavailable
  })?;
  TokenAccountState::decode_prefix(bytes)
    .map(|account| account.amount)
    .map_err(|e| {
      debug!(vault = %key, error = %e, "vault decode failed");
      SwapError::ReserveUnavailable
    })
}

/// Queries both vaults in one batched call. Never cached.
///
/// # Errors
/// * [`SwapError::ReserveUnavailable`] if the batched query fails, or either
///   vault has no value or no tradable liquidity
pub async fn fetch_reserves<R: RpcProvider>(
  rpc: &R,
  keys: &PoolKeys,
  native_mint: &Pubkey,
) -> SwapResult<Reserves> {
  let vaults = keys.vaults();
  let data = rpc.get_multiple_account_data(&vaults).await.map_err(|e| {
    debug!(pool = %keys.id(), error = %e, "vault query failed");
    SwapError::ReserveUnavailable
  })?;
  let fetched = |i: usize| data.get(i).and_then(Option::as_ref);
  let amount_0 = vault_amount(&vaults[0], fetched(0))?;
  let amount_1 = vault_amount(&vaults[1], fetched(1))?;
  let [a, b] = keys.vault_balances([amount_0, amount_1]);
  let reserves = Reserves::canonicalize(&a, &b, native_mint)?;
  debug!(
    pool = %keys.id(),
    base = %reserves.base,
    quote = %reserves.quote,
    token_decimals = reserves.token_decimals,
    "reserves fetched"
  );
  Ok(reserves)
}
