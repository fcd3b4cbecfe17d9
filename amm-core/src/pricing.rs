//! Constant-product pricing with the fee taken from the input side.
//!
//! All amounts are UI units. Results are rounded to native-token precision
//! so a quote never claims more granularity than the chain settles in.

use rust_decimal::Decimal;

use crate::error::{SwapError, SwapResult};
use crate::reserves::Reserves;
use crate::util::NATIVE_DECIMALS;

/// Default pool fee, in percent.
pub const DEFAULT_FEE_PCT: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Input amount left after the pool fee.
fn after_fee(amount_in: Decimal, fee_pct: Decimal) -> Option<Decimal> {
  let keep = Decimal::ONE.checked_sub(fee_pct.checked_div(HUNDRED)?)?;
  amount_in.checked_mul(keep)
}

/// Output of a constant-product trade:
///   `reserve_out - (reserve_in * reserve_out) / (reserve_in + effective_in)`
fn constant_product_out(
  effective_in: Decimal,
  reserve_in: Decimal,
  reserve_out: Decimal,
) -> Option<Decimal> {
  let k = reserve_in.checked_mul(reserve_out)?;
  let next_out = k.checked_div(reserve_in.checked_add(effective_in)?)?;
  reserve_out
    .checked_sub(next_out)
    .map(|out| out.round_dp(u32::from(NATIVE_DECIMALS)))
}

/// Tokens received for `native_in` native units.
///
/// # Errors
/// * [`SwapError::PricingOverflow`] on arithmetic overflow or division by zero.
pub fn tokens_out(
  native_in: Decimal,
  base_reserve: Decimal,
  quote_reserve: Decimal,
  fee_pct: Decimal,
) -> SwapResult<Decimal> {
  after_fee(native_in, fee_pct)
    .and_then(|effective| {
      constant_product_out(effective, quote_reserve, base_reserve)
    })
    .ok_or(SwapError::PricingOverflow)
}

/// Native units received for `tokens_in` tokens.
///
/// # Errors
/// * [`SwapError::PricingOverflow`] on arithmetic overflow or division by zero.
pub fn native_out(
  tokens_in: Decimal,
  base_reserve: Decimal,
  quote_reserve: Decimal,
  fee_pct: Decimal,
) -> SwapResult<Decimal> {
  after_fee(tokens_in, fee_pct)
    .and_then(|effective| {
      constant_product_out(effective, base_reserve, quote_reserve)
    })
    .ok_or(SwapError::PricingOverflow)
}

impl Reserves {
  /// [`tokens_out`] against these reserves.
  ///
  /// # Errors
  /// * See [`tokens_out`].
  pub fn tokens_out(
    &self,
    native_in: Decimal,
    fee_pct: Decimal,
  ) -> SwapResult<Decimal> {
    tokens_out(native_in, self.base, self.quote, fee_pct)
  }

  /// [`native_out`] against these reserves.
  ///
  /// # Errors
  /// * See [`native_out`].
  pub fn native_out(
    &self,
    tokens_in: Decimal,
    fee_pct: Decimal,
  ) -> SwapResult<Decimal> {
    native_out(tokens_in, self.base, self.quote, fee_pct)
  }
}
