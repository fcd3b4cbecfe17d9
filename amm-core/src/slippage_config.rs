use rust_decimal::Decimal;

use crate::error::{SwapError, SwapResult};
use crate::util::to_raw_amount;

/// Basis points in one whole.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Client specified slippage tolerance in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlippageConfig {
  slippage_bps: u16,
}

impl SlippageConfig {
  /// Clamps the tolerance to at most 100%.
  #[must_use]
  pub fn new(slippage_bps: u16) -> SlippageConfig {
    SlippageConfig {
      slippage_bps: slippage_bps.min(BPS_DENOMINATOR),
    }
  }

  #[must_use]
  pub fn slippage_bps(&self) -> u16 {
    self.slippage_bps
  }

  /// Fraction of the expected output the caller still accepts.
  fn tolerance_factor(&self) -> Decimal {
    let bps = Decimal::from(self.slippage_bps);
    Decimal::ONE - bps / Decimal::from(BPS_DENOMINATOR)
  }

  /// Lowest acceptable output in UI units.
  ///
  /// # Errors
  /// * [`SwapError::PricingOverflow`] on arithmetic overflow.
  pub fn tolerable_amount(&self, expected_out: Decimal) -> SwapResult<Decimal> {
    expected_out
      .checked_mul(self.tolerance_factor())
      .ok_or(SwapError::PricingOverflow)
  }

  /// Lowest acceptable output in the destination token's smallest unit.
  ///
  /// # Errors
  /// * [`SwapError::PricingOverflow`] on overflow or a negative amount.
  pub fn minimum_amount_out(
    &self,
    expected_out: Decimal,
    decimals: u8,
  ) -> SwapResult<u64> {
    let tolerable = self.tolerable_amount(expected_out)?;
    to_raw_amount(tolerable, decimals).ok_or(SwapError::PricingOverflow)
  }
}
