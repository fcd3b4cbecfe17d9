//! Caller intent and the direction derived from it.

use anchor_lang::prelude::Pubkey;
use rust_decimal::Decimal;

use crate::error::{SwapError, SwapResult};

/// Which way value flows relative to the native token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
  /// Native token in, pool token out.
  Buy,
  /// Pool token in, native token out.
  Sell,
}

impl SwapDirection {
  #[must_use]
  pub const fn as_str(&self) -> &'static str {
    match self {
      SwapDirection::Buy => "buy",
      SwapDirection::Sell => "sell",
    }
  }
}

impl std::fmt::Display for SwapDirection {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A requested swap against a single pool.
///
/// `amount_in` is in UI units of the input token (e.g. `1.5` SOL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapIntent {
  pub pool: Pubkey,
  pub input_mint: Pubkey,
  pub output_mint: Pubkey,
  pub amount_in: Decimal,
  pub slippage_bps: u16,
}

impl SwapIntent {
  /// Derives the direction, requiring exactly one side to be `native_mint`.
  ///
  /// # Errors
  /// * [`SwapError::UnsupportedPair`] if neither or both sides are native.
  pub fn direction(&self, native_mint: &Pubkey) -> SwapResult<SwapDirection> {
    let input_native = self.input_mint == *native_mint;
    let output_native = self.output_mint == *native_mint;
    match (input_native, output_native) {
      (true, false) => Ok(SwapDirection::Buy),
      (false, true) => Ok(SwapDirection::Sell),
      _ => Err(SwapError::UnsupportedPair),
    }
  }

  /// The non-native mint of the pair.
  ///
  /// # Errors
  /// * [`SwapError::UnsupportedPair`] as in [`SwapIntent::direction`].
  pub fn token_mint(&self, native_mint: &Pubkey) -> SwapResult<Pubkey> {
    match self.direction(native_mint)? {
      SwapDirection::Buy => Ok(self.output_mint),
      SwapDirection::Sell => Ok(self.input_mint),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn intent(input_mint: Pubkey, output_mint: Pubkey) -> SwapIntent {
    SwapIntent {
      pool: Pubkey::new_unique(),
      input_mint,
      output_mint,
      amount_in: Decimal::ONE,
      slippage_bps: 300,
    }
  }

  #[test]
  fn native_input_is_buy() {
    let native = Pubkey::new_unique();
    let token = Pubkey::new_unique();
    let buy = intent(native, token);
    assert_eq!(Ok(SwapDirection::Buy), buy.direction(&native));
    assert_eq!(Ok(token), buy.token_mint(&native));
  }

  #[test]
  fn native_output_is_sell() {
    let native = Pubkey::new_unique();
    let token = Pubkey::new_unique();
    let sell = intent(token, native);
    assert_eq!(Ok(SwapDirection::Sell), sell.direction(&native));
    assert_eq!(Ok(token), sell.token_mint(&native));
  }

  #[test]
  fn no_native_side_is_unsupported() {
    let native = Pubkey::new_unique();
    let pair = intent(Pubkey::new_unique(), Pubkey::new_unique());
    assert_eq!(Err(SwapError::UnsupportedPair), pair.direction(&native));
  }

  #[test]
  fn native_to_native_is_unsupported() {
    let native = Pubkey::new_unique();
    let pair = intent(native, native);
    assert_eq!(Err(SwapError::UnsupportedPair), pair.direction(&native));
  }
}
