//! Canonical `(base, quote)` view of a pool's vaults.
//!
//! Pools store their two sides in arbitrary order. Everything downstream
//! assumes `quote` is the wrapped native token and `base` is the traded
//! token, so the side assignment lives here and nowhere else.

use anchor_lang::prelude::Pubkey;
use rust_decimal::Decimal;

use crate::error::{SwapError, SwapResult};
use crate::util::to_ui_amount;

/// Position of a mint within a pool's on-chain field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSide {
  A,
  B,
}

impl PoolSide {
  #[must_use]
  pub const fn other(self) -> PoolSide {
    match self {
      PoolSide::A => PoolSide::B,
      PoolSide::B => PoolSide::A,
    }
  }
}

/// Finds which side of a pool holds the native mint.
///
/// # Errors
/// * [`SwapError::UnsupportedPair`] unless exactly one side is native.
pub fn native_side(
  mint_a: &Pubkey,
  mint_b: &Pubkey,
  native_mint: &Pubkey,
) -> SwapResult<PoolSide> {
  match (mint_a == native_mint, mint_b == native_mint) {
    (true, false) => Ok(PoolSide::A),
    (false, true) => Ok(PoolSide::B),
    _ => Err(SwapError::UnsupportedPair),
  }
}

/// Raw balance of one vault plus the portion of it that is not tradable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultBalance {
  pub mint: Pubkey,
  pub amount: u64,
  pub decimals: u8,
  /// Protocol and fund fees accrued in the vault but owed elsewhere.
  pub earmarked: u64,
}

impl VaultBalance {
  #[must_use]
  pub fn new(mint: Pubkey, amount: u64, decimals: u8) -> VaultBalance {
    VaultBalance {
      mint,
      amount,
      decimals,
      earmarked: 0,
    }
  }

  #[must_use]
  pub fn with_earmarked(self, earmarked: u64) -> VaultBalance {
    VaultBalance { earmarked, ..self }
  }

  /// Tradable liquidity in UI units.
  fn tradable(&self) -> Option<Decimal> {
    let raw = self.amount.checked_sub(self.earmarked)?;
    to_ui_amount(raw, self.decimals)
  }
}

/// Reserves of a pool at the instant they were queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reserves {
  /// Traded token, UI units.
  pub base: Decimal,
  /// Native token, UI units.
  pub quote: Decimal,
  /// Decimals of the traded token.
  pub token_decimals: u8,
}

impl Reserves {
  /// Assigns `quote` to the native vault and `base` to the other.
  ///
  /// # Errors
  /// * [`SwapError::UnsupportedPair`] unless exactly one vault is native.
  /// * [`SwapError::ReserveUnavailable`] if either side has no tradable
  ///   liquidity once earmarked fees are removed.
  pub fn canonicalize(
    a: &VaultBalance,
    b: &VaultBalance,
    native_mint: &Pubkey,
  ) -> SwapResult<Reserves> {
    let (token, native) = match native_side(&a.mint, &b.mint, native_mint)? {
      PoolSide::A => (b, a),
      PoolSide::B => (a, b),
    };
    let base = token.tradable().ok_or(SwapError::ReserveUnavailable)?;
    let quote = native.tradable().ok_or(SwapError::ReserveUnavailable)?;
    if base.is_zero() || quote.is_zero() {
      Err(SwapError::ReserveUnavailable)
    } else {
      Ok(Reserves {
        base,
        quote,
        token_decimals: token.decimals,
      })
    }
  }

  /// Spot price of one token in native units.
  #[must_use]
  pub fn price(&self) -> Option<Decimal> {
    self.quote.checked_div(self.base)
  }
}
