use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Decimals of the native token (lamports per SOL = 10^9).
pub const NATIVE_DECIMALS: u8 = 9;

/// Converts a raw integer amount into UI units.
#[must_use]
pub fn to_ui_amount(raw: u64, decimals: u8) -> Option<Decimal> {
  Decimal::try_from_i128_with_scale(i128::from(raw), u32::from(decimals)).ok()
}

/// Converts UI units into the smallest integer unit, truncating any
/// remainder below one unit.
#[must_use]
pub fn to_raw_amount(ui: Decimal, decimals: u8) -> Option<u64> {
  if ui.is_sign_negative() {
    return None;
  }
  let scale = Decimal::from(10u64.checked_pow(u32::from(decimals))?);
  ui.checked_mul(scale)?.trunc().to_u64()
}
