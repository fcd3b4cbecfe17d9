//! Instruction encoders.

pub mod cp_swap;
pub mod legacy_swap;
pub mod token;

/// Amounts shared by both swap payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapArgs {
  pub amount_in: u64,
  pub minimum_amount_out: u64,
}

impl SwapArgs {
  /// `discriminator ++ amount_in ++ minimum_amount_out`, little-endian.
  #[must_use]
  pub fn data(&self, discriminator: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(discriminator.len() + 16);
    data.extend_from_slice(discriminator);
    data.extend_from_slice(&self.amount_in.to_le_bytes());
    data.extend_from_slice(&self.minimum_amount_out.to_le_bytes());
    data
  }
}
