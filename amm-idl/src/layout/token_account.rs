use anchor_lang::prelude::Pubkey;

use super::{DecodeError, Layout, Reader, Writer};

/// Leading fields of an SPL token account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenAccountState {
  pub mint: Pubkey,
  pub owner: Pubkey,
  pub amount: u64,
}

/// Base account length; Token-2022 accounts append extensions after it.
const BASE_LEN: usize = 165;
const PREFIX_LEN: usize = 72;

impl TokenAccountState {
  /// Decodes the prefix of any token account at least [`Layout::LEN`] long.
  ///
  /// # Errors
  /// * Buffer shorter than a base token account
  pub fn decode_prefix(bytes: &[u8]) -> Result<Self, DecodeError> {
    if bytes.len() < Self::LEN {
      Err(DecodeError::LengthMismatch {
        layout: Self::NAME,
        expected: Self::LEN,
        actual: bytes.len(),
      })
    } else {
      Self::read(&mut Reader::new(bytes))
    }
  }
}

impl Layout for TokenAccountState {
  const NAME: &'static str = "TokenAccount";
  const LEN: usize = BASE_LEN;

  fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
    Ok(TokenAccountState {
      mint: r.pubkey()?,
      owner: r.pubkey()?,
      amount: r.u64()?,
    })
  }

  fn write(&self, w: &mut Writer) {
    w.pubkey(&self.mint);
    w.pubkey(&self.owner);
    w.u64(self.amount);
    w.zeros(BASE_LEN - PREFIX_LEN);
  }
}
