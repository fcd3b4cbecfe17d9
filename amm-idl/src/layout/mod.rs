//! Fixed-offset binary layouts of the on-chain accounts read by the swap
//! engine.
//!
//! Each schema is a plain struct implementing [`Layout`]. Decoding checks
//! only the buffer length; field values are taken as-is.

mod amm_info;
mod cp_pool_state;
mod market_state;
mod token_account;

pub use amm_info::AmmInfo;
pub use cp_pool_state::CpPoolState;
pub use market_state::{AccountFlags, MarketState};
pub use token_account::TokenAccountState;

use anchor_lang::prelude::Pubkey;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
  #[error("{layout}: expected {expected} bytes, got {actual}")]
  LengthMismatch {
    layout: &'static str,
    expected: usize,
    actual: usize,
  },
  #[error("Read of {len} bytes at offset {offset} past end of buffer")]
  Truncated { offset: usize, len: usize },
}

/// A fixed-size account schema.
pub trait Layout: Sized {
  const NAME: &'static str;
  const LEN: usize;

  /// Reads fields in schema order.
  ///
  /// # Errors
  /// * Reading past the end of the buffer
  fn read(reader: &mut Reader<'_>) -> Result<Self, DecodeError>;

  /// Writes fields in schema order.
  fn write(&self, writer: &mut Writer);

  /// Decodes a buffer of exactly [`Layout::LEN`] bytes.
  ///
  /// # Errors
  /// * [`DecodeError::LengthMismatch`] on any other length
  fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
    if bytes.len() == Self::LEN {
      Self::read(&mut Reader::new(bytes))
    } else {
      Err(DecodeError::LengthMismatch {
        layout: Self::NAME,
        expected: Self::LEN,
        actual: bytes.len(),
      })
    }
  }

  #[must_use]
  fn encode(&self) -> Vec<u8> {
    let mut writer = Writer::with_capacity(Self::LEN);
    self.write(&mut writer);
    writer.into_inner()
  }
}

/// Little-endian cursor over an account buffer.
pub struct Reader<'a> {
  bytes: &'a [u8],
  offset: usize,
}

impl<'a> Reader<'a> {
  #[must_use]
  pub fn new(bytes: &'a [u8]) -> Reader<'a> {
    Reader { bytes, offset: 0 }
  }

  #[must_use]
  pub fn offset(&self) -> usize {
    self.offset
  }

  /// # Errors
  /// * Fewer than `N` bytes remain
  pub fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
    let end = self.offset.checked_add(N).ok_or(DecodeError::Truncated {
      offset: self.offset,
      len: N,
    })?;
    let slice =
      self
        .bytes
        .get(self.offset..end)
        .ok_or(DecodeError::Truncated {
          offset: self.offset,
          len: N,
        })?;
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    self.offset = end;
    Ok(out)
  }

  /// # Errors
  /// * Fewer than `len` bytes remain
  pub fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
    let end = self.offset + len;
    if end > self.bytes.len() {
      Err(DecodeError::Truncated {
        offset: self.offset,
        len,
      })
    } else {
      self.offset = end;
      Ok(())
    }
  }

  /// # Errors
  /// * Buffer exhausted
  pub fn u8(&mut self) -> Result<u8, DecodeError> {
    self.array::<1>().map(|[b]| b)
  }

  /// # Errors
  /// * Fewer than 8 bytes remain
  pub fn u64(&mut self) -> Result<u64, DecodeError> {
    self.array().map(u64::from_le_bytes)
  }

  /// Accumulator stored as a low then high little-endian `u64`.
  ///
  /// # Errors
  /// * Fewer than 16 bytes remain
  pub fn u128(&mut self) -> Result<u128, DecodeError> {
    let lo = self.u64()?;
    let hi = self.u64()?;
    Ok((u128::from(hi) << 64) | u128::from(lo))
  }

  /// # Errors
  /// * Fewer than 32 bytes remain
  pub fn pubkey(&mut self) -> Result<Pubkey, DecodeError> {
    self.array().map(Pubkey::new_from_array)
  }
}

/// Little-endian buffer builder, the inverse of [`Reader`].
#[derive(Default)]
pub struct Writer {
  bytes: Vec<u8>,
}

impl Writer {
  #[must_use]
  pub fn with_capacity(len: usize) -> Writer {
    Writer {
      bytes: Vec::with_capacity(len),
    }
  }

  #[must_use]
  pub fn into_inner(self) -> Vec<u8> {
    self.bytes
  }

  pub fn zeros(&mut self, len: usize) {
    self.bytes.resize(self.bytes.len() + len, 0);
  }

  pub fn bytes(&mut self, bytes: &[u8]) {
    self.bytes.extend_from_slice(bytes);
  }

  pub fn u8(&mut self, value: u8) {
    self.bytes.push(value);
  }

  pub fn u64(&mut self, value: u64) {
    self.bytes(&value.to_le_bytes());
  }

  #[allow(clippy::cast_possible_truncation)]
  pub fn u128(&mut self, value: u128) {
    self.u64(value as u64);
    self.u64((value >> 64) as u64);
  }

  pub fn pubkey(&mut self, key: &Pubkey) {
    self.bytes(key.as_ref());
  }
}
