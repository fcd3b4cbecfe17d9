use anchor_lang::prelude::Pubkey;

use super::{DecodeError, Layout, Reader, Writer};

/// Bit-packed account kind flags at the head of an order-book account.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountFlags {
  pub initialized: bool,
  pub market: bool,
  pub open_orders: bool,
  pub request_queue: bool,
  pub event_queue: bool,
  pub bids: bool,
  pub asks: bool,
  pub disabled: bool,
  pub closed: bool,
  pub permissioned: bool,
  pub crank_authority_required: bool,
}

impl AccountFlags {
  /// Unpacks bits 0 through 10; higher bits are ignored.
  #[must_use]
  pub fn from_bits(bits: u64) -> AccountFlags {
    let bit = |n: u32| bits & (1 << n) != 0;
    AccountFlags {
      initialized: bit(0),
      market: bit(1),
      open_orders: bit(2),
      request_queue: bit(3),
      event_queue: bit(4),
      bids: bit(5),
      asks: bit(6),
      disabled: bit(7),
      closed: bit(8),
      permissioned: bit(9),
      crank_authority_required: bit(10),
    }
  }

  #[must_use]
  pub fn bits(&self) -> u64 {
    [
      self.initialized,
      self.market,
      self.open_orders,
      self.request_queue,
      self.event_queue,
      self.bids,
      self.asks,
      self.disabled,
      self.closed,
      self.permissioned,
      self.crank_authority_required,
    ]
    .iter()
    .enumerate()
    .fold(0, |acc, (n, set)| acc | (u64::from(*set) << n))
  }
}

/// Order-book market linked to a legacy AMM pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketState {
  pub account_flags: AccountFlags,
  pub own_address: Pubkey,
  pub vault_signer_nonce: u64,
  pub base_mint: Pubkey,
  pub quote_mint: Pubkey,
  pub base_vault: Pubkey,
  pub base_deposits_total: u64,
  pub base_fees_accrued: u64,
  pub quote_vault: Pubkey,
  pub quote_deposits_total: u64,
  pub quote_fees_accrued: u64,
  pub quote_dust_threshold: u64,
  pub request_queue: Pubkey,
  pub event_queue: Pubkey,
  pub bids: Pubkey,
  pub asks: Pubkey,
  pub base_lot_size: u64,
  pub quote_lot_size: u64,
  pub fee_rate_bps: u64,
  pub referrer_rebates_accrued: u64,
}

const HEAD_PADDING: usize = 5;
const TAIL_PADDING: usize = 7;

impl Layout for MarketState {
  const NAME: &'static str = "MarketState";
  const LEN: usize = 388;

  fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
    r.skip(HEAD_PADDING)?;
    let market = MarketState {
      account_flags: AccountFlags::from_bits(r.u64()?),
      own_address: r.pubkey()?,
      vault_signer_nonce: r.u64()?,
      base_mint: r.pubkey()?,
      quote_mint: r.pubkey()?,
      base_vault: r.pubkey()?,
      base_deposits_total: r.u64()?,
      base_fees_accrued: r.u64()?,
      quote_vault: r.pubkey()?,
      quote_deposits_total: r.u64()?,
      quote_fees_accrued: r.u64()?,
      quote_dust_threshold: r.u64()?,
      request_queue: r.pubkey()?,
      event_queue: r.pubkey()?,
      bids: r.pubkey()?,
      asks: r.pubkey()?,
      base_lot_size: r.u64()?,
      quote_lot_size: r.u64()?,
      fee_rate_bps: r.u64()?,
      referrer_rebates_accrued: r.u64()?,
    };
    r.skip(TAIL_PADDING)?;
    Ok(market)
  }

  fn write(&self, w: &mut Writer) {
    w.zeros(HEAD_PADDING);
    w.u64(self.account_flags.bits());
    w.pubkey(&self.own_address);
    w.u64(self.vault_signer_nonce);
    w.pubkey(&self.base_mint);
    w.pubkey(&self.quote_mint);
    w.pubkey(&self.base_vault);
    w.u64(self.base_deposits_total);
    w.u64(self.base_fees_accrued);
    w.pubkey(&self.quote_vault);
    w.u64(self.quote_deposits_total);
    w.u64(self.quote_fees_accrued);
    w.u64(self.quote_dust_threshold);
    w.pubkey(&self.request_queue);
    w.pubkey(&self.event_queue);
    w.pubkey(&self.bids);
    w.pubkey(&self.asks);
    w.u64(self.base_lot_size);
    w.u64(self.quote_lot_size);
    w.u64(self.fee_rate_bps);
    w.u64(self.referrer_rebates_accrued);
    w.zeros(TAIL_PADDING);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  #[test]
  fn round_trip() -> Result<(), DecodeError> {
    let market = MarketState {
      account_flags: AccountFlags::from_bits(0b11),
      own_address: Pubkey::new_unique(),
      vault_signer_nonce: 1,
      base_mint: Pubkey::new_unique(),
      quote_mint: Pubkey::new_unique(),
      base_vault: Pubkey::new_unique(),
      base_deposits_total: 10,
      base_fees_accrued: 11,
      quote_vault: Pubkey::new_unique(),
      quote_deposits_total: 12,
      quote_fees_accrued: 13,
      quote_dust_threshold: 14,
      request_queue: Pubkey::new_unique(),
      event_queue: Pubkey::new_unique(),
      bids: Pubkey::new_unique(),
      asks: Pubkey::new_unique(),
      base_lot_size: 100_000,
      quote_lot_size: 10,
      fee_rate_bps: 22,
      referrer_rebates_accrued: 3,
    };
    let bytes = market.encode();
    assert_eq!(MarketState::LEN, bytes.len());
    assert_eq!(market, MarketState::decode(&bytes)?);
    Ok(())
  }

  #[test]
  fn nonce_and_queues_at_fixed_offsets() -> Result<(), DecodeError> {
    let own = Pubkey::new_unique();
    let event_queue = Pubkey::new_unique();
    let mut bytes = vec![0u8; MarketState::LEN];
    bytes[5..13].copy_from_slice(&0b100_0000_0011u64.to_le_bytes());
    bytes[13..45].copy_from_slice(own.as_ref());
    bytes[45..53].copy_from_slice(&3u64.to_le_bytes());
    bytes[253..285].copy_from_slice(event_queue.as_ref());
    let market = MarketState::decode(&bytes)?;
    assert!(market.account_flags.initialized);
    assert!(market.account_flags.market);
    assert!(market.account_flags.crank_authority_required);
    assert!(!market.account_flags.closed);
    assert_eq!(own, market.own_address);
    assert_eq!(3, market.vault_signer_nonce);
    assert_eq!(event_queue, market.event_queue);
    Ok(())
  }

  #[test]
  fn short_buffer_rejected() {
    assert!(matches!(
      MarketState::decode(&[0u8; 300]),
      Err(DecodeError::LengthMismatch { expected: 388, .. })
    ));
  }

  proptest! {
    #[test]
    fn flags_round_trip(bits in 0u64..(1 << 11)) {
      prop_assert_eq!(bits, AccountFlags::from_bits(bits).bits());
    }

    #[test]
    fn unknown_flag_bits_dropped(bits in any::<u64>()) {
      prop_assert_eq!(bits & 0x7ff, AccountFlags::from_bits(bits).bits());
    }
  }
}
