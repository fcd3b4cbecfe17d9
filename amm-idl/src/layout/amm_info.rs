use anchor_lang::prelude::Pubkey;

use super::{DecodeError, Layout, Reader, Writer};

/// Legacy AMM v4 pool state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmmInfo {
  pub status: u64,
  pub nonce: u64,
  pub max_order: u64,
  pub depth: u64,
  pub base_decimal: u64,
  pub quote_decimal: u64,
  pub state: u64,
  pub reset_flag: u64,
  pub min_size: u64,
  pub vol_max_cut_ratio: u64,
  pub amount_wave_ratio: u64,
  pub base_lot_size: u64,
  pub quote_lot_size: u64,
  pub min_price_multiplier: u64,
  pub max_price_multiplier: u64,
  pub system_decimal_value: u64,
  pub min_separate_numerator: u64,
  pub min_separate_denominator: u64,
  pub trade_fee_numerator: u64,
  pub trade_fee_denominator: u64,
  pub pnl_numerator: u64,
  pub pnl_denominator: u64,
  pub swap_fee_numerator: u64,
  pub swap_fee_denominator: u64,
  pub base_need_take_pnl: u64,
  pub quote_need_take_pnl: u64,
  pub quote_total_pnl: u64,
  pub base_total_pnl: u64,
  pub pool_open_time: u64,
  pub punish_pc_amount: u64,
  pub punish_coin_amount: u64,
  pub orderbook_to_init_time: u64,
  pub swap_base_in_amount: u128,
  pub swap_quote_out_amount: u128,
  pub swap_base2quote_fee: u64,
  pub swap_quote_in_amount: u128,
  pub swap_base_out_amount: u128,
  pub swap_quote2base_fee: u64,
  pub base_vault: Pubkey,
  pub quote_vault: Pubkey,
  pub base_mint: Pubkey,
  pub quote_mint: Pubkey,
  pub lp_mint: Pubkey,
  pub open_orders: Pubkey,
  pub market_id: Pubkey,
  pub market_program_id: Pubkey,
  pub target_orders: Pubkey,
  pub withdraw_queue: Pubkey,
  pub lp_vault: Pubkey,
  pub owner: Pubkey,
  pub lp_reserve: u64,
}

const PADDING: usize = 24;

impl Layout for AmmInfo {
  const NAME: &'static str = "AmmInfo";
  const LEN: usize = 752;

  fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
    let info = AmmInfo {
      status: r.u64()?,
      nonce: r.u64()?,
      max_order: r.u64()?,
      depth: r.u64()?,
      base_decimal: r.u64()?,
      quote_decimal: r.u64()?,
      state: r.u64()?,
      reset_flag: r.u64()?,
      min_size: r.u64()?,
      vol_max_cut_ratio: r.u64()?,
      amount_wave_ratio: r.u64()?,
      base_lot_size: r.u64()?,
      quote_lot_size: r.u64()?,
      min_price_multiplier: r.u64()?,
      max_price_multiplier: r.u64()?,
      system_decimal_value: r.u64()?,
      min_separate_numerator: r.u64()?,
      min_separate_denominator: r.u64()?,
      trade_fee_numerator: r.u64()?,
      trade_fee_denominator: r.u64()?,
      pnl_numerator: r.u64()?,
      pnl_denominator: r.u64()?,
      swap_fee_numerator: r.u64()?,
      swap_fee_denominator: r.u64()?,
      base_need_take_pnl: r.u64()?,
      quote_need_take_pnl: r.u64()?,
      quote_total_pnl: r.u64()?,
      base_total_pnl: r.u64()?,
      pool_open_time: r.u64()?,
      punish_pc_amount: r.u64()?,
      punish_coin_amount: r.u64()?,
      orderbook_to_init_time: r.u64()?,
      swap_base_in_amount: r.u128()?,
      swap_quote_out_amount: r.u128()?,
      swap_base2quote_fee: r.u64()?,
      swap_quote_in_amount: r.u128()?,
      swap_base_out_amount: r.u128()?,
      swap_quote2base_fee: r.u64()?,
      base_vault: r.pubkey()?,
      quote_vault: r.pubkey()?,
      base_mint: r.pubkey()?,
      quote_mint: r.pubkey()?,
      lp_mint: r.pubkey()?,
      open_orders: r.pubkey()?,
      market_id: r.pubkey()?,
      market_program_id: r.pubkey()?,
      target_orders: r.pubkey()?,
      withdraw_queue: r.pubkey()?,
      lp_vault: r.pubkey()?,
      owner: r.pubkey()?,
      lp_reserve: r.u64()?,
    };
    r.skip(PADDING)?;
    Ok(info)
  }

  fn write(&self, w: &mut Writer) {
    for value in [
      self.status,
      self.nonce,
      self.max_order,
      self.depth,
      self.base_decimal,
      self.quote_decimal,
      self.state,
      self.reset_flag,
      self.min_size,
      self.vol_max_cut_ratio,
      self.amount_wave_ratio,
      self.base_lot_size,
      self.quote_lot_size,
      self.min_price_multiplier,
      self.max_price_multiplier,
      self.system_decimal_value,
      self.min_separate_numerator,
      self.min_separate_denominator,
      self.trade_fee_numerator,
      self.trade_fee_denominator,
      self.pnl_numerator,
      self.pnl_denominator,
      self.swap_fee_numerator,
      self.swap_fee_denominator,
      self.base_need_take_pnl,
      self.quote_need_take_pnl,
      self.quote_total_pnl,
      self.base_total_pnl,
      self.pool_open_time,
      self.punish_pc_amount,
      self.punish_coin_amount,
      self.orderbook_to_init_time,
    ] {
      w.u64(value);
    }
    w.u128(self.swap_base_in_amount);
    w.u128(self.swap_quote_out_amount);
    w.u64(self.swap_base2quote_fee);
    w.u128(self.swap_quote_in_amount);
    w.u128(self.swap_base_out_amount);
    w.u64(self.swap_quote2base_fee);
    for key in [
      &self.base_vault,
      &self.quote_vault,
      &self.base_mint,
      &self.quote_mint,
      &self.lp_mint,
      &self.open_orders,
      &self.market_id,
      &self.market_program_id,
      &self.target_orders,
      &self.withdraw_queue,
      &self.lp_vault,
      &self.owner,
    ] {
      w.pubkey(key);
    }
    w.u64(self.lp_reserve);
    w.zeros(PADDING);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  fn sample() -> AmmInfo {
    AmmInfo {
      status: 6,
      nonce: 254,
      base_decimal: 6,
      quote_decimal: 9,
      trade_fee_numerator: 25,
      trade_fee_denominator: 10_000,
      pool_open_time: 1_700_000_000,
      swap_base_in_amount: (7u128 << 64) | 11,
      swap_quote_out_amount: u128::MAX - 5,
      swap_base2quote_fee: 42,
      swap_quote_in_amount: 1 << 100,
      swap_base_out_amount: 3,
      swap_quote2base_fee: 99,
      base_vault: Pubkey::new_unique(),
      quote_vault: Pubkey::new_unique(),
      base_mint: Pubkey::new_unique(),
      quote_mint: Pubkey::new_unique(),
      lp_mint: Pubkey::new_unique(),
      open_orders: Pubkey::new_unique(),
      market_id: Pubkey::new_unique(),
      market_program_id: Pubkey::new_unique(),
      target_orders: Pubkey::new_unique(),
      withdraw_queue: Pubkey::new_unique(),
      lp_vault: Pubkey::new_unique(),
      owner: Pubkey::new_unique(),
      lp_reserve: 123_456_789,
      ..AmmInfo::default()
    }
  }

  #[test]
  fn round_trip() -> Result<(), DecodeError> {
    let info = sample();
    let bytes = info.encode();
    assert_eq!(AmmInfo::LEN, bytes.len());
    assert_eq!(info, AmmInfo::decode(&bytes)?);
    Ok(())
  }

  #[test]
  fn addresses_sit_at_fixed_offsets() -> Result<(), DecodeError> {
    let base_vault = Pubkey::new_unique();
    let market_id = Pubkey::new_unique();
    let mut bytes = vec![0u8; AmmInfo::LEN];
    bytes[8..16].copy_from_slice(&253u64.to_le_bytes());
    bytes[336..368].copy_from_slice(base_vault.as_ref());
    bytes[528..560].copy_from_slice(market_id.as_ref());
    bytes[720..728].copy_from_slice(&77u64.to_le_bytes());
    let info = AmmInfo::decode(&bytes)?;
    assert_eq!(253, info.nonce);
    assert_eq!(base_vault, info.base_vault);
    assert_eq!(market_id, info.market_id);
    assert_eq!(77, info.lp_reserve);
    Ok(())
  }

  #[test]
  fn wrong_length_rejected() {
    let err = AmmInfo::decode(&[0u8; 751]);
    assert_eq!(
      Err(DecodeError::LengthMismatch {
        layout: "AmmInfo",
        expected: 752,
        actual: 751,
      }),
      err
    );
    assert!(AmmInfo::decode(&[]).is_err());
  }

  proptest! {
    #[test]
    fn counters_survive_round_trip(
      base_in in any::<u128>(),
      quote_out in any::<u128>(),
      fee in any::<u64>(),
    ) {
      let info = AmmInfo {
        swap_base_in_amount: base_in,
        swap_quote_out_amount: quote_out,
        swap_base2quote_fee: fee,
        ..sample()
      };
      prop_assert_eq!(info, AmmInfo::decode(&info.encode())?);
    }
  }
}
