use anchor_lang::prelude::Pubkey;

use super::{DecodeError, Layout, Reader, Writer};

/// Constant-product AMM pool state, including its account discriminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpPoolState {
  pub discriminator: [u8; 8],
  pub amm_config: Pubkey,
  pub pool_creator: Pubkey,
  pub token_0_vault: Pubkey,
  pub token_1_vault: Pubkey,
  pub lp_mint: Pubkey,
  pub token_0_mint: Pubkey,
  pub token_1_mint: Pubkey,
  pub token_0_program: Pubkey,
  pub token_1_program: Pubkey,
  pub observation_key: Pubkey,
  pub auth_bump: u8,
  pub status: u8,
  pub lp_mint_decimals: u8,
  pub mint_0_decimals: u8,
  pub mint_1_decimals: u8,
  pub lp_supply: u64,
  pub protocol_fees_token_0: u64,
  pub protocol_fees_token_1: u64,
  pub fund_fees_token_0: u64,
  pub fund_fees_token_1: u64,
  pub open_time: u64,
  pub recent_epoch: u64,
}

const PADDING: usize = 31 * 8;

impl CpPoolState {
  /// Vault balance earmarked for protocol and fund fees on side 0.
  #[must_use]
  pub fn earmarked_0(&self) -> u64 {
    self
      .protocol_fees_token_0
      .saturating_add(self.fund_fees_token_0)
  }

  #[must_use]
  pub fn earmarked_1(&self) -> u64 {
    self
      .protocol_fees_token_1
      .saturating_add(self.fund_fees_token_1)
  }
}

impl Layout for CpPoolState {
  const NAME: &'static str = "CpPoolState";
  const LEN: usize = 637;

  fn read(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
    let state = CpPoolState {
      discriminator: r.array()?,
      amm_config: r.pubkey()?,
      pool_creator: r.pubkey()?,
      token_0_vault: r.pubkey()?,
      token_1_vault: r.pubkey()?,
      lp_mint: r.pubkey()?,
      token_0_mint: r.pubkey()?,
      token_1_mint: r.pubkey()?,
      token_0_program: r.pubkey()?,
      token_1_program: r.pubkey()?,
      observation_key: r.pubkey()?,
      auth_bump: r.u8()?,
      status: r.u8()?,
      lp_mint_decimals: r.u8()?,
      mint_0_decimals: r.u8()?,
      mint_1_decimals: r.u8()?,
      lp_supply: r.u64()?,
      protocol_fees_token_0: r.u64()?,
      protocol_fees_token_1: r.u64()?,
      fund_fees_token_0: r.u64()?,
      fund_fees_token_1: r.u64()?,
      open_time: r.u64()?,
      recent_epoch: r.u64()?,
    };
    r.skip(PADDING)?;
    Ok(state)
  }

  fn write(&self, w: &mut Writer) {
    w.bytes(&self.discriminator);
    for key in [
      &self.amm_config,
      &self.pool_creator,
      &self.token_0_vault,
      &self.token_1_vault,
      &self.lp_mint,
      &self.token_0_mint,
      &self.token_1_mint,
      &self.token_0_program,
      &self.token_1_program,
      &self.observation_key,
    ] {
      w.pubkey(key);
    }
    w.u8(self.auth_bump);
    w.u8(self.status);
    w.u8(self.lp_mint_decimals);
    w.u8(self.mint_0_decimals);
    w.u8(self.mint_1_decimals);
    w.u64(self.lp_supply);
    w.u64(self.protocol_fees_token_0);
    w.u64(self.protocol_fees_token_1);
    w.u64(self.fund_fees_token_0);
    w.u64(self.fund_fees_token_1);
    w.u64(self.open_time);
    w.u64(self.recent_epoch);
    w.zeros(PADDING);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  fn sample() -> CpPoolState {
    CpPoolState {
      discriminator: [247, 237, 227, 245, 215, 195, 222, 70],
      amm_config: Pubkey::new_unique(),
      pool_creator: Pubkey::new_unique(),
      token_0_vault: Pubkey::new_unique(),
      token_1_vault: Pubkey::new_unique(),
      lp_mint: Pubkey::new_unique(),
      token_0_mint: Pubkey::new_unique(),
      token_1_mint: Pubkey::new_unique(),
      token_0_program: Pubkey::new_unique(),
      token_1_program: Pubkey::new_unique(),
      observation_key: Pubkey::new_unique(),
      auth_bump: 253,
      status: 0,
      lp_mint_decimals: 9,
      mint_0_decimals: 9,
      mint_1_decimals: 6,
      lp_supply: 1_000_000,
      protocol_fees_token_0: 1,
      protocol_fees_token_1: 2,
      fund_fees_token_0: 3,
      fund_fees_token_1: 4,
      open_time: 1_710_000_000,
      recent_epoch: 600,
    }
  }

  #[test]
  fn round_trip() -> Result<(), DecodeError> {
    let state = sample();
    let bytes = state.encode();
    assert_eq!(CpPoolState::LEN, bytes.len());
    assert_eq!(state, CpPoolState::decode(&bytes)?);
    Ok(())
  }

  #[test]
  fn decimals_follow_addresses() -> Result<(), DecodeError> {
    let mut bytes = vec![0u8; CpPoolState::LEN];
    bytes[328..333].copy_from_slice(&[255, 1, 9, 9, 6]);
    bytes[341..349].copy_from_slice(&500u64.to_le_bytes());
    let state = CpPoolState::decode(&bytes)?;
    assert_eq!(255, state.auth_bump);
    assert_eq!(6, state.mint_1_decimals);
    assert_eq!(500, state.protocol_fees_token_0);
    Ok(())
  }

  #[test]
  fn earmarked_sums_protocol_and_fund() {
    let state = sample();
    assert_eq!(4, state.earmarked_0());
    assert_eq!(6, state.earmarked_1());
  }

  #[test]
  fn oversized_buffer_rejected() {
    assert!(CpPoolState::decode(&[0u8; 638]).is_err());
  }

  proptest! {
    #[test]
    fn fee_counters_round_trip(
      protocol_0 in any::<u64>(),
      fund_1 in any::<u64>(),
      decimals in any::<u8>(),
    ) {
      let state = CpPoolState {
        protocol_fees_token_0: protocol_0,
        fund_fees_token_1: fund_1,
        mint_0_decimals: decimals,
        ..sample()
      };
      prop_assert_eq!(state, CpPoolState::decode(&state.encode())?);
    }
  }
}
