//! `swap_base_input` on the constant-product AMM program.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::ToAccountMetas;

use super::SwapArgs;

pub const SWAP_BASE_INPUT: [u8; 8] = [143, 190, 90, 218, 196, 30, 51, 222];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapBaseInput {
  pub payer: Pubkey,
  pub authority: Pubkey,
  pub amm_config: Pubkey,
  pub pool_state: Pubkey,
  pub input_token_account: Pubkey,
  pub output_token_account: Pubkey,
  pub input_vault: Pubkey,
  pub output_vault: Pubkey,
  pub input_token_program: Pubkey,
  pub output_token_program: Pubkey,
  pub input_token_mint: Pubkey,
  pub output_token_mint: Pubkey,
  pub observation_state: Pubkey,
}

impl ToAccountMetas for SwapBaseInput {
  fn to_account_metas(&self, _is_signer: Option<bool>) -> Vec<AccountMeta> {
    vec![
      AccountMeta::new(self.payer, true),
      AccountMeta::new_readonly(self.authority, false),
      AccountMeta::new_readonly(self.amm_config, false),
      AccountMeta::new(self.pool_state, false),
      AccountMeta::new(self.input_token_account, false),
      AccountMeta::new(self.output_token_account, false),
      AccountMeta::new(self.input_vault, false),
      AccountMeta::new(self.output_vault, false),
      AccountMeta::new_readonly(self.input_token_program, false),
      AccountMeta::new_readonly(self.output_token_program, false),
      AccountMeta::new_readonly(self.input_token_mint, false),
      AccountMeta::new_readonly(self.output_token_mint, false),
      AccountMeta::new(self.observation_state, false),
    ]
  }
}

#[must_use]
pub fn swap_base_input(
  program_id: Pubkey,
  accounts: &SwapBaseInput,
  args: &SwapArgs,
) -> Instruction {
  Instruction {
    program_id,
    accounts: accounts.to_account_metas(None),
    data: args.data(&SWAP_BASE_INPUT),
  }
}
