//! `swap_base_in` on the legacy AMM program.

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::ToAccountMetas;

use super::SwapArgs;

pub const SWAP_BASE_IN: u8 = 9;

/// Accounts in the order the program reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapBaseIn {
  pub token_program: Pubkey,
  pub amm_id: Pubkey,
  pub amm_authority: Pubkey,
  pub open_orders: Pubkey,
  pub target_orders: Pubkey,
  pub base_vault: Pubkey,
  pub quote_vault: Pubkey,
  pub order_book_program: Pubkey,
  pub market: Pubkey,
  pub bids: Pubkey,
  pub asks: Pubkey,
  pub event_queue: Pubkey,
  pub market_base_vault: Pubkey,
  pub market_quote_vault: Pubkey,
  pub market_authority: Pubkey,
  pub user_source: Pubkey,
  pub user_destination: Pubkey,
  pub owner: Pubkey,
}

impl ToAccountMetas for SwapBaseIn {
  fn to_account_metas(&self, _is_signer: Option<bool>) -> Vec<AccountMeta> {
    vec![
      AccountMeta::new_readonly(self.token_program, false),
      AccountMeta::new(self.amm_id, false),
      AccountMeta::new_readonly(self.amm_authority, false),
      AccountMeta::new(self.open_orders, false),
      AccountMeta::new(self.target_orders, false),
      AccountMeta::new(self.base_vault, false),
      AccountMeta::new(self.quote_vault, false),
      AccountMeta::new_readonly(self.order_book_program, false),
      AccountMeta::new(self.market, false),
      AccountMeta::new(self.bids, false),
      AccountMeta::new(self.asks, false),
      AccountMeta::new(self.event_queue, false),
      AccountMeta::new(self.market_base_vault, false),
      AccountMeta::new(self.market_quote_vault, false),
      AccountMeta::new_readonly(self.market_authority, false),
      AccountMeta::new(self.user_source, false),
      AccountMeta::new(self.user_destination, false),
      AccountMeta::new_readonly(self.owner, true),
    ]
  }
}

#[must_use]
pub fn swap_base_in(
  program_id: Pubkey,
  accounts: &SwapBaseIn,
  args: &SwapArgs,
) -> Instruction {
  Instruction {
    program_id,
    accounts: accounts.to_account_metas(None),
    data: args.data(&[SWAP_BASE_IN]),
  }
}
