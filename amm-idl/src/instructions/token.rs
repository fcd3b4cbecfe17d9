//! System and token program instructions that surround a swap.

use anchor_lang::prelude::{ProgramError, Pubkey};
use anchor_lang::solana_program::instruction::Instruction;
use anchor_spl::associated_token::spl_associated_token_account;
use anchor_spl::token_2022::spl_token_2022;

use crate::layout::{Layout, TokenAccountState};
use crate::programs::NATIVE_MINT;

/// Allocates a token-account-sized account at `create_with_seed(payer, seed,
/// token_program)`, funded with `lamports`.
#[must_use]
#[allow(deprecated)]
pub fn create_seeded_token_account(
  payer: &Pubkey,
  account: &Pubkey,
  seed: &str,
  lamports: u64,
  token_program: &Pubkey,
) -> Instruction {
  anchor_lang::solana_program::system_instruction::create_account_with_seed(
    payer,
    account,
    payer,
    seed,
    lamports,
    TokenAccountState::LEN as u64,
    token_program,
  )
}

/// Initializes `account` as a wrapped-native token account held by `owner`.
///
/// # Errors
/// * `token_program` is not a token program
pub fn initialize_wrapped_native(
  token_program: &Pubkey,
  account: &Pubkey,
  owner: &Pubkey,
) -> Result<Instruction, ProgramError> {
  spl_token_2022::instruction::initialize_account(
    token_program,
    account,
    &NATIVE_MINT,
    owner,
  )
}

/// Closes `account`, returning its lamports to `owner`.
///
/// # Errors
/// * `token_program` is not a token program
pub fn close_account(
  token_program: &Pubkey,
  account: &Pubkey,
  owner: &Pubkey,
) -> Result<Instruction, ProgramError> {
  spl_token_2022::instruction::close_account(
    token_program,
    account,
    owner,
    owner,
    &[],
  )
}

#[must_use]
pub fn create_associated_token_account(
  payer: &Pubkey,
  mint: &Pubkey,
  token_program: &Pubkey,
) -> Instruction {
  spl_associated_token_account::instruction::create_associated_token_account(
    payer,
    payer,
    mint,
    token_program,
  )
}
