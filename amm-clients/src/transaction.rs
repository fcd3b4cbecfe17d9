//! Instruction assembly and signing for one swap.

use amm_core::error::{SwapError, SwapResult};
use amm_core::swap_intent::SwapDirection;
use amm_idl::ata;
use amm_idl::instructions::token::{
  close_account, create_associated_token_account, create_seeded_token_account,
  initialize_wrapped_native,
};
use amm_idl::instructions::SwapArgs;
use amm_idl::pda::seeded_token_account;
use amm_idl::programs::{NATIVE_MINT, TOKEN_PROGRAM};
use anchor_client::solana_sdk::compute_budget::ComputeBudgetInstruction;
use anchor_client::solana_sdk::hash::Hash;
use anchor_client::solana_sdk::instruction::Instruction;
use anchor_client::solana_sdk::message::{v0, VersionedMessage};
use anchor_client::solana_sdk::pubkey::Pubkey;
use anchor_client::solana_sdk::signature::Keypair;
use anchor_client::solana_sdk::signer::Signer;
use anchor_client::solana_sdk::transaction::VersionedTransaction;
use anyhow::Result;
use base64::prelude::{Engine, BASE64_URL_SAFE};
use rand::RngCore;

use crate::pool_keys::{PoolKeys, SwapAccounts};

/// Random bytes behind an ephemeral account seed; encodes to exactly the
/// 32 character seed limit.
const SEED_BYTES: usize = 24;

/// Fresh seed for the ephemeral wrapped-native account.
#[must_use]
pub fn random_seed() -> String {
  let mut bytes = [0u8; SEED_BYTES];
  rand::thread_rng().fill_bytes(&mut bytes);
  BASE64_URL_SAFE.encode(bytes)
}

/// Everything the builder needs beyond the pool's own addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPlan {
  pub direction: SwapDirection,
  pub owner: Pubkey,
  pub token_mint: Pubkey,
  /// Raw units of the input side.
  pub amount_in: u64,
  pub minimum_amount_out: u64,
  /// The owner's existing account for `token_mint`, if any.
  pub token_account: Option<Pubkey>,
  /// Close the token account after selling out of it.
  pub close_token_account: bool,
  pub rent_exempt_lamports: u64,
  pub seed: String,
  pub compute_unit_limit: u32,
  pub compute_unit_price: u64,
}

fn build_failed(err: impl std::fmt::Display) -> SwapError {
  SwapError::SubmissionFailed(err.to_string())
}

/// Ordered instructions of one swap transaction.
///
/// BUY: compute budget, create and initialize the wrapped-native account
/// funded with rent plus input, create the destination account if missing,
/// swap, close the wrapped account.
///
/// SELL: compute budget, create and initialize the wrapped-native account
/// funded with rent, swap, close the wrapped account, then close the source
/// account when selling all of it.
///
/// # Errors
/// * [`SwapError::NoTokenBalance`] selling without a token account
/// * [`SwapError::SubmissionFailed`] if an address or token instruction
///   cannot be derived
pub fn build_instructions(
  keys: &PoolKeys,
  plan: &SwapPlan,
) -> SwapResult<Vec<Instruction>> {
  let owner = plan.owner;
  let token_program = keys.token_program(&plan.token_mint);
  let wrapped = seeded_token_account(&owner, &plan.seed, &TOKEN_PROGRAM)
    .map_err(build_failed)?;
  let wrapped_lamports = match plan.direction {
    SwapDirection::Buy => plan
      .rent_exempt_lamports
      .checked_add(plan.amount_in)
      .ok_or(SwapError::PricingOverflow)?,
    SwapDirection::Sell => plan.rent_exempt_lamports,
  };
  let args = SwapArgs {
    amount_in: plan.amount_in,
    minimum_amount_out: plan.minimum_amount_out,
  };

  let mut instructions = vec![
    ComputeBudgetInstruction::set_compute_unit_limit(plan.compute_unit_limit),
    ComputeBudgetInstruction::set_compute_unit_price(plan.compute_unit_price),
    create_seeded_token_account(
      &owner,
      &wrapped,
      &plan.seed,
      wrapped_lamports,
      &TOKEN_PROGRAM,
    ),
    initialize_wrapped_native(&TOKEN_PROGRAM, &wrapped, &owner)
      .map_err(build_failed)?,
  ];

  match plan.direction {
    SwapDirection::Buy => {
      let destination = if let Some(existing) = plan.token_account {
        existing
      } else {
        instructions.push(create_associated_token_account(
          &owner,
          &plan.token_mint,
          &token_program,
        ));
        ata!(owner, plan.token_mint, token_program)
      };
      let accounts = SwapAccounts {
        owner,
        input_mint: NATIVE_MINT,
        user_source: wrapped,
        user_destination: destination,
      };
      instructions.push(keys.swap_instruction(&accounts, &args));
      instructions.push(
        close_account(&TOKEN_PROGRAM, &wrapped, &owner).map_err(build_failed)?,
      );
    }
    SwapDirection::Sell => {
      let source = plan.token_account.ok_or(SwapError::NoTokenBalance)?;
      let accounts = SwapAccounts {
        owner,
        input_mint: plan.token_mint,
        user_source: source,
        user_destination: wrapped,
      };
      instructions.push(keys.swap_instruction(&accounts, &args));
      instructions.push(
        close_account(&TOKEN_PROGRAM, &wrapped, &owner).map_err(build_failed)?,
      );
      if plan.close_token_account {
        instructions.push(
          close_account(&token_program, &source, &owner)
            .map_err(build_failed)?,
        );
      }
    }
  }
  Ok(instructions)
}

/// Compiles a v0 message paid by `payer` and signs it.
///
/// # Errors
/// - Failed to compile message
pub fn sign_v0_transaction(
  payer: &Keypair,
  instructions: &[Instruction],
  recent_blockhash: Hash,
) -> Result<VersionedTransaction> {
  let message = v0::Message::try_compile(
    &payer.pubkey(),
    instructions,
    &[],
    recent_blockhash,
  )?;
  let signatures = vec![payer.sign_message(&message.serialize())];
  Ok(VersionedTransaction {
    message: VersionedMessage::V0(message),
    signatures,
  })
}
