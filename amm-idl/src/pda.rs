use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::pubkey::PubkeyError;

#[doc(hidden)]
pub use anchor_spl::associated_token;

#[macro_export]
macro_rules! ata {
  ($auth:expr, $mint:expr) => {
    $crate::ata!($auth, $mint, $crate::programs::TOKEN_PROGRAM)
  };
  ($auth:expr, $mint:expr, $token_program:expr) => {
    $crate::pda::associated_token::get_associated_token_address_with_program_id(
      &$auth,
      &$mint,
      &$token_program,
    )
  };
}

/// Program address for exact seeds, without bump search.
///
/// # Errors
/// * Seeds hash to a point on the ed25519 curve
/// * Too many or oversized seeds
pub fn create_program_address(
  seeds: &[&[u8]],
  program_id: &Pubkey,
) -> Result<Pubkey, PubkeyError> {
  Pubkey::create_program_address(seeds, program_id)
}

/// Signer of an order-book market's vaults, seeded by the market id and the
/// nonce stored in market state.
///
/// # Errors
/// * The nonce does not produce an off-curve address
pub fn market_authority(
  market_id: &Pubkey,
  vault_signer_nonce: u64,
  order_book_program: &Pubkey,
) -> Result<Pubkey, PubkeyError> {
  create_program_address(
    &[market_id.as_ref(), &vault_signer_nonce.to_le_bytes()],
    order_book_program,
  )
}

/// Address of a seed-derived token account owned by `token_program`.
///
/// # Errors
/// * Seed longer than 32 bytes
pub fn seeded_token_account(
  payer: &Pubkey,
  seed: &str,
  token_program: &Pubkey,
) -> Result<Pubkey, PubkeyError> {
  Pubkey::create_with_seed(payer, seed, token_program)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::programs::{Network, TOKEN_2022_PROGRAM, TOKEN_PROGRAM};
  use anchor_lang::prelude::pubkey;

  fn first_valid_nonce(market: &Pubkey, program: &Pubkey) -> Option<u64> {
    (0..256).find(|nonce| market_authority(market, *nonce, program).is_ok())
  }

  #[test]
  fn market_authority_is_off_curve() {
    let program = Network::Mainnet.programs().order_book;
    let market = Pubkey::new_unique();
    let nonce = first_valid_nonce(&market, &program);
    assert!(nonce.is_some());
    let authority =
      nonce.and_then(|n| market_authority(&market, n, &program).ok());
    assert!(authority.is_some_and(|a| !a.is_on_curve()));
  }

  /// SOL/USDC market behind legacy pool
  /// `58oQChx4yWmvKdwLLZzBi4ChoCc2fqCUWBkwMihLYQo2`.
  #[test]
  fn mainnet_sol_usdc_market_authority() {
    let market = pubkey!("8BnEgHoWFysVcuFFX7QztDmzuH8r5ZFvyP3sYwn1XTh6");
    let program = Network::Mainnet.programs().order_book;
    assert_eq!(
      Ok(pubkey!("CTz5UMLQm2SRWHzQnU62Pi4yJqbNGjgRBHqqp6oDHfF7")),
      market_authority(&market, 1, &program)
    );
    assert_ne!(
      Ok(pubkey!("CTz5UMLQm2SRWHzQnU62Pi4yJqbNGjgRBHqqp6oDHfF7")),
      market_authority(&market, 2, &program)
    );
  }

  #[test]
  fn nonce_is_eight_little_endian_bytes() {
    let program = Network::Devnet.programs().order_book;
    let market = Pubkey::new_unique();
    if let Some(nonce) = first_valid_nonce(&market, &program) {
      let manual = Pubkey::create_program_address(
        &[market.as_ref(), &nonce.to_le_bytes()],
        &program,
      );
      assert_eq!(manual, market_authority(&market, nonce, &program));
    }
  }

  #[test]
  fn seeded_account_depends_on_owner_program() -> Result<(), PubkeyError> {
    let payer = Pubkey::new_unique();
    let seed = "A".repeat(32);
    let classic = seeded_token_account(&payer, &seed, &TOKEN_PROGRAM)?;
    let extended = seeded_token_account(&payer, &seed, &TOKEN_2022_PROGRAM)?;
    assert_ne!(classic, extended);
    assert_eq!(classic, seeded_token_account(&payer, &seed, &TOKEN_PROGRAM)?);
    Ok(())
  }

  #[test]
  fn overlong_seed_rejected() {
    let payer = Pubkey::new_unique();
    assert_eq!(
      Err(PubkeyError::MaxSeedLengthExceeded),
      seeded_token_account(&payer, &"x".repeat(33), &TOKEN_PROGRAM)
    );
  }

  #[test]
  fn ata_defaults_to_classic_token_program() {
    let auth = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    assert_eq!(ata!(auth, mint), ata!(auth, mint, TOKEN_PROGRAM));
    assert_ne!(ata!(auth, mint), ata!(auth, mint, TOKEN_2022_PROGRAM));
  }
}
