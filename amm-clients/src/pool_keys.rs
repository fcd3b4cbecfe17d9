//! Every address a swap against one pool needs, per pool variant.

use amm_core::error::SwapResult;
use amm_core::reserves::{native_side, PoolSide, VaultBalance};
use amm_idl::instructions::cp_swap::{swap_base_input, SwapBaseInput};
use amm_idl::instructions::legacy_swap::{swap_base_in, SwapBaseIn};
use amm_idl::instructions::SwapArgs;
use amm_idl::programs::TOKEN_PROGRAM;
use anchor_client::solana_sdk::instruction::Instruction;
use anchor_client::solana_sdk::pubkey::Pubkey;

/// Pool program family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolVariant {
  /// AMM v4 paired with an order-book market.
  Legacy,
  ConstantProduct,
}

impl PoolVariant {
  #[must_use]
  pub const fn as_str(&self) -> &'static str {
    match self {
      PoolVariant::Legacy => "legacy",
      PoolVariant::ConstantProduct => "cpmm",
    }
  }
}

impl std::fmt::Display for PoolVariant {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for PoolVariant {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "legacy" | "amm" | "amm-v4" => Ok(PoolVariant::Legacy),
      "cpmm" | "cp" | "constant-product" => Ok(PoolVariant::ConstantProduct),
      other => Err(format!("{other} is not a supported pool variant.")),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyPoolKeys {
  pub id: Pubkey,
  pub program_id: Pubkey,
  pub authority: Pubkey,
  pub base_mint: Pubkey,
  pub quote_mint: Pubkey,
  pub base_decimals: u8,
  pub quote_decimals: u8,
  pub open_orders: Pubkey,
  pub target_orders: Pubkey,
  pub base_vault: Pubkey,
  pub quote_vault: Pubkey,
  pub market_program_id: Pubkey,
  pub market_id: Pubkey,
  pub market_authority: Pubkey,
  pub market_base_vault: Pubkey,
  pub market_quote_vault: Pubkey,
  pub market_bids: Pubkey,
  pub market_asks: Pubkey,
  pub market_event_queue: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpPoolKeys {
  pub id: Pubkey,
  pub program_id: Pubkey,
  pub authority: Pubkey,
  pub amm_config: Pubkey,
  pub pool_creator: Pubkey,
  pub token_0_vault: Pubkey,
  pub token_1_vault: Pubkey,
  pub token_0_mint: Pubkey,
  pub token_1_mint: Pubkey,
  pub token_0_program: Pubkey,
  pub token_1_program: Pubkey,
  pub mint_0_decimals: u8,
  pub mint_1_decimals: u8,
  pub lp_mint: Pubkey,
  pub observation_key: Pubkey,
  /// Protocol plus fund fees accrued in vault 0.
  pub earmarked_0: u64,
  pub earmarked_1: u64,
}

/// Resolved addresses of one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKeys {
  Legacy(LegacyPoolKeys),
  ConstantProduct(CpPoolKeys),
}

/// User-side accounts of one swap instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapAccounts {
  pub owner: Pubkey,
  pub input_mint: Pubkey,
  pub user_source: Pubkey,
  pub user_destination: Pubkey,
}

impl PoolKeys {
  #[must_use]
  pub fn variant(&self) -> PoolVariant {
    match self {
      PoolKeys::Legacy(_) => PoolVariant::Legacy,
      PoolKeys::ConstantProduct(_) => PoolVariant::ConstantProduct,
    }
  }

  #[must_use]
  pub fn id(&self) -> Pubkey {
    match self {
      PoolKeys::Legacy(keys) => keys.id,
      PoolKeys::ConstantProduct(keys) => keys.id,
    }
  }

  /// Mints in on-chain field order.
  #[must_use]
  pub fn mints(&self) -> (Pubkey, Pubkey) {
    match self {
      PoolKeys::Legacy(keys) => (keys.base_mint, keys.quote_mint),
      PoolKeys::ConstantProduct(keys) => (keys.token_0_mint, keys.token_1_mint),
    }
  }

  /// Vaults in on-chain field order.
  #[must_use]
  pub fn vaults(&self) -> [Pubkey; 2] {
    match self {
      PoolKeys::Legacy(keys) => [keys.base_vault, keys.quote_vault],
      PoolKeys::ConstantProduct(keys) => {
        [keys.token_0_vault, keys.token_1_vault]
      }
    }
  }

  /// The non-native mint of the pool.
  ///
  /// # Errors
  /// * [`amm_core::error::SwapError::UnsupportedPair`] unless exactly one
  ///   mint is native.
  pub fn token_mint(&self, native_mint: &Pubkey) -> SwapResult<Pubkey> {
    let (a, b) = self.mints();
    match native_side(&a, &b, native_mint)? {
      PoolSide::A => Ok(b),
      PoolSide::B => Ok(a),
    }
  }

  /// Token program owning accounts of `mint`.
  #[must_use]
  pub fn token_program(&self, mint: &Pubkey) -> Pubkey {
    match self {
      PoolKeys::Legacy(_) => TOKEN_PROGRAM,
      PoolKeys::ConstantProduct(keys) => {
        if *mint == keys.token_1_mint {
          keys.token_1_program
        } else {
          keys.token_0_program
        }
      }
    }
  }

  /// Decimals of `mint`, `None` if it is not in the pool.
  #[must_use]
  pub fn decimals(&self, mint: &Pubkey) -> Option<u8> {
    let (a, b) = self.mints();
    let (dec_a, dec_b) = match self {
      PoolKeys::Legacy(keys) => (keys.base_decimals, keys.quote_decimals),
      PoolKeys::ConstantProduct(keys) => {
        (keys.mint_0_decimals, keys.mint_1_decimals)
      }
    };
    if *mint == a {
      Some(dec_a)
    } else if *mint == b {
      Some(dec_b)
    } else {
      None
    }
  }

  /// Pairs raw vault amounts, in [`PoolKeys::vaults`] order, with their mint
  /// and the earmarked fees to exclude.
  #[must_use]
  pub fn vault_balances(&self, amounts: [u64; 2]) -> [VaultBalance; 2] {
    match self {
      PoolKeys::Legacy(keys) => [
        VaultBalance::new(keys.base_mint, amounts[0], keys.base_decimals),
        VaultBalance::new(keys.quote_mint, amounts[1], keys.quote_decimals),
      ],
      PoolKeys::ConstantProduct(keys) => [
        VaultBalance::new(keys.token_0_mint, amounts[0], keys.mint_0_decimals)
          .with_earmarked(keys.earmarked_0),
        VaultBalance::new(keys.token_1_mint, amounts[1], keys.mint_1_decimals)
          .with_earmarked(keys.earmarked_1),
      ],
    }
  }

  /// Swap instruction spending `args.amount_in` of `accounts.input_mint`.
  #[must_use]
  pub fn swap_instruction(
    &self,
    accounts: &SwapAccounts,
    args: &SwapArgs,
  ) -> Instruction {
    match self {
      PoolKeys::Legacy(keys) => swap_base_in(
        keys.program_id,
        &SwapBaseIn {
          token_program: TOKEN_PROGRAM,
          amm_id: keys.id,
          amm_authority: keys.authority,
          open_orders: keys.open_orders,
          target_orders: keys.target_orders,
          base_vault: keys.base_vault,
          quote_vault: keys.quote_vault,
          order_book_program: keys.market_program_id,
          market: keys.market_id,
          bids: keys.market_bids,
          asks: keys.market_asks,
          event_queue: keys.market_event_queue,
          market_base_vault: keys.market_base_vault,
          market_quote_vault: keys.market_quote_vault,
          market_authority: keys.market_authority,
          user_source: accounts.user_source,
          user_destination: accounts.user_destination,
          owner: accounts.owner,
        },
        args,
      ),
      PoolKeys::ConstantProduct(keys) => {
        let zero_in = accounts.input_mint == keys.token_0_mint;
        let (input, output) = if zero_in {
          (
            (keys.token_0_vault, keys.token_0_program, keys.token_0_mint),
            (keys.token_1_vault, keys.token_1_program, keys.token_1_mint),
          )
        } else {
          (
            (keys.token_1_vault, keys.token_1_program, keys.token_1_mint),
            (keys.token_0_vault, keys.token_0_program, keys.token_0_mint),
          )
        };
        swap_base_input(
          keys.program_id,
          &SwapBaseInput {
            payer: accounts.owner,
            authority: keys.authority,
            amm_config: keys.amm_config,
            pool_state: keys.id,
            input_token_account: accounts.user_source,
            output_token_account: accounts.user_destination,
            input_vault: input.0,
            output_vault: output.0,
            input_token_program: input.1,
            output_token_program: output.1,
            input_token_mint: input.2,
            output_token_mint: output.2,
            observation_state: keys.observation_key,
          },
          args,
        )
      }
    }
  }
}
