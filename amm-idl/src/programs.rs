//! Program ids and fixed authorities per network.

use anchor_lang::prelude::{pubkey, Pubkey};

pub use anchor_spl::associated_token::ID as ASSOCIATED_TOKEN_PROGRAM;
pub use anchor_spl::token::spl_token::native_mint::ID as NATIVE_MINT;
pub use anchor_spl::token::ID as TOKEN_PROGRAM;
pub use anchor_spl::token_2022::ID as TOKEN_2022_PROGRAM;

/// Network whose program deployments are targeted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Network {
  #[default]
  Mainnet,
  Devnet,
}

/// Addresses that differ between deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramIds {
  pub legacy_amm: Pubkey,
  pub legacy_amm_authority: Pubkey,
  pub order_book: Pubkey,
  pub cp_amm: Pubkey,
  pub cp_amm_authority: Pubkey,
}

const MAINNET: ProgramIds = ProgramIds {
  legacy_amm: pubkey!("675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8"),
  legacy_amm_authority: pubkey!("5Q544fKrFoe6tsEbD7S8EmxGTJYAKtTVhAW5Q5pge4j1"),
  order_book: pubkey!("srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX"),
  cp_amm: pubkey!("CPMMoo8L3F4NbTegBCKVNunggL7H1ZpdTHKxQB5qKP1C"),
  cp_amm_authority: pubkey!("GpMZbSM2GgvTKHJirzeGfMFoaZ8UR2X7F4v8vHTvxFbL"),
};

const DEVNET: ProgramIds = ProgramIds {
  legacy_amm: pubkey!("HWy1jotHpo6UqeQxx49dpYYdQB8wj9Qk9MdxwjLvDHB8"),
  legacy_amm_authority: pubkey!("DbQqP6ehDYmeYjcBaMRuA8tAJY1EjDUz9DpwSLjaQqfC"),
  order_book: pubkey!("EoTcMgcDRTJVZDMZWBoU6rhYHZfkNTVEAfz3uUJRcYGj"),
  cp_amm: pubkey!("CPMDWBwJDtYax9qW7AyRuVC19Cc4L4Vcy4n2BHAbHkCW"),
  cp_amm_authority: pubkey!("7rQ1QFNosMkUCuh7Z7fPbTHvh73b68sQYdirycEzJVuw"),
};

impl Network {
  #[must_use]
  pub const fn programs(&self) -> &'static ProgramIds {
    match self {
      Network::Mainnet => &MAINNET,
      Network::Devnet => &DEVNET,
    }
  }

  #[must_use]
  pub const fn default_rpc_url(&self) -> &'static str {
    match self {
      Network::Mainnet => "https://api.mainnet-beta.solana.com",
      Network::Devnet => "https://api.devnet.solana.com",
    }
  }

  #[must_use]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Network::Mainnet => "mainnet",
      Network::Devnet => "devnet",
    }
  }
}

impl std::fmt::Display for Network {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Network {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "mainnet" | "mainnet-beta" => Ok(Network::Mainnet),
      "devnet" => Ok(Network::Devnet),
      other => Err(format!("{other} is not a supported network.")),
    }
  }
}
