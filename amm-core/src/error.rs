use thiserror::Error;

/// Failure modes of a single swap attempt.
///
/// Every pipeline stage returns one of these; the top-level client renders
/// them into a fixed user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
  // resolver
  #[error("Pool or market state could not be fetched or decoded.")]
  PoolNotFound,
  // reserves
  #[error("Vault balances are unavailable or empty.")]
  ReserveUnavailable,
  // pricing
  #[error("Arithmetic overflow while pricing the swap.")]
  PricingOverflow,
  // balances
  #[error("No token balance available to sell.")]
  NoTokenBalance,
  #[error(
    "Insufficient balance: requested {requested}, available {available}."
  )]
  InsufficientBalance { requested: u64, available: u64 },
  // intent validation
  #[error("Percentage must be between 1 and 100.")]
  InvalidPercentage,
  #[error("Neither side of the swap is the native token.")]
  UnsupportedPair,
  // submission
  #[error("Transaction submission rejected: {0}")]
  SubmissionFailed(String),
  #[error("Transaction confirmation timed out.")]
  Timeout,
  #[error("Transaction landed with error: {0}")]
  ChainRejected(String),
  // transport
  #[error("RPC request failed: {0}")]
  Rpc(String),
}

impl SwapError {
  /// Wraps any displayable transport failure.
  pub fn rpc(err: impl std::fmt::Display) -> SwapError {
    SwapError::Rpc(err.to_string())
  }
}

pub type SwapResult<T> = Result<T, SwapError>;
