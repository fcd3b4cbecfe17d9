//! Polling a submitted signature until it lands, fails or times out.

use std::time::Duration;

use amm_core::error::{SwapError, SwapResult};
use anchor_client::solana_sdk::signature::Signature;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::rpc::RpcProvider;

/// Suspends between confirmation polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
  async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
  async fn sleep(&self, duration: Duration) {
    tokio::time::sleep(duration).await;
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
  Confirmed,
  /// Landed with an on-chain error. Final.
  Failed(String),
  /// Never observed within the retry budget. The transaction may still land.
  TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationResult {
  pub signature: Signature,
  pub status: ConfirmationStatus,
}

impl ConfirmationResult {
  /// # Errors
  /// * [`SwapError::ChainRejected`] for a landed failure
  /// * [`SwapError::Timeout`] if never observed
  pub fn into_result(self) -> SwapResult<Signature> {
    match self.status {
      ConfirmationStatus::Confirmed => Ok(self.signature),
      ConfirmationStatus::Failed(err) => Err(SwapError::ChainRejected(err)),
      ConfirmationStatus::TimedOut => Err(SwapError::Timeout),
    }
  }
}

/// Bounds of the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_retries: u32,
  pub interval: Duration,
}

/// Sleeps then polls, at most `policy.max_retries` times.
///
/// A record without error is `Confirmed`, a record with error is `Failed`
/// immediately. Transport errors count as not yet seen.
pub async fn await_confirmation<R: RpcProvider, S: Sleeper + ?Sized>(
  rpc: &R,
  sleeper: &S,
  signature: Signature,
  policy: RetryPolicy,
) -> ConfirmationResult {
  for attempt in 1..=policy.max_retries {
    sleeper.sleep(policy.interval).await;
    match rpc.get_transaction_record(&signature).await {
      Ok(Some(record)) => {
        let status = match record.err {
          None => ConfirmationStatus::Confirmed,
          Some(err) => ConfirmationStatus::Failed(err.to_string()),
        };
        info!(%signature, attempt, ?status, "transaction landed");
        return ConfirmationResult { signature, status };
      }
      Ok(None) => debug!(%signature, attempt, "transaction not yet seen"),
      Err(e) => warn!(%signature, attempt, error = %e, "status poll failed"),
    }
  }
  info!(%signature, max_retries = policy.max_retries, "confirmation timed out");
  ConfirmationResult {
    signature,
    status: ConfirmationStatus::TimedOut,
  }
}
