//! End-to-end swap pipeline against a single pool.

use std::sync::Arc;

use amm_core::config::SwapConfig;
use amm_core::error::{SwapError, SwapResult};
use amm_core::reserves::Reserves;
use amm_core::slippage_config::SlippageConfig;
use amm_core::swap_intent::{SwapDirection, SwapIntent};
use amm_core::util::{to_raw_amount, to_ui_amount, NATIVE_DECIMALS};
use amm_idl::layout::{Layout, TokenAccountState};
use amm_idl::programs::{Network, NATIVE_MINT};
use anchor_client::solana_sdk::pubkey::Pubkey;
use anchor_client::solana_sdk::signature::Keypair;
use anchor_client::solana_sdk::signer::Signer;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::confirmation::{
  await_confirmation, ConfirmationResult, ConfirmationStatus, RetryPolicy,
  Sleeper, TokioSleeper,
};
use crate::pool_keys::{PoolKeys, PoolVariant};
use crate::report::catch_all;
use crate::reserves::fetch_reserves;
use crate::resolver::resolve;
use crate::rpc::{RpcProvider, SolanaRpcProvider};
use crate::transaction::{
  build_instructions, random_seed, sign_v0_transaction, SwapPlan,
};

/// Priced swap, not submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapQuote {
  pub direction: SwapDirection,
  /// Input in UI units.
  pub amount_in: Decimal,
  /// Input in the input token's smallest unit.
  pub amount_in_raw: u64,
  /// Output before slippage, UI units.
  pub expected_out: Decimal,
  /// Output floor in the output token's smallest unit.
  pub minimum_amount_out: u64,
  pub reserves: Reserves,
}

/// A payer's token account and its balance.
#[derive(Debug, Clone, Copy)]
struct Holding {
  account: Pubkey,
  balance: u64,
}

/// Prices, builds, submits and confirms swaps for one payer.
pub struct SwapClient<R: RpcProvider> {
  rpc: R,
  keypair: Arc<Keypair>,
  network: Network,
  config: SwapConfig,
  sleeper: Arc<dyn Sleeper>,
}

impl SwapClient<SolanaRpcProvider> {
  /// Client over a JSON-RPC endpoint.
  #[must_use]
  pub fn new(
    rpc_url: String,
    keypair: Keypair,
    network: Network,
    config: SwapConfig,
  ) -> Self {
    Self::with_provider(
      SolanaRpcProvider::from_url(rpc_url),
      keypair,
      network,
      config,
    )
  }
}

impl<R: RpcProvider> SwapClient<R> {
  #[must_use]
  pub fn with_provider(
    rpc: R,
    keypair: Keypair,
    network: Network,
    config: SwapConfig,
  ) -> Self {
    SwapClient {
      rpc,
      keypair: Arc::new(keypair),
      network,
      config,
      sleeper: Arc::new(TokioSleeper),
    }
  }

  /// Replaces the timer used between confirmation polls.
  #[must_use]
  pub fn with_sleeper(self, sleeper: Arc<dyn Sleeper>) -> Self {
    SwapClient { sleeper, ..self }
  }

  #[must_use]
  pub fn pubkey(&self) -> Pubkey {
    self.keypair.pubkey()
  }

  #[must_use]
  pub fn config(&self) -> &SwapConfig {
    &self.config
  }

  /// # Errors
  /// * [`SwapError::PoolNotFound`]
  pub async fn pool_keys(
    &self,
    pool: &Pubkey,
    variant: PoolVariant,
  ) -> SwapResult<PoolKeys> {
    resolve(&self.rpc, self.network, pool, variant).await
  }

  /// Fresh reserves of a resolved pool.
  ///
  /// # Errors
  /// * [`SwapError::ReserveUnavailable`]
  pub async fn reserves(&self, keys: &PoolKeys) -> SwapResult<Reserves> {
    fetch_reserves(&self.rpc, keys, &NATIVE_MINT).await
  }

  /// Native units per pool token at current reserves.
  ///
  /// # Errors
  /// * Pool resolution or reserve fetch failures
  pub async fn token_price(
    &self,
    pool: &Pubkey,
    variant: PoolVariant,
  ) -> SwapResult<Decimal> {
    let keys = self.pool_keys(pool, variant).await?;
    let reserves = self.reserves(&keys).await?;
    reserves.price().ok_or(SwapError::PricingOverflow)
  }

  /// Prices `intent` without submitting anything.
  ///
  /// # Errors
  /// * [`SwapError::UnsupportedPair`] before any RPC call if neither side is
  ///   native, or if the pool does not trade the intent's token
  /// * Pool resolution, reserve fetch or pricing failures
  pub async fn quote(
    &self,
    intent: &SwapIntent,
    variant: PoolVariant,
  ) -> SwapResult<SwapQuote> {
    let (direction, _, keys) = self.resolve_intent(intent, variant).await?;
    let reserves = self.reserves(&keys).await?;
    self.price(
      direction,
      intent.amount_in,
      reserves,
      SlippageConfig::new(intent.slippage_bps),
    )
  }

  /// Executes `intent` in whichever direction it implies.
  ///
  /// # Errors
  /// * As [`SwapClient::quote`]
  /// * [`SwapError::NoTokenBalance`] or [`SwapError::InsufficientBalance`]
  ///   selling more than held
  /// * [`SwapError::SubmissionFailed`] if the node rejects the transaction
  pub async fn swap(
    &self,
    intent: &SwapIntent,
    variant: PoolVariant,
  ) -> SwapResult<ConfirmationResult> {
    let (direction, token_mint, keys) =
      self.resolve_intent(intent, variant).await?;
    let slippage = SlippageConfig::new(intent.slippage_bps);
    match direction {
      SwapDirection::Buy => {
        self
          .execute_buy(&keys, token_mint, intent.amount_in, slippage)
          .await
      }
      SwapDirection::Sell => {
        let holding = self
          .holding(&token_mint)
          .await?
          .ok_or(SwapError::NoTokenBalance)?;
        self
          .execute_sell(
            &keys,
            token_mint,
            intent.amount_in,
            slippage,
            holding,
            false,
          )
          .await
      }
    }
  }

  /// Spends `amount_in` native units on the pool's token.
  ///
  /// # Errors
  /// * Pool resolution, reserve fetch, pricing or submission failures
  pub async fn buy(
    &self,
    pool: &Pubkey,
    variant: PoolVariant,
    amount_in: Decimal,
    slippage_bps: Option<u16>,
  ) -> SwapResult<ConfirmationResult> {
    let keys = self.pool_keys(pool, variant).await?;
    let token_mint = keys.token_mint(&NATIVE_MINT)?;
    let slippage = self.config.slippage(slippage_bps);
    self.execute_buy(&keys, token_mint, amount_in, slippage).await
  }

  /// Sells `percentage` of the payer's balance of the pool's token, closing
  /// the token account when selling all of it.
  ///
  /// # Errors
  /// * [`SwapError::InvalidPercentage`] outside `1..=100`, before any RPC
  ///   call
  /// * [`SwapError::NoTokenBalance`] without a non-zero balance
  /// * [`SwapError::Rpc`] if the token account exists but cannot be decoded
  /// * Pool resolution, reserve fetch, pricing or submission failures
  pub async fn sell(
    &self,
    pool: &Pubkey,
    variant: PoolVariant,
    percentage: u8,
    slippage_bps: Option<u16>,
  ) -> SwapResult<ConfirmationResult> {
    if !(1..=100).contains(&percentage) {
      return Err(SwapError::InvalidPercentage);
    }
    let keys = self.pool_keys(pool, variant).await?;
    let token_mint = keys.token_mint(&NATIVE_MINT)?;
    let decimals = keys.decimals(&token_mint).ok_or(SwapError::PoolNotFound)?;
    let holding = self
      .holding(&token_mint)
      .await?
      .filter(|h| h.balance > 0)
      .ok_or(SwapError::NoTokenBalance)?;
    let raw = u128::from(holding.balance) * u128::from(percentage) / 100;
    let raw = u64::try_from(raw).map_err(|_| SwapError::PricingOverflow)?;
    if raw == 0 {
      return Err(SwapError::NoTokenBalance);
    }
    let amount_in =
      to_ui_amount(raw, decimals).ok_or(SwapError::PricingOverflow)?;
    debug!(
      token = %token_mint,
      balance = holding.balance,
      percentage,
      amount_in = %amount_in,
      "selling share of balance"
    );
    let slippage = self.config.slippage(slippage_bps);
    let close_token_account = percentage == 100;
    self
      .execute_sell(
        &keys,
        token_mint,
        amount_in,
        slippage,
        holding,
        close_token_account,
      )
      .await
  }

  /// Renders a swap outcome as the fixed user-facing message.
  #[must_use]
  pub fn report(result: &SwapResult<ConfirmationResult>) -> String {
    match result {
      Ok(ConfirmationResult {
        signature,
        status: ConfirmationStatus::Confirmed,
      }) => format!("Transaction successful. Signature: {signature}"),
      Ok(ConfirmationResult {
        signature,
        status: ConfirmationStatus::Failed(_),
      }) => format!("Transaction failed. Signature: {signature}"),
      Ok(ConfirmationResult {
        status: ConfirmationStatus::TimedOut,
        ..
      })
      | Err(SwapError::Timeout) => {
        "Transaction failed. Confirmation timeout.".to_string()
      }
      Err(SwapError::PoolNotFound) => "Failed to fetch pool keys.".to_string(),
      Err(err @ (SwapError::NoTokenBalance | SwapError::InvalidPercentage)) => {
        err.to_string()
      }
      Err(err) => format!("Error occurred during transaction: {err}"),
    }
  }

  /// [`SwapClient::buy`] rendered by [`SwapClient::report`]; never panics.
  pub async fn buy_report(
    &self,
    pool: &Pubkey,
    variant: PoolVariant,
    amount_in: Decimal,
    slippage_bps: Option<u16>,
  ) -> String {
    catch_all(async {
      Self::report(&self.buy(pool, variant, amount_in, slippage_bps).await)
    })
    .await
  }

  /// [`SwapClient::sell`] rendered by [`SwapClient::report`]; never panics.
  pub async fn sell_report(
    &self,
    pool: &Pubkey,
    variant: PoolVariant,
    percentage: u8,
    slippage_bps: Option<u16>,
  ) -> String {
    catch_all(async {
      Self::report(&self.sell(pool, variant, percentage, slippage_bps).await)
    })
    .await
  }

  /// [`SwapClient::swap`] rendered by [`SwapClient::report`]; never panics.
  pub async fn swap_report(
    &self,
    intent: &SwapIntent,
    variant: PoolVariant,
  ) -> String {
    catch_all(async { Self::report(&self.swap(intent, variant).await) }).await
  }

  async fn resolve_intent(
    &self,
    intent: &SwapIntent,
    variant: PoolVariant,
  ) -> SwapResult<(SwapDirection, Pubkey, PoolKeys)> {
    let direction = intent.direction(&NATIVE_MINT)?;
    let token_mint = intent.token_mint(&NATIVE_MINT)?;
    let keys = self.pool_keys(&intent.pool, variant).await?;
    if keys.token_mint(&NATIVE_MINT)? == token_mint {
      Ok((direction, token_mint, keys))
    } else {
      Err(SwapError::UnsupportedPair)
    }
  }

  /// The payer's account for `mint`. A missing account is `None`; an
  /// undecodable one is an error, not an empty balance.
  async fn holding(&self, mint: &Pubkey) -> SwapResult<Option<Holding>> {
    let owner = self.pubkey();
    let Some(account) = self
      .rpc
      .find_token_account(&owner, mint)
      .await
      .map_err(SwapError::rpc)?
    else {
      return Ok(None);
    };
    let data = self
      .rpc
      .get_account_data(&account)
      .await
      .map_err(SwapError::rpc)?;
    let Some(bytes) = data else {
      return Ok(None);
    };
    let state = TokenAccountState::decode_prefix(&bytes).map_err(|e| {
      warn!(%account, %mint, error = %e, "token account decode failed");
      SwapError::Rpc(format!("Malformed token account {account}: {e}"))
    })?;
    Ok(Some(Holding {
      account,
      balance: state.amount,
    }))
  }

  fn price(
    &self,
    direction: SwapDirection,
    amount_in: Decimal,
    reserves: Reserves,
    slippage: SlippageConfig,
  ) -> SwapResult<SwapQuote> {
    let fee = self.config.fee_pct;
    let (expected_out, in_decimals, out_decimals) = match direction {
      SwapDirection::Buy => (
        reserves.tokens_out(amount_in, fee)?,
        NATIVE_DECIMALS,
        reserves.token_decimals,
      ),
      SwapDirection::Sell => (
        reserves.native_out(amount_in, fee)?,
        reserves.token_decimals,
        NATIVE_DECIMALS,
      ),
    };
    let amount_in_raw =
      to_raw_amount(amount_in, in_decimals).ok_or(SwapError::PricingOverflow)?;
    let minimum_amount_out =
      slippage.minimum_amount_out(expected_out, out_decimals)?;
    debug!(
      %direction,
      amount_in = %amount_in,
      expected_out = %expected_out,
      minimum_amount_out,
      slippage_bps = slippage.slippage_bps(),
      "swap priced"
    );
    Ok(SwapQuote {
      direction,
      amount_in,
      amount_in_raw,
      expected_out,
      minimum_amount_out,
      reserves,
    })
  }

  async fn execute_buy(
    &self,
    keys: &PoolKeys,
    token_mint: Pubkey,
    amount_in: Decimal,
    slippage: SlippageConfig,
  ) -> SwapResult<ConfirmationResult> {
    let reserves = self.reserves(keys).await?;
    let quote = self.price(SwapDirection::Buy, amount_in, reserves, slippage)?;
    let destination = self
      .rpc
      .find_token_account(&self.pubkey(), &token_mint)
      .await
      .map_err(SwapError::rpc)?;
    self.submit(keys, token_mint, &quote, destination, false).await
  }

  async fn execute_sell(
    &self,
    keys: &PoolKeys,
    token_mint: Pubkey,
    amount_in: Decimal,
    slippage: SlippageConfig,
    holding: Holding,
    close_token_account: bool,
  ) -> SwapResult<ConfirmationResult> {
    let reserves = self.reserves(keys).await?;
    let quote = self.price(SwapDirection::Sell, amount_in, reserves, slippage)?;
    if quote.amount_in_raw > holding.balance {
      return Err(SwapError::InsufficientBalance {
        requested: quote.amount_in_raw,
        available: holding.balance,
      });
    }
    self
      .submit(
        keys,
        token_mint,
        &quote,
        Some(holding.account),
        close_token_account,
      )
      .await
  }

  async fn submit(
    &self,
    keys: &PoolKeys,
    token_mint: Pubkey,
    quote: &SwapQuote,
    token_account: Option<Pubkey>,
    close_token_account: bool,
  ) -> SwapResult<ConfirmationResult> {
    let rent_exempt_lamports = self
      .rpc
      .get_minimum_balance_for_rent_exemption(TokenAccountState::LEN)
      .await
      .map_err(SwapError::rpc)?;
    let plan = SwapPlan {
      direction: quote.direction,
      owner: self.pubkey(),
      token_mint,
      amount_in: quote.amount_in_raw,
      minimum_amount_out: quote.minimum_amount_out,
      token_account,
      close_token_account,
      rent_exempt_lamports,
      seed: random_seed(),
      compute_unit_limit: self.config.compute_unit_limit,
      compute_unit_price: self.config.compute_unit_price,
    };
    let instructions = build_instructions(keys, &plan)?;
    let blockhash = self
      .rpc
      .get_latest_blockhash()
      .await
      .map_err(SwapError::rpc)?;
    let tx = sign_v0_transaction(&self.keypair, &instructions, blockhash)
      .map_err(|e| SwapError::SubmissionFailed(e.to_string()))?;
    let signature = self
      .rpc
      .send_transaction(&tx, self.config.skip_preflight)
      .await
      .map_err(|e| SwapError::SubmissionFailed(format!("{e:#}")))?;
    info!(
      %signature,
      pool = %keys.id(),
      variant = %keys.variant(),
      direction = %quote.direction,
      amount_in = quote.amount_in_raw,
      minimum_amount_out = quote.minimum_amount_out,
      "transaction submitted"
    );
    let policy = RetryPolicy {
      max_retries: self.config.max_retries,
      interval: self.config.retry_interval(),
    };
    let result =
      await_confirmation(&self.rpc, self.sleeper.as_ref(), signature, policy)
        .await;
    if let Err(err) = result.clone().into_result() {
      warn!(%signature, error = %err, "swap did not confirm");
    }
    Ok(result)
  }
}
