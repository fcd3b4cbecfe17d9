//! RPC provider abstraction (enables testing)

use std::str::FromStr;
use std::sync::Arc;

use anchor_client::solana_sdk::commitment_config::CommitmentConfig;
use anchor_client::solana_sdk::hash::Hash;
use anchor_client::solana_sdk::pubkey::Pubkey;
use anchor_client::solana_sdk::signature::Signature;
use anchor_client::solana_sdk::transaction::{
  TransactionError, VersionedTransaction,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use solana_rpc_client::nonblocking::rpc_client::RpcClient;
use solana_rpc_client_api::config::RpcSendTransactionConfig;
use solana_rpc_client_api::request::TokenAccountsFilter;

/// Ledger record of a landed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
  pub err: Option<TransactionError>,
}

impl TransactionRecord {
  #[must_use]
  pub fn ok() -> TransactionRecord {
    TransactionRecord { err: None }
  }

  #[must_use]
  pub fn failed(err: TransactionError) -> TransactionRecord {
    TransactionRecord { err: Some(err) }
  }
}

/// Chain reads and writes needed to price, submit and confirm a swap.
#[async_trait]
pub trait RpcProvider: Send + Sync {
  /// Raw account data, `None` if the account does not exist.
  ///
  /// # Errors
  /// Returns error if RPC call fails.
  async fn get_account_data(&self, key: &Pubkey) -> Result<Option<Vec<u8>>>;

  /// Batched [`RpcProvider::get_account_data`], in request order.
  ///
  /// # Errors
  /// Returns error if RPC call fails.
  async fn get_multiple_account_data(
    &self,
    keys: &[Pubkey],
  ) -> Result<Vec<Option<Vec<u8>>>>;

  /// # Errors
  /// Returns error if RPC call fails.
  async fn get_latest_blockhash(&self) -> Result<Hash>;

  /// # Errors
  /// Returns error if RPC call fails.
  async fn get_minimum_balance_for_rent_exemption(
    &self,
    data_len: usize,
  ) -> Result<u64>;

  /// First token account of `mint` held by `owner`.
  ///
  /// # Errors
  /// Returns error if RPC call fails or returns a malformed address.
  async fn find_token_account(
    &self,
    owner: &Pubkey,
    mint: &Pubkey,
  ) -> Result<Option<Pubkey>>;

  /// # Errors
  /// Returns error if the node rejects the transaction.
  async fn send_transaction(
    &self,
    transaction: &VersionedTransaction,
    skip_preflight: bool,
  ) -> Result<Signature>;

  /// `None` while the ledger has no record of the signature.
  ///
  /// # Errors
  /// Returns error if RPC call fails.
  async fn get_transaction_record(
    &self,
    signature: &Signature,
  ) -> Result<Option<TransactionRecord>>;
}

#[async_trait]
impl<T: RpcProvider> RpcProvider for Arc<T> {
  async fn get_account_data(&self, key: &Pubkey) -> Result<Option<Vec<u8>>> {
    (**self).get_account_data(key).await
  }

  async fn get_multiple_account_data(
    &self,
    keys: &[Pubkey],
  ) -> Result<Vec<Option<Vec<u8>>>> {
    (**self).get_multiple_account_data(keys).await
  }

  async fn get_latest_blockhash(&self) -> Result<Hash> {
    (**self).get_latest_blockhash().await
  }

  async fn get_minimum_balance_for_rent_exemption(
    &self,
    data_len: usize,
  ) -> Result<u64> {
    (**self).get_minimum_balance_for_rent_exemption(data_len).await
  }

  async fn find_token_account(
    &self,
    owner: &Pubkey,
    mint: &Pubkey,
  ) -> Result<Option<Pubkey>> {
    (**self).find_token_account(owner, mint).await
  }

  async fn send_transaction(
    &self,
    transaction: &VersionedTransaction,
    skip_preflight: bool,
  ) -> Result<Signature> {
    (**self).send_transaction(transaction, skip_preflight).await
  }

  async fn get_transaction_record(
    &self,
    signature: &Signature,
  ) -> Result<Option<TransactionRecord>> {
    (**self).get_transaction_record(signature).await
  }
}

/// Real RPC provider wrapping Solana's `RpcClient`
pub struct SolanaRpcProvider {
  client: Arc<RpcClient>,
}

impl SolanaRpcProvider {
  #[must_use]
  pub fn new(client: Arc<RpcClient>) -> Self {
    Self { client }
  }

  /// Client at `url` reading at `confirmed` commitment.
  #[must_use]
  pub fn from_url(url: String) -> Self {
    Self::new(Arc::new(RpcClient::new_with_commitment(
      url,
      CommitmentConfig::confirmed(),
    )))
  }
}

#[async_trait]
impl RpcProvider for SolanaRpcProvider {
  async fn get_account_data(&self, key: &Pubkey) -> Result<Option<Vec<u8>>> {
    let response = self
      .client
      .get_account_with_commitment(key, self.client.commitment())
      .await
      .with_context(|| format!("Failed to fetch account {key}"))?;
    Ok(response.value.map(|account| account.data))
  }

  async fn get_multiple_account_data(
    &self,
    keys: &[Pubkey],
  ) -> Result<Vec<Option<Vec<u8>>>> {
    let accounts = self
      .client
      .get_multiple_accounts(keys)
      .await
      .context("Failed to fetch accounts from RPC")?;
    Ok(
      accounts
        .into_iter()
        .map(|opt| opt.map(|account| account.data))
        .collect(),
    )
  }

  async fn get_latest_blockhash(&self) -> Result<Hash> {
    self
      .client
      .get_latest_blockhash()
      .await
      .context("Failed to fetch latest blockhash")
  }

  async fn get_minimum_balance_for_rent_exemption(
    &self,
    data_len: usize,
  ) -> Result<u64> {
    self
      .client
      .get_minimum_balance_for_rent_exemption(data_len)
      .await
      .context("Failed to fetch rent-exempt minimum")
  }

  async fn find_token_account(
    &self,
    owner: &Pubkey,
    mint: &Pubkey,
  ) -> Result<Option<Pubkey>> {
    let accounts = self
      .client
      .get_token_accounts_by_owner(owner, TokenAccountsFilter::Mint(*mint))
      .await
      .with_context(|| format!("Failed to list {mint} accounts of {owner}"))?;
    accounts
      .first()
      .map(|keyed| {
        Pubkey::from_str(&keyed.pubkey)
          .with_context(|| format!("Malformed token account {}", keyed.pubkey))
      })
      .transpose()
  }

  async fn send_transaction(
    &self,
    transaction: &VersionedTransaction,
    skip_preflight: bool,
  ) -> Result<Signature> {
    let config = RpcSendTransactionConfig {
      skip_preflight,
      preflight_commitment: Some(self.client.commitment().commitment),
      ..RpcSendTransactionConfig::default()
    };
    self
      .client
      .send_transaction_with_config(transaction, config)
      .await
      .context("Transaction rejected by RPC node")
  }

  async fn get_transaction_record(
    &self,
    signature: &Signature,
  ) -> Result<Option<TransactionRecord>> {
    let status = self
      .client
      .get_signature_status_with_commitment(
        signature,
        CommitmentConfig::confirmed(),
      )
      .await
      .with_context(|| format!("Failed to fetch status of {signature}"))?;
    Ok(status.map(|result| TransactionRecord { err: result.err() }))
  }
}
