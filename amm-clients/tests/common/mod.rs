//! In-memory chain used by the swap pipeline tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use amm_clients::confirmation::Sleeper;
use amm_clients::prelude::*;
use amm_clients::rpc::TransactionRecord;
use amm_idl::layout::{
  AccountFlags, AmmInfo, CpPoolState, Layout, MarketState, TokenAccountState,
};
use amm_idl::pda::market_authority;
use amm_idl::programs::{TOKEN_2022_PROGRAM, TOKEN_PROGRAM};
use anchor_client::solana_sdk::hash::Hash;
use anchor_client::solana_sdk::instruction::CompiledInstruction;
use anchor_client::solana_sdk::transaction::VersionedTransaction;
use anyhow::{anyhow, Result};
use async_trait::async_trait;

pub const RENT: u64 = 2_039_280;
/// 1,000,000 tokens at 6 decimals.
pub const TOKEN_RESERVE: u64 = 1_000_000_000_000;
/// 100 SOL.
pub const NATIVE_RESERVE: u64 = 100_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  GetAccount(Pubkey),
  GetMultipleAccounts(Vec<Pubkey>),
  LatestBlockhash,
  RentExemption(usize),
  FindTokenAccount(Pubkey),
  SendTransaction,
  TransactionRecord(Signature),
}

/// Records every call and serves canned accounts and statuses.
#[derive(Default)]
pub struct MockRpc {
  accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
  token_accounts: Mutex<HashMap<Pubkey, Pubkey>>,
  records: Mutex<VecDeque<Option<TransactionRecord>>>,
  reject_send: Mutex<Option<String>>,
  fail_batches: AtomicBool,
  calls: Mutex<Vec<Call>>,
  sent: Mutex<Vec<VersionedTransaction>>,
}

impl MockRpc {
  pub fn set_account(&self, key: Pubkey, data: Vec<u8>) {
    self.accounts.lock().unwrap().insert(key, data);
  }

  pub fn remove_account(&self, key: &Pubkey) {
    self.accounts.lock().unwrap().remove(key);
  }

  /// Registers `account` as the payer's holding of `mint`.
  pub fn set_token_account(
    &self,
    mint: Pubkey,
    account: Pubkey,
    data: Vec<u8>,
  ) {
    self.token_accounts.lock().unwrap().insert(mint, account);
    self.set_account(account, data);
  }

  /// Queues the answer of the next status poll; an empty queue answers
  /// "not yet seen".
  pub fn push_record(&self, record: Option<TransactionRecord>) {
    self.records.lock().unwrap().push_back(record);
  }

  pub fn reject_sends(&self, reason: &str) {
    *self.reject_send.lock().unwrap() = Some(reason.to_string());
  }

  /// Makes every batched account query fail at the transport.
  pub fn fail_batches(&self) {
    self.fail_batches.store(true, Ordering::SeqCst);
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
    self.calls().iter().filter(|call| pred(call)).count()
  }

  pub fn sent(&self) -> Vec<VersionedTransaction> {
    self.sent.lock().unwrap().clone()
  }

  fn record(&self, call: Call) {
    self.calls.lock().unwrap().push(call);
  }
}

#[async_trait]
impl RpcProvider for MockRpc {
  async fn get_account_data(&self, key: &Pubkey) -> Result<Option<Vec<u8>>> {
    self.record(Call::GetAccount(*key));
    Ok(self.accounts.lock().unwrap().get(key).cloned())
  }

  async fn get_multiple_account_data(
    &self,
    keys: &[Pubkey],
  ) -> Result<Vec<Option<Vec<u8>>>> {
    self.record(Call::GetMultipleAccounts(keys.to_vec()));
    if self.fail_batches.load(Ordering::SeqCst) {
      return Err(anyhow!("connection reset"));
    }
    let accounts = self.accounts.lock().unwrap();
    Ok(keys.iter().map(|key| accounts.get(key).cloned()).collect())
  }

  async fn get_latest_blockhash(&self) -> Result<Hash> {
    self.record(Call::LatestBlockhash);
    Ok(Hash::new_unique())
  }

  async fn get_minimum_balance_for_rent_exemption(
    &self,
    data_len: usize,
  ) -> Result<u64> {
    self.record(Call::RentExemption(data_len));
    Ok(RENT)
  }

  async fn find_token_account(
    &self,
    _owner: &Pubkey,
    mint: &Pubkey,
  ) -> Result<Option<Pubkey>> {
    self.record(Call::FindTokenAccount(*mint));
    Ok(self.token_accounts.lock().unwrap().get(mint).copied())
  }

  async fn send_transaction(
    &self,
    transaction: &VersionedTransaction,
    _skip_preflight: bool,
  ) -> Result<Signature> {
    self.record(Call::SendTransaction);
    if let Some(reason) = self.reject_send.lock().unwrap().clone() {
      return Err(anyhow!(reason));
    }
    self.sent.lock().unwrap().push(transaction.clone());
    transaction
      .signatures
      .first()
      .copied()
      .ok_or_else(|| anyhow!("unsigned transaction"))
  }

  async fn get_transaction_record(
    &self,
    signature: &Signature,
  ) -> Result<Option<TransactionRecord>> {
    self.record(Call::TransactionRecord(*signature));
    Ok(self.records.lock().unwrap().pop_front().flatten())
  }
}

/// Returns immediately, counting how often it was asked to wait.
#[derive(Default)]
pub struct InstantSleeper {
  sleeps: AtomicU32,
}

impl InstantSleeper {
  pub fn sleeps(&self) -> u32 {
    self.sleeps.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Sleeper for InstantSleeper {
  async fn sleep(&self, _duration: Duration) {
    self.sleeps.fetch_add(1, Ordering::SeqCst);
  }
}

pub fn token_account(mint: Pubkey, owner: Pubkey, amount: u64) -> Vec<u8> {
  TokenAccountState {
    mint,
    owner,
    amount,
  }
  .encode()
}

/// Addresses of a pool seeded into a [`MockRpc`].
#[derive(Debug, Clone, Copy)]
pub struct SeededPool {
  pub pool: Pubkey,
  pub token_mint: Pubkey,
  pub vaults: [Pubkey; 2],
  pub market_authority: Option<Pubkey>,
}

/// Shape of a seeded legacy pool.
#[derive(Debug, Clone, Copy)]
pub struct LegacyLayout {
  /// SOL on the base side instead of the quote side.
  pub native_base: bool,
  pub market_program: Pubkey,
}

impl Default for LegacyLayout {
  fn default() -> Self {
    LegacyLayout {
      native_base: false,
      market_program: Network::Mainnet.programs().order_book,
    }
  }
}

/// Legacy pool of 1,000,000 tokens (6 decimals) against 100 SOL, token on
/// the base side.
pub fn seed_legacy_pool(rpc: &MockRpc) -> SeededPool {
  seed_legacy_pool_with(rpc, LegacyLayout::default())
}

pub fn seed_legacy_pool_with(
  rpc: &MockRpc,
  layout: LegacyLayout,
) -> SeededPool {
  let programs = Network::Mainnet.programs();
  let pool = Pubkey::new_unique();
  let token_mint = Pubkey::new_unique();
  let market_id = Pubkey::new_unique();
  let market_program = layout.market_program;
  let nonce = (0..256)
    .find(|n| market_authority(&market_id, *n, &market_program).is_ok())
    .expect("some nonce yields an off-curve authority");
  let authority = market_authority(&market_id, nonce, &market_program)
    .expect("nonce was checked");
  let token_side = (token_mint, 6, TOKEN_RESERVE);
  let native_side = (NATIVE_MINT, 9, NATIVE_RESERVE);
  let (base, quote) = if layout.native_base {
    (native_side, token_side)
  } else {
    (token_side, native_side)
  };
  let info = AmmInfo {
    status: 6,
    nonce: 254,
    base_decimal: base.1,
    quote_decimal: quote.1,
    base_vault: Pubkey::new_unique(),
    quote_vault: Pubkey::new_unique(),
    base_mint: base.0,
    quote_mint: quote.0,
    lp_mint: Pubkey::new_unique(),
    open_orders: Pubkey::new_unique(),
    market_id,
    market_program_id: market_program,
    target_orders: Pubkey::new_unique(),
    ..AmmInfo::default()
  };
  let market = MarketState {
    account_flags: AccountFlags::from_bits(0b11),
    own_address: market_id,
    vault_signer_nonce: nonce,
    base_mint: base.0,
    quote_mint: quote.0,
    base_vault: Pubkey::new_unique(),
    quote_vault: Pubkey::new_unique(),
    request_queue: Pubkey::new_unique(),
    event_queue: Pubkey::new_unique(),
    bids: Pubkey::new_unique(),
    asks: Pubkey::new_unique(),
    ..MarketState::default()
  };
  rpc.set_account(pool, info.encode());
  rpc.set_account(market_id, market.encode());
  let authority_of_vaults = programs.legacy_amm_authority;
  rpc.set_account(
    info.base_vault,
    token_account(base.0, authority_of_vaults, base.2),
  );
  rpc.set_account(
    info.quote_vault,
    token_account(quote.0, authority_of_vaults, quote.2),
  );
  SeededPool {
    pool,
    token_mint,
    vaults: [info.base_vault, info.quote_vault],
    market_authority: Some(authority),
  }
}

/// Constant-product pool with SOL on side 0 and a Token-2022 mint on side 1,
/// holding `earmarked` raw units of fees in each vault.
pub fn seed_cp_pool(rpc: &MockRpc, earmarked: u64) -> SeededPool {
  let programs = Network::Mainnet.programs();
  let pool = Pubkey::new_unique();
  let token_mint = Pubkey::new_unique();
  let state = CpPoolState {
    amm_config: Pubkey::new_unique(),
    pool_creator: Pubkey::new_unique(),
    token_0_vault: Pubkey::new_unique(),
    token_1_vault: Pubkey::new_unique(),
    lp_mint: Pubkey::new_unique(),
    token_0_mint: NATIVE_MINT,
    token_1_mint: token_mint,
    token_0_program: TOKEN_PROGRAM,
    token_1_program: TOKEN_2022_PROGRAM,
    observation_key: Pubkey::new_unique(),
    mint_0_decimals: 9,
    mint_1_decimals: 6,
    protocol_fees_token_0: earmarked,
    fund_fees_token_1: earmarked,
    ..CpPoolState::default()
  };
  rpc.set_account(pool, state.encode());
  let authority = programs.cp_amm_authority;
  rpc.set_account(
    state.token_0_vault,
    token_account(NATIVE_MINT, authority, NATIVE_RESERVE + earmarked),
  );
  rpc.set_account(
    state.token_1_vault,
    token_account(token_mint, authority, TOKEN_RESERVE + earmarked),
  );
  SeededPool {
    pool,
    token_mint,
    vaults: [state.token_0_vault, state.token_1_vault],
    market_authority: None,
  }
}

/// Program id and compiled instruction pairs of a sent transaction.
pub fn instructions(
  tx: &VersionedTransaction,
) -> Vec<(Pubkey, CompiledInstruction)> {
  let keys = tx.message.static_account_keys();
  tx.message
    .instructions()
    .iter()
    .map(|ix| (keys[usize::from(ix.program_id_index)], ix.clone()))
    .collect()
}

/// Account key at `position` of a compiled instruction.
pub fn account_at(
  tx: &VersionedTransaction,
  ix: &CompiledInstruction,
  position: usize,
) -> Pubkey {
  tx.message.static_account_keys()[usize::from(ix.accounts[position])]
}

pub fn client(
  rpc: &Arc<MockRpc>,
  sleeper: &Arc<InstantSleeper>,
  config: SwapConfig,
) -> SwapClient<Arc<MockRpc>> {
  let sleeper: Arc<dyn Sleeper> = sleeper.clone();
  SwapClient::with_provider(
    rpc.clone(),
    Keypair::new(),
    Network::Mainnet,
    config,
  )
  .with_sleeper(sleeper)
}

/// In-memory log sink for asserting on emitted events.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

impl CapturedLogs {
  /// Routes this thread's events here until the guard drops.
  pub fn install(&self) -> tracing::subscriber::DefaultGuard {
    let sink = self.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_writer(move || sink.clone())
      .with_ansi(false)
      .with_max_level(tracing::Level::DEBUG)
      .finish();
    tracing::subscriber::set_default(subscriber)
  }

  pub fn contents(&self) -> String {
    String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
  }
}
