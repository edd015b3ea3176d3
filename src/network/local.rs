//! In-process validator network
//!
//! Every validator gets a home directory under one temporary base directory,
//! its own consensus key and its own application instance. A single producer
//! thread commits a block every `timeout_commit`, delivering the pending
//! transactions to every application.

use crate::config::{NetworkConfig, PruningStrategy};
use crate::core::{Coins, SignedTx};
use crate::error::{Result, TestnetError};
use crate::genesis::{AuthGenesisState, BankGenesisState, BaseAccount, GenesisDoc, GenesisState};
use crate::network::{AppContext, Application, ApplicationFactory, NetworkHandle, NetworkHarness};
use crate::utils::random_bytes;
use crate::wallet::{Identity, PublicKey, SigningAlgorithm};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tempfile::TempDir;
use uuid::Uuid;

const CONFIG_DIR: &str = "config";
const GENESIS_FILE: &str = "genesis.json";
const APP_CONFIG_FILE: &str = "app.toml";
const CONSENSUS_KEY_FILE: &str = "priv_validator_key.json";
const CONSENSUS_SEED_LEN: usize = 32;

/// Contents of a validator's `app.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppToml {
    pub pruning: PruningStrategy,
    pub minimum_gas_prices: String,
    pub halt_height: u64,
}

impl AppToml {
    pub fn from_config(config: &NetworkConfig) -> AppToml {
        AppToml {
            pruning: config.pruning_strategy,
            minimum_gas_prices: config.min_gas_prices.to_string(),
            halt_height: 0,
        }
    }
}

#[derive(Serialize)]
struct ConsensusKeyFile<'a> {
    address: String,
    pub_key: &'a PublicKey,
}

#[derive(Debug, Clone)]
pub struct ValidatorInfo {
    pub moniker: String,
    pub home: PathBuf,
    pub consensus_key: PublicKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AccountEntry {
    account: BaseAccount,
    coins: Coins,
    /// Sequence the next accepted transaction must carry
    next_sequence: u64,
}

struct ChainState {
    height: u64,
    accounts: HashMap<String, AccountEntry>,
    mempool: Vec<SignedTx>,
    committed: HashMap<String, u64>,
    apps: Vec<Box<dyn Application>>,
    /// Set when block production stopped on an error
    halted: Option<String>,
}

struct Shared {
    state: Mutex<ChainState>,
    new_block: Condvar,
}

impl Shared {
    fn lock(&self) -> Result<MutexGuard<'_, ChainState>> {
        self.state.lock().map_err(poisoned)
    }

    fn halt(&self, reason: String) {
        if let Ok(mut state) = self.state.lock() {
            state.halted = Some(reason);
        }
        self.new_block.notify_all();
    }
}

fn poisoned<T>(_: PoisonError<T>) -> TestnetError {
    TestnetError::Harness("chain state lock poisoned".to_string())
}

/// Harness running every validator inside the current process
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalHarness;

impl LocalHarness {
    pub fn new() -> LocalHarness {
        LocalHarness
    }
}

impl NetworkHarness for LocalHarness {
    type Handle = LocalHandle;

    fn start(
        &self,
        config: &NetworkConfig,
        app_factory: Arc<dyn ApplicationFactory>,
    ) -> Result<LocalHandle> {
        let network_id = Uuid::new_v4();
        let base_dir = tempfile::Builder::new()
            .prefix(&format!("{}-", config.chain_id))
            .tempdir()?;
        info!(
            "Network {network_id} for {} in {}",
            config.chain_id,
            base_dir.path().display()
        );

        let genesis_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TestnetError::Harness(e.to_string()))?
            .as_secs();
        let genesis_doc = GenesisDoc::new(&config.chain_id, genesis_time, &config.genesis_state)?;
        let genesis_json = genesis_doc.to_json_pretty()?;
        let app_toml = toml::to_string(&AppToml::from_config(config))?;

        let mut validators = Vec::with_capacity(config.num_validators);
        let mut apps = Vec::with_capacity(config.num_validators);
        for index in 0..config.num_validators {
            let moniker = format!("node{index}");
            let home = base_dir.path().join(&moniker);
            let config_dir = home.join(CONFIG_DIR);
            fs::create_dir_all(&config_dir)?;
            fs::write(config_dir.join(GENESIS_FILE), &genesis_json)?;
            fs::write(config_dir.join(APP_CONFIG_FILE), &app_toml)?;

            let consensus = Identity::from_secret(
                &moniker,
                SigningAlgorithm::Ed25519,
                random_bytes(CONSENSUS_SEED_LEN),
            )?;
            let key_file = ConsensusKeyFile {
                address: consensus.address(),
                pub_key: consensus.public_key(),
            };
            fs::write(
                config_dir.join(CONSENSUS_KEY_FILE),
                serde_json::to_string_pretty(&key_file)?,
            )?;

            let ctx = AppContext {
                index,
                moniker: moniker.clone(),
                chain_id: config.chain_id.clone(),
                home: home.clone(),
                consensus_key: consensus.public_key().clone(),
                pruning: config.pruning_strategy,
                min_gas_prices: config.min_gas_prices.clone(),
            };
            let mut app = app_factory.new_app(&ctx)?;
            app.init_chain(&config.chain_id, &config.genesis_state)?;
            apps.push(app);

            debug!("Validator {moniker} initialized at {}", home.display());
            validators.push(ValidatorInfo {
                moniker,
                home,
                consensus_key: consensus.public_key().clone(),
            });
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(ChainState {
                height: 0,
                accounts: load_accounts(config, &config.genesis_state)?,
                mempool: Vec::new(),
                committed: HashMap::new(),
                apps,
                halted: None,
            }),
            new_block: Condvar::new(),
        });

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let producer_shared = Arc::clone(&shared);
        let timeout_commit = config.timeout_commit;
        let producer = thread::Builder::new()
            .name(format!("{}-blocks", config.chain_id))
            .spawn(move || loop {
                match stop_rx.recv_timeout(timeout_commit) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(e) = commit_block(&producer_shared) {
                            error!("Block production stopped: {e}");
                            producer_shared.halt(e.to_string());
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(LocalHandle {
            network_id,
            chain_id: config.chain_id.clone(),
            cleanup_dir: config.cleanup_dir,
            base_dir: Some(base_dir),
            kept_dir: None,
            validators,
            shared,
            stop_tx: Some(stop_tx),
            producer: Some(producer),
        })
    }
}

/// Accounts and balances as recorded in the auth and bank sections. Entries of
/// account types the registry cannot decode are left out.
fn load_accounts(
    config: &NetworkConfig,
    genesis: &GenesisState,
) -> Result<HashMap<String, AccountEntry>> {
    let codec = config.encoding.codec();
    let auth: AuthGenesisState = genesis.get(&codec)?;
    let bank: BankGenesisState = genesis.get(&codec)?;

    let registry = config.encoding.registry();
    let mut accounts = HashMap::new();
    for packed in &auth.accounts {
        if !registry.supports_account(&packed.type_url) {
            debug!("Skipping genesis account of type {}", packed.type_url);
            continue;
        }
        let account = registry.unpack_account(packed)?;
        let coins = bank
            .balance_of(&account.address)
            .map(|balance| balance.coins.clone())
            .unwrap_or_default();
        accounts.insert(
            account.address.clone(),
            AccountEntry {
                next_sequence: account.sequence,
                account,
                coins,
            },
        );
    }
    Ok(accounts)
}

fn commit_block(shared: &Shared) -> Result<()> {
    let mut state = shared.lock()?;
    let height = state.height + 1;
    let txs = std::mem::take(&mut state.mempool);

    for app in state.apps.iter_mut() {
        app.finalize_block(height, &txs)?;
    }
    for tx in &txs {
        if let Some(entry) = state.accounts.get_mut(&tx.body().signer) {
            entry.account.sequence = tx.body().sequence + 1;
            if entry.account.pub_key.is_none() {
                entry.account.pub_key = tx.public_key().ok();
            }
        }
        state.committed.insert(tx.hash()?, height);
    }
    state.height = height;
    drop(state);

    if !txs.is_empty() {
        debug!("Committed block {height} with {} transactions", txs.len());
    }
    shared.new_block.notify_all();
    Ok(())
}

/// Running local network
pub struct LocalHandle {
    network_id: Uuid,
    chain_id: String,
    cleanup_dir: bool,
    base_dir: Option<TempDir>,
    kept_dir: Option<PathBuf>,
    validators: Vec<ValidatorInfo>,
    shared: Arc<Shared>,
    stop_tx: Option<Sender<()>>,
    producer: Option<JoinHandle<()>>,
}

impl LocalHandle {
    pub fn network_id(&self) -> Uuid {
        self.network_id
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn validators(&self) -> &[ValidatorInfo] {
        &self.validators
    }

    /// Base directory holding every validator home; after a stop with
    /// cleanup disabled this is the directory left on disk
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir
            .as_ref()
            .map(|dir| dir.path())
            .or(self.kept_dir.as_deref())
    }

    pub fn is_running(&self) -> bool {
        self.producer.is_some()
    }

    pub fn latest_height(&self) -> Result<u64> {
        Ok(self.shared.lock()?.height)
    }

    /// Block until `height` is committed, or fail after `timeout`. A timeout
    /// too large to represent as a deadline waits without one.
    pub fn wait_for_height(&self, height: u64, timeout: Duration) -> Result<u64> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.shared.lock()?;
        while state.height < height {
            if let Some(reason) = &state.halted {
                return Err(TestnetError::Harness(format!(
                    "{} halted at height {}: {reason}",
                    self.chain_id, state.height
                )));
            }
            if !self.is_running() {
                return Err(TestnetError::Harness(format!(
                    "{} is stopped at height {}",
                    self.chain_id, state.height
                )));
            }
            state = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(TestnetError::Harness(format!(
                            "timed out waiting for height {height}, latest is {}",
                            state.height
                        )));
                    }
                    let (guard, _) = self
                        .shared
                        .new_block
                        .wait_timeout(state, remaining)
                        .map_err(poisoned)?;
                    guard
                }
                None => self.shared.new_block.wait(state).map_err(poisoned)?,
            };
        }
        Ok(state.height)
    }

    pub fn account(&self, address: &str) -> Result<Option<BaseAccount>> {
        let state = self.shared.lock()?;
        Ok(state.accounts.get(address).map(|entry| entry.account.clone()))
    }

    pub fn balance(&self, address: &str, denom: &str) -> Result<u64> {
        let state = self.shared.lock()?;
        Ok(state
            .accounts
            .get(address)
            .map(|entry| entry.coins.amount_of(denom))
            .unwrap_or(0))
    }

    /// Height at which the transaction with this hash was committed
    pub fn committed_height(&self, tx_hash: &str) -> Result<Option<u64>> {
        Ok(self.shared.lock()?.committed.get(tx_hash).copied())
    }

    /// Queue a transaction for the next block and return its hash
    pub fn broadcast_tx(&self, tx: SignedTx) -> Result<String> {
        if !self.is_running() {
            return Err(TestnetError::Harness(format!("{} is stopped", self.chain_id)));
        }
        let body = tx.body();
        if body.chain_id != self.chain_id {
            return Err(TestnetError::InvalidTransaction(format!(
                "chain ID {} does not match {}",
                body.chain_id, self.chain_id
            )));
        }

        let mut state = self.shared.lock()?;
        if let Some(reason) = &state.halted {
            return Err(TestnetError::Harness(format!(
                "{} halted: {reason}",
                self.chain_id
            )));
        }
        let entry = state.accounts.get_mut(&body.signer).ok_or_else(|| {
            TestnetError::InvalidTransaction(format!("unknown signer {}", body.signer))
        })?;
        if let Some(registered) = &entry.account.pub_key {
            if tx.public_key()? != *registered {
                return Err(TestnetError::InvalidTransaction(format!(
                    "public key does not match account {}",
                    body.signer
                )));
            }
        }
        tx.verify()?;
        if body.sequence != entry.next_sequence {
            return Err(TestnetError::InvalidTransaction(format!(
                "account {} expects sequence {}, got {}",
                body.signer, entry.next_sequence, body.sequence
            )));
        }
        entry.next_sequence += 1;

        let hash = tx.hash()?;
        debug!("Accepted transaction {hash} from {}", body.signer);
        state.mempool.push(tx);
        Ok(hash)
    }

    pub fn broadcast_tx_bytes(&self, bytes: &[u8]) -> Result<String> {
        let tx = SignedTx::from_bytes(bytes)
            .map_err(|e| TestnetError::InvalidTransaction(e.to_string()))?;
        self.broadcast_tx(tx)
    }

    fn release_dir(&mut self) -> Result<()> {
        let Some(base_dir) = self.base_dir.take() else {
            return Ok(());
        };
        if self.cleanup_dir {
            base_dir.close()?;
        } else {
            let kept = base_dir.into_path();
            warn!("Keeping validator directories in {}", kept.display());
            self.kept_dir = Some(kept);
        }
        Ok(())
    }
}

impl NetworkHandle for LocalHandle {
    fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            // The producer may already have exited on its own
            let _ = stop_tx.send(());
        }
        if let Some(producer) = self.producer.take() {
            producer.join().map_err(|_| {
                TestnetError::Harness(format!("block producer of {} panicked", self.chain_id))
            })?;
            self.shared.new_block.notify_all();
            info!("Network {} stopped", self.network_id);
        }
        self.release_dir()
    }
}

impl Drop for LocalHandle {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("Failed to stop network {}: {e}", self.network_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DecCoin, TxBody, GENESIS_ACCOUNT_FUNDS};
    use crate::genesis::Any;
    use crate::testnet::{fast_config, funded_config, RecordingAppFactory};

    const WAIT: Duration = Duration::from_secs(10);

    #[test]
    fn test_validator_homes_written() {
        let config = fast_config().with_num_validators(2);
        let factory = Arc::new(RecordingAppFactory::default());
        let mut handle = LocalHarness::new().start(&config, factory.clone()).unwrap();

        assert_eq!(handle.validators().len(), 2);
        for validator in handle.validators() {
            let config_dir = validator.home.join(CONFIG_DIR);
            let genesis = fs::read_to_string(config_dir.join(GENESIS_FILE)).unwrap();
            let doc: GenesisDoc = serde_json::from_str(&genesis).unwrap();
            assert_eq!(doc.chain_id, config.chain_id);
            assert_eq!(doc.initial_height, 1);

            let app: AppToml =
                toml::from_str(&fs::read_to_string(config_dir.join(APP_CONFIG_FILE)).unwrap())
                    .unwrap();
            assert_eq!(app.pruning, PruningStrategy::Nothing);
            assert_eq!(app.minimum_gas_prices, "0.000006stake");
            assert!(config_dir.join(CONSENSUS_KEY_FILE).exists());
            assert_eq!(validator.consensus_key.algorithm, SigningAlgorithm::Ed25519);
        }
        assert_ne!(
            handle.validators()[0].consensus_key,
            handle.validators()[1].consensus_key
        );
        assert_eq!(factory.init_count(), 2);

        let base = handle.base_dir().unwrap().to_path_buf();
        handle.stop().unwrap();
        assert!(!base.exists());
    }

    #[test]
    fn test_blocks_are_produced() {
        let config = fast_config();
        let factory = Arc::new(RecordingAppFactory::default());
        let mut handle = LocalHarness::new().start(&config, factory.clone()).unwrap();

        assert!(handle.wait_for_height(3, WAIT).unwrap() >= 3);
        handle.stop().unwrap();
        assert!(factory.max_height() >= 3);
        assert!(handle.wait_for_height(u64::MAX, WAIT).is_err());
    }

    #[test]
    fn test_genesis_balances_visible() {
        let (config, keyring) = funded_config(&["alice"]);
        let alice = keyring.get("alice").unwrap().address();
        let handle = LocalHarness::new()
            .start(&config, Arc::new(RecordingAppFactory::default()))
            .unwrap();

        assert_eq!(
            handle.balance(&alice, "alicetoken").unwrap(),
            GENESIS_ACCOUNT_FUNDS
        );
        assert_eq!(handle.balance(&alice, "stake").unwrap(), GENESIS_ACCOUNT_FUNDS);
        assert_eq!(handle.balance(&alice, "bobtoken").unwrap(), 0);
        assert_eq!(handle.account(&alice).unwrap().unwrap().account_number, 0);
        assert!(handle.account("nobody").unwrap().is_none());
    }

    #[test]
    fn test_transaction_committed() {
        let (config, keyring) = funded_config(&["alice"]);
        let factory = Arc::new(RecordingAppFactory::default());
        let handle = LocalHarness::new().start(&config, factory.clone()).unwrap();

        let alice = keyring.get("alice").unwrap();
        let body = TxBody::new(&config.chain_id, &alice.address(), 0, b"hello".to_vec());
        let tx = SignedTx::sign(alice, body).unwrap();
        let hash = handle.broadcast_tx_bytes(&tx.to_bytes().unwrap()).unwrap();

        let start = handle.latest_height().unwrap();
        handle.wait_for_height(start + 2, WAIT).unwrap();
        assert!(handle.committed_height(&hash).unwrap().is_some());
        assert_eq!(handle.account(&alice.address()).unwrap().unwrap().sequence, 1);
        assert_eq!(factory.tx_hashes(), vec![hash]);
    }

    #[test]
    fn test_rejects_bad_transactions() {
        let (config, mut keyring) = funded_config(&["alice"]);
        let handle = LocalHarness::new()
            .start(&config, Arc::new(RecordingAppFactory::default()))
            .unwrap();
        let alice = keyring.get("alice").unwrap().clone();

        let wrong_chain = TxBody::new("other-chain", &alice.address(), 0, vec![]);
        let result = handle.broadcast_tx(SignedTx::sign(&alice, wrong_chain).unwrap());
        assert!(matches!(result, Err(TestnetError::InvalidTransaction(_))));

        let stranger = keyring.create_identity("mallory").unwrap();
        let unknown = TxBody::new(&config.chain_id, &stranger.address(), 0, vec![]);
        let result = handle.broadcast_tx(SignedTx::sign(&stranger, unknown).unwrap());
        assert!(matches!(result, Err(TestnetError::InvalidTransaction(_))));

        // mallory signing for alice's account
        let forged = TxBody::new(&config.chain_id, &alice.address(), 0, vec![]);
        let result = handle.broadcast_tx(SignedTx::sign(&stranger, forged).unwrap());
        assert!(matches!(result, Err(TestnetError::InvalidTransaction(_))));

        let out_of_order = TxBody::new(&config.chain_id, &alice.address(), 5, vec![]);
        let result = handle.broadcast_tx(SignedTx::sign(&alice, out_of_order).unwrap());
        assert!(matches!(result, Err(TestnetError::InvalidTransaction(_))));

        assert!(matches!(
            handle.broadcast_tx_bytes(b"garbage"),
            Err(TestnetError::InvalidTransaction(_))
        ));
    }

    #[test]
    fn test_keep_dirs_and_double_stop() {
        let config = fast_config().with_cleanup_dir(false);
        let mut handle = LocalHarness::new()
            .start(&config, Arc::new(RecordingAppFactory::default()))
            .unwrap();

        handle.stop().unwrap();
        handle.stop().unwrap();
        assert!(!handle.is_running());

        let kept = handle.base_dir().unwrap().to_path_buf();
        assert!(kept.join("node0").join(CONFIG_DIR).join(GENESIS_FILE).exists());
        fs::remove_dir_all(kept).unwrap();
    }

    #[test]
    fn test_failing_app_aborts_start() {
        let config = fast_config();
        let factory = Arc::new(RecordingAppFactory::failing_init());
        let result = LocalHarness::new().start(&config, factory);
        assert!(matches!(result, Err(TestnetError::Harness(_))));
    }

    #[test]
    fn test_unbounded_wait() {
        let handle = LocalHarness::new()
            .start(&fast_config(), Arc::new(RecordingAppFactory::default()))
            .unwrap();
        assert!(handle.wait_for_height(1, Duration::MAX).unwrap() >= 1);
    }

    #[test]
    fn test_halted_chain_ends_wait() {
        let (config, keyring) = funded_config(&["alice"]);
        let factory = Arc::new(RecordingAppFactory::failing_finalize());
        let mut handle = LocalHarness::new().start(&config, factory).unwrap();

        let result = handle.wait_for_height(5, Duration::MAX);
        assert!(matches!(result, Err(TestnetError::Harness(_))));
        assert_eq!(handle.latest_height().unwrap(), 0);

        let alice = keyring.get("alice").unwrap();
        let body = TxBody::new(&config.chain_id, &alice.address(), 0, vec![]);
        let result = handle.broadcast_tx(SignedTx::sign(alice, body).unwrap());
        assert!(matches!(result, Err(TestnetError::Harness(_))));
        handle.stop().unwrap();
    }

    #[test]
    fn test_apps_see_node_settings() {
        let config = fast_config()
            .with_num_validators(2)
            .with_pruning(PruningStrategy::Everything);
        let factory = Arc::new(RecordingAppFactory::default());
        let _handle = LocalHarness::new().start(&config, factory.clone()).unwrap();

        let expected = DecCoin::new("0.000006", "stake").unwrap();
        assert_eq!(
            factory.node_settings(),
            vec![
                (PruningStrategy::Everything, expected.clone()),
                (PruningStrategy::Everything, expected),
            ]
        );
    }

    #[test]
    fn test_unsupported_account_types_skipped() {
        let (mut config, keyring) = funded_config(&["alice"]);
        let codec = config.encoding.codec();
        config
            .genesis_state
            .update::<AuthGenesisState, _>(&codec, |auth| {
                let value = serde_json::from_value(serde_json::json!({
                    "name": "bonded",
                    "address": "x",
                    "permissions": ["burner"],
                    "account_number": 3,
                }))?;
                auth.accounts.insert(
                    0,
                    Any {
                        type_url: "/auth.ModuleAccount".to_string(),
                        value,
                    },
                );
                Ok(())
            })
            .unwrap();

        let handle = LocalHarness::new()
            .start(&config, Arc::new(RecordingAppFactory::default()))
            .unwrap();
        let alice = keyring.get("alice").unwrap().address();
        assert_eq!(handle.balance(&alice, "stake").unwrap(), GENESIS_ACCOUNT_FUNDS);
        assert!(handle.account("x").unwrap().is_none());
    }
}
