//! Test utilities for network testing

use crate::config::{NetworkConfig, PruningStrategy};
use crate::core::{DecCoin, SignedTx, GENESIS_ACCOUNT_FUNDS};
use crate::error::{Result, TestnetError};
use crate::genesis::{add_genesis_accounts, GenesisAccountFactory, GenesisState};
use crate::network::{AppContext, Application, ApplicationFactory, NetworkHandle, NetworkHarness};
use crate::wallet::Keyring;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Commit interval short enough for tests to reach a few heights quickly
pub const FAST_COMMIT: Duration = Duration::from_millis(20);

/// Default configuration with a fast block time
pub fn fast_config() -> NetworkConfig {
    NetworkConfig::default_config()
        .unwrap()
        .with_timeout_commit(FAST_COMMIT)
}

/// Fast configuration with a funded genesis account per name
pub fn funded_config(names: &[&str]) -> (NetworkConfig, Keyring) {
    let config = fast_config();
    let mut keyring = Keyring::new(config.signing_algo);
    let (accounts, balances) = GenesisAccountFactory::new(&config.bond_denom)
        .build_accounts(&mut keyring, names, GENESIS_ACCOUNT_FUNDS)
        .unwrap();
    let config = add_genesis_accounts(config, &accounts, &balances).unwrap();
    (config, keyring)
}

#[derive(Debug, Default)]
struct Record {
    // (pruning, minimum gas price) per app built
    settings: Vec<(PruningStrategy, DecCoin)>,
    chain_ids: Vec<String>,
    max_height: u64,
    // (validator index, tx hash)
    txs: Vec<(usize, String)>,
}

/// Application factory whose apps record what they are fed
#[derive(Debug, Default)]
pub struct RecordingAppFactory {
    record: Arc<Mutex<Record>>,
    fail_init: bool,
    fail_finalize: bool,
}

impl RecordingAppFactory {
    /// Factory whose apps reject `init_chain`
    pub fn failing_init() -> RecordingAppFactory {
        RecordingAppFactory {
            fail_init: true,
            ..Default::default()
        }
    }

    /// Factory whose apps reject every block
    pub fn failing_finalize() -> RecordingAppFactory {
        RecordingAppFactory {
            fail_finalize: true,
            ..Default::default()
        }
    }

    pub fn node_settings(&self) -> Vec<(PruningStrategy, DecCoin)> {
        self.record.lock().unwrap().settings.clone()
    }

    pub fn init_count(&self) -> usize {
        self.record.lock().unwrap().chain_ids.len()
    }

    pub fn max_height(&self) -> u64 {
        self.record.lock().unwrap().max_height
    }

    /// Hashes of the transactions finalized by the first validator
    pub fn tx_hashes(&self) -> Vec<String> {
        self.record
            .lock()
            .unwrap()
            .txs
            .iter()
            .filter(|(index, _)| *index == 0)
            .map(|(_, hash)| hash.clone())
            .collect()
    }
}

impl ApplicationFactory for RecordingAppFactory {
    fn new_app(&self, ctx: &AppContext) -> Result<Box<dyn Application>> {
        self.record
            .lock()
            .unwrap()
            .settings
            .push((ctx.pruning, ctx.min_gas_prices.clone()));
        Ok(Box::new(RecordingApp {
            index: ctx.index,
            record: Arc::clone(&self.record),
            fail_init: self.fail_init,
            fail_finalize: self.fail_finalize,
        }))
    }
}

struct RecordingApp {
    index: usize,
    record: Arc<Mutex<Record>>,
    fail_init: bool,
    fail_finalize: bool,
}

impl Application for RecordingApp {
    fn init_chain(&mut self, chain_id: &str, genesis: &GenesisState) -> Result<()> {
        if self.fail_init {
            return Err(TestnetError::Harness(format!(
                "app {} refused genesis",
                self.index
            )));
        }
        assert!(genesis.contains("auth"));
        self.record
            .lock()
            .unwrap()
            .chain_ids
            .push(chain_id.to_string());
        Ok(())
    }

    fn finalize_block(&mut self, height: u64, txs: &[SignedTx]) -> Result<()> {
        if self.fail_finalize {
            return Err(TestnetError::Harness(format!(
                "app {} rejected block {height}",
                self.index
            )));
        }
        let mut record = self.record.lock().unwrap();
        record.max_height = record.max_height.max(height);
        for tx in txs {
            let hash = tx.hash()?;
            record.txs.push((self.index, hash));
        }
        Ok(())
    }
}

/// Harness that only records what it was asked to start
#[derive(Debug, Default, Clone)]
pub struct StubHarness {
    started: Arc<Mutex<Option<NetworkConfig>>>,
    stops: Arc<Mutex<usize>>,
}

impl StubHarness {
    pub fn started_config(&self) -> Option<NetworkConfig> {
        self.started.lock().unwrap().clone()
    }

    pub fn stop_count(&self) -> usize {
        *self.stops.lock().unwrap()
    }
}

pub struct StubHandle {
    stops: Arc<Mutex<usize>>,
    running: bool,
}

impl NetworkHarness for StubHarness {
    type Handle = StubHandle;

    fn start(
        &self,
        config: &NetworkConfig,
        _app_factory: Arc<dyn ApplicationFactory>,
    ) -> Result<StubHandle> {
        *self.started.lock().unwrap() = Some(config.clone());
        Ok(StubHandle {
            stops: Arc::clone(&self.stops),
            running: true,
        })
    }
}

impl NetworkHandle for StubHandle {
    fn stop(&mut self) -> Result<()> {
        if self.running {
            self.running = false;
            *self.stops.lock().unwrap() += 1;
        }
        Ok(())
    }
}
