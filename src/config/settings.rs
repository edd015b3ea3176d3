use crate::config::{EncodingConfig, PruningStrategy};
use crate::core::coins::validate_denom;
use crate::core::monetary::{
    tokens_from_consensus_power, ACCOUNT_POWER, BONDED_POWER, DEFAULT_BOND_DENOM,
    DEFAULT_MIN_GAS_PRICE, DEFAULT_POWER_REDUCTION, STAKING_POWER,
};
use crate::core::DecCoin;
use crate::error::{Result, TestnetError};
use crate::genesis::GenesisState;
use crate::wallet::SigningAlgorithm;
use log::debug;
use rand::Rng;
use std::env;
use std::time::Duration;

pub const CHAIN_ID_KEY: &str = "TESTNET_CHAIN_ID";
pub const NUM_VALIDATORS_KEY: &str = "TESTNET_NUM_VALIDATORS";
pub const KEEP_DIRS_KEY: &str = "TESTNET_KEEP_DIRS";
pub const LOG_KEY: &str = "TESTNET_LOG";

const CHAIN_ID_PREFIX: &str = "chain-";
const CHAIN_ID_SUFFIX_LEN: usize = 6;
const CHAIN_ID_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const MAX_CHAIN_ID_LEN: usize = 50;
const DEFAULT_TIMEOUT_COMMIT: Duration = Duration::from_secs(2);

/// Everything needed to bring up an in-process test network
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub encoding: EncodingConfig,
    pub genesis_state: GenesisState,
    pub timeout_commit: Duration,
    pub chain_id: String,
    pub num_validators: usize,
    pub bond_denom: String,
    pub min_gas_prices: DecCoin,
    pub account_tokens: u64,
    pub staking_tokens: u64,
    pub bonded_tokens: u64,
    pub pruning_strategy: PruningStrategy,
    /// Remove validator directories on teardown
    pub cleanup_dir: bool,
    pub signing_algo: SigningAlgorithm,
    pub enable_logging: bool,
}

/// Shorthand for [`NetworkConfig::default_config`]
pub fn default_config() -> Result<NetworkConfig> {
    NetworkConfig::default_config()
}

/// `chain-` followed by six characters drawn uniformly from `a-z0-9`
pub fn random_chain_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..CHAIN_ID_SUFFIX_LEN)
        .map(|_| char::from(CHAIN_ID_CHARSET[rng.gen_range(0..CHAIN_ID_CHARSET.len())]))
        .collect();
    format!("{CHAIN_ID_PREFIX}{suffix}")
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl NetworkConfig {
    /// Single validator, fresh random chain ID and the default genesis of the
    /// standard module set
    pub fn default_config() -> Result<NetworkConfig> {
        let encoding = EncodingConfig::standard(DEFAULT_BOND_DENOM)?;
        let genesis_state = encoding.default_genesis()?;

        Ok(NetworkConfig {
            encoding,
            genesis_state,
            timeout_commit: DEFAULT_TIMEOUT_COMMIT,
            chain_id: random_chain_id(),
            num_validators: 1,
            bond_denom: DEFAULT_BOND_DENOM.to_string(),
            min_gas_prices: DecCoin::new(DEFAULT_MIN_GAS_PRICE, DEFAULT_BOND_DENOM)?,
            account_tokens: tokens_from_consensus_power(ACCOUNT_POWER, DEFAULT_POWER_REDUCTION),
            staking_tokens: tokens_from_consensus_power(STAKING_POWER, DEFAULT_POWER_REDUCTION),
            bonded_tokens: tokens_from_consensus_power(BONDED_POWER, DEFAULT_POWER_REDUCTION),
            pruning_strategy: PruningStrategy::Nothing,
            cleanup_dir: true,
            signing_algo: SigningAlgorithm::default(),
            enable_logging: false,
        })
    }

    /// Defaults overridden by `TESTNET_*` environment variables
    pub fn from_env() -> Result<NetworkConfig> {
        NetworkConfig::default_config()?.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides<F>(mut self, lookup: F) -> Result<NetworkConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(chain_id) = lookup(CHAIN_ID_KEY) {
            debug!("{CHAIN_ID_KEY} overrides chain ID with {chain_id}");
            self.chain_id = chain_id;
        }
        if let Some(count) = lookup(NUM_VALIDATORS_KEY) {
            self.num_validators = count.trim().parse().map_err(|_| {
                TestnetError::Config(format!("{NUM_VALIDATORS_KEY} is not a number: {count}"))
            })?;
        }
        if let Some(keep) = lookup(KEEP_DIRS_KEY) {
            self.cleanup_dir = !truthy(&keep);
        }
        if let Some(log) = lookup(LOG_KEY) {
            self.enable_logging = truthy(&log);
        }
        Ok(self)
    }

    pub fn with_chain_id(mut self, chain_id: &str) -> NetworkConfig {
        self.chain_id = chain_id.to_string();
        self
    }

    pub fn with_num_validators(mut self, num_validators: usize) -> NetworkConfig {
        self.num_validators = num_validators;
        self
    }

    pub fn with_timeout_commit(mut self, timeout_commit: Duration) -> NetworkConfig {
        self.timeout_commit = timeout_commit;
        self
    }

    pub fn with_pruning(mut self, pruning_strategy: PruningStrategy) -> NetworkConfig {
        self.pruning_strategy = pruning_strategy;
        self
    }

    pub fn with_signing_algo(mut self, signing_algo: SigningAlgorithm) -> NetworkConfig {
        self.signing_algo = signing_algo;
        self
    }

    pub fn with_cleanup_dir(mut self, cleanup_dir: bool) -> NetworkConfig {
        self.cleanup_dir = cleanup_dir;
        self
    }

    pub fn with_logging(mut self, enable_logging: bool) -> NetworkConfig {
        self.enable_logging = enable_logging;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_validators == 0 {
            return Err(TestnetError::Config(
                "a network needs at least one validator".to_string(),
            ));
        }
        validate_chain_id(&self.chain_id)?;
        if self.bonded_tokens > self.staking_tokens || self.staking_tokens > self.account_tokens
        {
            return Err(TestnetError::Config(format!(
                "expected bonded ({}) <= staking ({}) <= account ({}) tokens",
                self.bonded_tokens, self.staking_tokens, self.account_tokens
            )));
        }
        if self.timeout_commit.is_zero() {
            return Err(TestnetError::Config(
                "commit timeout must be positive".to_string(),
            ));
        }
        validate_denom(&self.bond_denom)?;
        validate_denom(&self.min_gas_prices.denom)?;
        Ok(())
    }
}

fn validate_chain_id(chain_id: &str) -> Result<()> {
    if chain_id.is_empty() {
        return Err(TestnetError::Config("chain ID is empty".to_string()));
    }
    if chain_id.len() > MAX_CHAIN_ID_LEN {
        return Err(TestnetError::Config(format!(
            "chain ID {chain_id} is longer than {MAX_CHAIN_ID_LEN} characters"
        )));
    }
    if !chain_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(TestnetError::Config(format!(
            "chain ID {chain_id} contains invalid characters"
        )));
    }
    Ok(())
}
