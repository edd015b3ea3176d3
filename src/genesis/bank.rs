use crate::config::ModuleBasic;
use crate::core::{Coin, Coins};
use crate::error::{Result, TestnetError};
use crate::genesis::{GenesisModule, JsonCodec};
use crate::wallet::validate_address;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

pub const MODULE_NAME: &str = "bank";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub address: String,
    pub coins: Coins,
}

impl Balance {
    pub fn new(address: String, coins: Coins) -> Balance {
        Balance { address, coins }
    }

    pub fn validate(&self) -> Result<()> {
        if !validate_address(&self.address) {
            return Err(TestnetError::InvalidAddress(self.address.clone()));
        }
        self.coins.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankParams {
    pub default_send_enabled: bool,
}

impl Default for BankParams {
    fn default() -> Self {
        Self {
            default_send_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BankGenesisState {
    #[serde(default)]
    pub params: BankParams,
    #[serde(default)]
    pub balances: Vec<Balance>,
    /// Empty means the supply is computed from the balances at chain start
    #[serde(default)]
    pub supply: Coins,
    #[serde(default)]
    pub denom_metadata: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenesisModule for BankGenesisState {
    const MODULE_NAME: &'static str = MODULE_NAME;
}

impl BankGenesisState {
    /// Sum of all balances per denomination
    pub fn total_balances(&self) -> Coins {
        let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
        for balance in &self.balances {
            for coin in balance.coins.iter() {
                let total = totals.entry(coin.denom.as_str()).or_default();
                *total = total.saturating_add(coin.amount);
            }
        }
        Coins::new(
            totals
                .into_iter()
                .map(|(denom, amount)| Coin::new(denom, amount))
                .collect(),
        )
    }

    pub fn balance_of(&self, address: &str) -> Option<&Balance> {
        self.balances.iter().find(|b| b.address == address)
    }

    /// Valid balances, no address listed twice, supply (when set) matches
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for balance in &self.balances {
            balance.validate()?;
            if !seen.insert(balance.address.as_str()) {
                return Err(TestnetError::Config(format!(
                    "duplicate balance for address {}",
                    balance.address
                )));
            }
        }
        if !self.supply.is_empty() && self.supply != self.total_balances() {
            return Err(TestnetError::Config(format!(
                "genesis supply {} does not match total balances {}",
                self.supply,
                self.total_balances()
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct BankModule;

impl ModuleBasic for BankModule {
    fn name(&self) -> &str {
        MODULE_NAME
    }

    fn default_genesis(&self, codec: &JsonCodec) -> Result<Vec<u8>> {
        codec.marshal_json(&BankGenesisState::default())
    }
}
