use crate::config::ModuleBasic;
use crate::error::Result;
use crate::genesis::{GenesisModule, JsonCodec};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MODULE_NAME: &str = "staking";

const DEFAULT_UNBONDING_TIME_SECS: u64 = 3 * 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingParams {
    pub unbonding_time_secs: u64,
    pub max_validators: u32,
    pub max_entries: u32,
    pub historical_entries: u32,
    pub bond_denom: String,
}

impl StakingParams {
    pub fn new(bond_denom: &str) -> StakingParams {
        StakingParams {
            unbonding_time_secs: DEFAULT_UNBONDING_TIME_SECS,
            max_validators: 100,
            max_entries: 7,
            historical_entries: 10_000,
            bond_denom: bond_denom.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakingGenesisState {
    pub params: StakingParams,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenesisModule for StakingGenesisState {
    const MODULE_NAME: &'static str = MODULE_NAME;
}

/// Staking section; carries the bond denomination
#[derive(Debug)]
pub struct StakingModule {
    bond_denom: String,
}

impl StakingModule {
    pub fn new(bond_denom: &str) -> StakingModule {
        StakingModule {
            bond_denom: bond_denom.to_string(),
        }
    }
}

impl ModuleBasic for StakingModule {
    fn name(&self) -> &str {
        MODULE_NAME
    }

    fn default_genesis(&self, codec: &JsonCodec) -> Result<Vec<u8>> {
        codec.marshal_json(&StakingGenesisState {
            params: StakingParams::new(&self.bond_denom),
            extra: Map::new(),
        })
    }
}

/// Module whose default section is a fixed JSON value and which this crate
/// never decodes
#[derive(Debug)]
pub struct OpaqueModule {
    name: String,
    default_state: Value,
}

impl OpaqueModule {
    pub fn new(name: &str, default_state: Value) -> OpaqueModule {
        OpaqueModule {
            name: name.to_string(),
            default_state,
        }
    }
}

impl ModuleBasic for OpaqueModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_genesis(&self, codec: &JsonCodec) -> Result<Vec<u8>> {
        codec.marshal_json(&self.default_state)
    }
}
