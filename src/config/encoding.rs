use crate::error::{Result, TestnetError};
use crate::genesis::{
    AuthModule, BankModule, GenesisState, InterfaceRegistry, JsonCodec, OpaqueModule,
    StakingModule,
};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A module of the application under test, as far as genesis is concerned
pub trait ModuleBasic: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn default_genesis(&self, codec: &JsonCodec) -> Result<Vec<u8>>;
}

/// The application's module set; names are unique
#[derive(Debug, Clone)]
pub struct ModuleBasics {
    modules: Vec<Arc<dyn ModuleBasic>>,
}

impl ModuleBasics {
    pub fn new(modules: Vec<Arc<dyn ModuleBasic>>) -> Result<ModuleBasics> {
        let mut seen = HashSet::new();
        for module in &modules {
            if !seen.insert(module.name().to_string()) {
                return Err(TestnetError::Config(format!(
                    "module {} registered twice",
                    module.name()
                )));
            }
        }
        Ok(ModuleBasics { modules })
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Genesis state made of every module's default section
    pub fn default_genesis(&self, codec: &JsonCodec) -> Result<GenesisState> {
        let mut state = GenesisState::new();
        for module in &self.modules {
            state.insert_raw(module.name(), module.default_genesis(codec)?);
        }
        Ok(state)
    }
}

/// Codec, interface registry and module set used to build and read genesis
#[derive(Debug, Clone)]
pub struct EncodingConfig {
    codec: JsonCodec,
    registry: InterfaceRegistry,
    modules: ModuleBasics,
}

impl EncodingConfig {
    pub fn new(modules: Vec<Arc<dyn ModuleBasic>>) -> Result<EncodingConfig> {
        Ok(EncodingConfig {
            codec: JsonCodec,
            registry: InterfaceRegistry::with_defaults(),
            modules: ModuleBasics::new(modules)?,
        })
    }

    /// auth, bank, staking and an empty genutil section
    pub fn standard(bond_denom: &str) -> Result<EncodingConfig> {
        EncodingConfig::new(vec![
            Arc::new(AuthModule),
            Arc::new(BankModule),
            Arc::new(StakingModule::new(bond_denom)),
            Arc::new(OpaqueModule::new(
                "genutil",
                serde_json::json!({ "gen_txs": [] }),
            )),
        ])
    }

    pub fn with_registry(mut self, registry: InterfaceRegistry) -> EncodingConfig {
        self.registry = registry;
        self
    }

    pub fn codec(&self) -> JsonCodec {
        self.codec
    }

    pub fn registry(&self) -> &InterfaceRegistry {
        &self.registry
    }

    pub fn modules(&self) -> &ModuleBasics {
        &self.modules
    }

    pub fn default_genesis(&self) -> Result<GenesisState> {
        self.modules.default_genesis(&self.codec)
    }
}
