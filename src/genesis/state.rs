use crate::error::{Result, TestnetError};
use crate::genesis::{JsonCodec, RawSection};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A module section with a known shape
pub trait GenesisModule: Serialize + DeserializeOwned {
    const MODULE_NAME: &'static str;
}

/// Genesis state: module name -> serialized module section
///
/// Sections without a typed accessor are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenesisState {
    modules: BTreeMap<String, Vec<u8>>,
}

impl GenesisState {
    pub fn new() -> GenesisState {
        GenesisState::default()
    }

    pub fn insert_raw(&mut self, module: &str, bytes: Vec<u8>) {
        self.modules.insert(module.to_string(), bytes);
    }

    pub fn raw(&self, module: &str) -> Option<&[u8]> {
        self.modules.get(module).map(Vec::as_slice)
    }

    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn section_bytes(&self, module: &str) -> Result<&[u8]> {
        self.raw(module).ok_or_else(|| TestnetError::GenesisDecode {
            module: module.to_string(),
            reason: "module section is missing".to_string(),
        })
    }

    /// Decode the section of module `M`
    pub fn get<M: GenesisModule>(&self, codec: &JsonCodec) -> Result<M> {
        codec.unmarshal_json(M::MODULE_NAME, self.section_bytes(M::MODULE_NAME)?)
    }

    /// The section of `module` with its field values left undecoded
    pub fn raw_section(&self, module: &str) -> Result<RawSection> {
        RawSection::decode(module, self.section_bytes(module)?)
    }

    /// Encode `state` as the section of module `M`
    pub fn set<M: GenesisModule>(&mut self, codec: &JsonCodec, state: &M) -> Result<()> {
        let bytes = codec.marshal_json(state)?;
        self.modules.insert(M::MODULE_NAME.to_string(), bytes);
        Ok(())
    }

    /// Decode, mutate and re-encode one section. The stored bytes only change
    /// if `f` succeeds.
    pub fn update<M, F>(&mut self, codec: &JsonCodec, f: F) -> Result<()>
    where
        M: GenesisModule,
        F: FnOnce(&mut M) -> Result<()>,
    {
        let mut state: M = self.get(codec)?;
        f(&mut state)?;
        self.set(codec, &state)
    }

    /// All sections as one JSON object, the `app_state` of a genesis document
    pub fn to_app_state(&self) -> Result<Value> {
        let mut app_state = Map::new();
        for (module, bytes) in &self.modules {
            let value: Value =
                serde_json::from_slice(bytes).map_err(|e| TestnetError::GenesisDecode {
                    module: module.clone(),
                    reason: e.to_string(),
                })?;
            app_state.insert(module.clone(), value);
        }
        Ok(Value::Object(app_state))
    }

    /// Rebuild a genesis state from an `app_state` object
    pub fn from_app_state(app_state: &Value) -> Result<GenesisState> {
        let object = app_state.as_object().ok_or_else(|| {
            TestnetError::Serialization("app_state must be a JSON object".to_string())
        })?;
        let mut state = GenesisState::new();
        for (module, value) in object {
            state.insert_raw(module, serde_json::to_vec(value)?);
        }
        Ok(state)
    }
}

/// Genesis document written into every validator's config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenesisDoc {
    /// Unix seconds
    pub genesis_time: u64,
    pub chain_id: String,
    pub initial_height: u64,
    pub app_state: Value,
}

impl GenesisDoc {
    pub fn new(chain_id: &str, genesis_time: u64, state: &GenesisState) -> Result<GenesisDoc> {
        Ok(GenesisDoc {
            genesis_time,
            chain_id: chain_id.to_string(),
            initial_height: 1,
            app_state: state.to_app_state()?,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn genesis_state(&self) -> Result<GenesisState> {
        GenesisState::from_app_state(&self.app_state)
    }
}
