use crate::config::ModuleBasic;
use crate::error::{Result, TestnetError};
use crate::genesis::{Any, GenesisModule, JsonCodec};
use crate::wallet::{pub_key_hash_from_address, Identity, PublicKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MODULE_NAME: &str = "auth";
pub const BASE_ACCOUNT_TYPE_URL: &str = "/auth.BaseAccount";

/// Account registered directly in genesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseAccount {
    pub address: String,
    pub pub_key: Option<PublicKey>,
    pub account_number: u64,
    pub sequence: u64,
}

pub type GenesisAccount = BaseAccount;

impl BaseAccount {
    pub fn new(
        address: String,
        pub_key: Option<PublicKey>,
        account_number: u64,
        sequence: u64,
    ) -> BaseAccount {
        BaseAccount {
            address,
            pub_key,
            account_number,
            sequence,
        }
    }

    /// Fresh account for an identity; account and sequence numbers start at 0
    /// since no transaction created it
    pub fn from_identity(identity: &Identity) -> BaseAccount {
        BaseAccount::new(
            identity.address(),
            Some(identity.public_key().clone()),
            0,
            0,
        )
    }

    pub fn validate(&self) -> Result<()> {
        pub_key_hash_from_address(&self.address)?;
        if let Some(pub_key) = &self.pub_key {
            if pub_key.address() != self.address {
                return Err(TestnetError::InvalidAddress(format!(
                    "{}: public key does not match address",
                    self.address
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthParams {
    pub max_memo_characters: u64,
    pub tx_sig_limit: u64,
    pub tx_size_cost_per_byte: u64,
    pub sig_verify_cost_ed25519: u64,
    pub sig_verify_cost_secp256k1: u64,
}

impl Default for AuthParams {
    fn default() -> Self {
        Self {
            max_memo_characters: 256,
            tx_sig_limit: 7,
            tx_size_cost_per_byte: 10,
            sig_verify_cost_ed25519: 590,
            sig_verify_cost_secp256k1: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthGenesisState {
    #[serde(default)]
    pub params: AuthParams,
    #[serde(default)]
    pub accounts: Vec<Any>,
    /// Fields this crate does not model. They survive a typed round trip as
    /// values, but key order and number precision are not preserved.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenesisModule for AuthGenesisState {
    const MODULE_NAME: &'static str = MODULE_NAME;
}

#[derive(Debug)]
pub struct AuthModule;

impl ModuleBasic for AuthModule {
    fn name(&self) -> &str {
        MODULE_NAME
    }

    fn default_genesis(&self, codec: &JsonCodec) -> Result<Vec<u8>> {
        codec.marshal_json(&AuthGenesisState::default())
    }
}
