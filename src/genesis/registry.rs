//! Interface registry and packed (`Any`) values
//!
//! Accounts are stored in the auth section as packed interface values: a JSON
//! object carrying an `"@type"` URL next to the concrete value's fields. Only
//! registered types can be packed.

use crate::error::{Result, TestnetError};
use crate::genesis::auth::{BaseAccount, BASE_ACCOUNT_TYPE_URL, MODULE_NAME as AUTH_MODULE};
use crate::wallet::{PublicKey, SigningAlgorithm};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Packed interface value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Any {
    #[serde(rename = "@type")]
    pub type_url: String,
    #[serde(flatten)]
    pub value: Map<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct PackedBaseAccount {
    address: String,
    pub_key: Option<Any>,
    account_number: u64,
    sequence: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceRegistry {
    public_keys: BTreeSet<String>,
    accounts: BTreeSet<String>,
}

impl InterfaceRegistry {
    /// Registry with no types registered
    pub fn new() -> InterfaceRegistry {
        InterfaceRegistry::default()
    }

    /// Base accounts plus every public key scheme the keyring supports
    pub fn with_defaults() -> InterfaceRegistry {
        let mut registry = InterfaceRegistry::new();
        registry.register_account_type(BASE_ACCOUNT_TYPE_URL);
        registry.register_public_key(SigningAlgorithm::Secp256k1);
        registry.register_public_key(SigningAlgorithm::Ed25519);
        registry
    }

    pub fn register_public_key(&mut self, algorithm: SigningAlgorithm) {
        self.public_keys.insert(algorithm.type_url().to_string());
    }

    pub fn register_account_type(&mut self, type_url: &str) {
        self.accounts.insert(type_url.to_string());
    }

    pub fn is_registered(&self, type_url: &str) -> bool {
        self.public_keys.contains(type_url) || self.accounts.contains(type_url)
    }

    /// Whether `unpack_account` can decode entries of this type
    pub fn supports_account(&self, type_url: &str) -> bool {
        type_url == BASE_ACCOUNT_TYPE_URL && self.accounts.contains(type_url)
    }

    pub fn pack_public_key(&self, owner: &str, public_key: &PublicKey) -> Result<Any> {
        let type_url = public_key.type_url();
        if !self.public_keys.contains(type_url) {
            return Err(TestnetError::AccountPack {
                address: owner.to_string(),
                type_url: type_url.to_string(),
            });
        }
        let mut value = Map::new();
        value.insert("key".to_string(), Value::String(public_key.to_hex()));
        Ok(Any {
            type_url: type_url.to_string(),
            value,
        })
    }

    pub fn pack_account(&self, account: &BaseAccount) -> Result<Any> {
        if !self.accounts.contains(BASE_ACCOUNT_TYPE_URL) {
            return Err(TestnetError::AccountPack {
                address: account.address.clone(),
                type_url: BASE_ACCOUNT_TYPE_URL.to_string(),
            });
        }
        let pub_key = account
            .pub_key
            .as_ref()
            .map(|key| self.pack_public_key(&account.address, key))
            .transpose()?;
        let packed = PackedBaseAccount {
            address: account.address.clone(),
            pub_key,
            account_number: account.account_number,
            sequence: account.sequence,
        };

        match serde_json::to_value(packed)? {
            Value::Object(value) => Ok(Any {
                type_url: BASE_ACCOUNT_TYPE_URL.to_string(),
                value,
            }),
            _ => Err(TestnetError::Serialization(
                "packed account is not a JSON object".to_string(),
            )),
        }
    }

    /// Pack every account, failing on the first unsupported one
    pub fn pack_accounts(&self, accounts: &[BaseAccount]) -> Result<Vec<Any>> {
        accounts
            .iter()
            .map(|account| self.pack_account(account))
            .collect()
    }

    pub fn unpack_account(&self, any: &Any) -> Result<BaseAccount> {
        let decode_error = |reason: String| TestnetError::GenesisDecode {
            module: AUTH_MODULE.to_string(),
            reason,
        };

        if !self.supports_account(&any.type_url) {
            return Err(decode_error(format!(
                "unregistered account type {}",
                any.type_url
            )));
        }
        let packed: PackedBaseAccount = serde_json::from_value(Value::Object(any.value.clone()))
            .map_err(|e| decode_error(e.to_string()))?;

        let pub_key = match packed.pub_key {
            Some(key) => {
                let algorithm = SigningAlgorithm::from_type_url(&key.type_url)
                    .filter(|_| self.public_keys.contains(&key.type_url))
                    .ok_or_else(|| {
                        decode_error(format!("unregistered public key type {}", key.type_url))
                    })?;
                let encoded = key
                    .value
                    .get("key")
                    .and_then(Value::as_str)
                    .ok_or_else(|| decode_error("public key without key field".to_string()))?;
                let bytes = hex::decode(encoded).map_err(|e| decode_error(e.to_string()))?;
                Some(PublicKey::new(algorithm, bytes))
            }
            None => None,
        };

        Ok(BaseAccount {
            address: packed.address,
            pub_key,
            account_number: packed.account_number,
            sequence: packed.sequence,
        })
    }
}
