use crate::error::{Result, TestnetError};
use crate::utils;
use crate::wallet::SigningAlgorithm;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

const VERSION: u8 = 0x00;
pub const ADDRESS_CHECK_SUM_LEN: usize = 4;
const PUB_KEY_HASH_LEN: usize = 20;

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
struct SecretKey(Vec<u8>);

/// Public half of an identity, tagged with its signing scheme
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    pub algorithm: SigningAlgorithm,
    #[serde(with = "hex")]
    pub key: Vec<u8>,
}

impl PublicKey {
    pub fn new(algorithm: SigningAlgorithm, key: Vec<u8>) -> PublicKey {
        PublicKey { algorithm, key }
    }

    pub fn type_url(&self) -> &'static str {
        self.algorithm.type_url()
    }

    pub fn address(&self) -> String {
        convert_address(&hash_pub_key(&self.key))
    }

    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.algorithm.verify(&self.key, signature, message)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.key)
    }
}

/// Named signing key held by the keyring
#[derive(Clone)]
pub struct Identity {
    name: String,
    secret: SecretKey,
    public_key: PublicKey,
}

impl Identity {
    /// Build an identity from a derived secret key
    pub fn from_secret(
        name: &str,
        algorithm: SigningAlgorithm,
        secret: Vec<u8>,
    ) -> Result<Identity> {
        let key = algorithm.public_key_bytes(&secret)?;
        Ok(Identity {
            name: name.to_string(),
            secret: SecretKey(secret),
            public_key: PublicKey::new(algorithm, key),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.public_key.algorithm
    }

    pub fn address(&self) -> String {
        self.public_key.address()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        self.public_key.algorithm.sign(&self.secret.0, message)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm())
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

pub fn hash_pub_key(pub_key: &[u8]) -> Vec<u8> {
    let pub_key_sha256 = utils::sha256_digest(pub_key);
    utils::ripemd160_digest(pub_key_sha256.as_slice())
}

fn checksum(payload: &[u8]) -> Vec<u8> {
    let first_sha = utils::sha256_digest(payload);
    let second_sha = utils::sha256_digest(first_sha.as_slice());
    second_sha[0..ADDRESS_CHECK_SUM_LEN].to_vec()
}

/// version + pub_key_hash + checksum, base58 encoded
pub fn convert_address(pub_key_hash: &[u8]) -> String {
    let mut payload: Vec<u8> = vec![VERSION];
    payload.extend(pub_key_hash);
    let checksum = checksum(payload.as_slice());
    payload.extend(checksum.as_slice());
    utils::base58_encode(payload.as_slice())
}

pub fn validate_address(address: &str) -> bool {
    pub_key_hash_from_address(address).is_ok()
}

/// Extract the public key hash from an address, verifying version and checksum
pub fn pub_key_hash_from_address(address: &str) -> Result<Vec<u8>> {
    let payload = utils::base58_decode(address)?;
    if payload.len() != 1 + PUB_KEY_HASH_LEN + ADDRESS_CHECK_SUM_LEN {
        return Err(TestnetError::InvalidAddress(format!(
            "{address}: unexpected length {}",
            payload.len()
        )));
    }
    if payload[0] != VERSION {
        return Err(TestnetError::InvalidAddress(format!(
            "{address}: unknown version {}",
            payload[0]
        )));
    }

    let (body, actual_checksum) = payload.split_at(payload.len() - ADDRESS_CHECK_SUM_LEN);
    if checksum(body) != actual_checksum {
        return Err(TestnetError::InvalidAddress(format!(
            "{address}: checksum mismatch"
        )));
    }
    Ok(body[1..].to_vec())
}
