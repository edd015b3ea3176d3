use crate::error::{Result, TestnetError};
use crate::utils;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SECRET_KEY_LEN: usize = 32;

/// Signing schemes the keyring can derive keys for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningAlgorithm {
    #[default]
    Secp256k1,
    Ed25519,
}

impl SigningAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            SigningAlgorithm::Secp256k1 => "secp256k1",
            SigningAlgorithm::Ed25519 => "ed25519",
        }
    }

    /// Interface type URL of public keys of this scheme
    pub fn type_url(&self) -> &'static str {
        match self {
            SigningAlgorithm::Secp256k1 => "/crypto.secp256k1.PubKey",
            SigningAlgorithm::Ed25519 => "/crypto.ed25519.PubKey",
        }
    }

    pub fn from_type_url(type_url: &str) -> Option<SigningAlgorithm> {
        match type_url {
            "/crypto.secp256k1.PubKey" => Some(SigningAlgorithm::Secp256k1),
            "/crypto.ed25519.PubKey" => Some(SigningAlgorithm::Ed25519),
            _ => None,
        }
    }

    fn master_key_domain(&self) -> &'static [u8] {
        match self {
            SigningAlgorithm::Secp256k1 => b"Bitcoin seed",
            SigningAlgorithm::Ed25519 => b"ed25519 seed",
        }
    }

    /// Master secret for a BIP-39 seed: left half of HMAC-SHA512(domain, seed)
    pub fn derive_secret(&self, seed: &[u8]) -> Result<Vec<u8>> {
        let mac = utils::hmac_sha512(self.master_key_domain(), seed);
        let secret = mac[..SECRET_KEY_LEN].to_vec();
        // secp256k1 scalars must be non-zero and below the curve order
        self.public_key_bytes(&secret)?;
        Ok(secret)
    }

    pub fn public_key_bytes(&self, secret: &[u8]) -> Result<Vec<u8>> {
        match self {
            SigningAlgorithm::Secp256k1 => utils::secp256k1_public_key(secret),
            SigningAlgorithm::Ed25519 => utils::ed25519_public_key(secret),
        }
    }

    pub fn sign(&self, secret: &[u8], message: &[u8]) -> Result<Vec<u8>> {
        match self {
            SigningAlgorithm::Secp256k1 => utils::secp256k1_sign(secret, message),
            SigningAlgorithm::Ed25519 => utils::ed25519_sign(secret, message),
        }
    }

    pub fn verify(&self, public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
        match self {
            SigningAlgorithm::Secp256k1 => utils::secp256k1_verify(public_key, signature, message),
            SigningAlgorithm::Ed25519 => utils::ed25519_verify(public_key, signature, message),
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = TestnetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "secp256k1" => Ok(SigningAlgorithm::Secp256k1),
            "ed25519" => Ok(SigningAlgorithm::Ed25519),
            _ => Err(TestnetError::KeyDerivation(format!(
                "Unsupported signing algorithm: {s}. Valid options: secp256k1, ed25519"
            ))),
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
