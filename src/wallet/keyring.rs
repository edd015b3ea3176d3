use crate::error::{Result, TestnetError};
use crate::utils;
use crate::wallet::{Identity, SigningAlgorithm};
use bip39::Mnemonic;
use log::debug;
use std::collections::HashMap;

/// Passphrase used when re-importing generated mnemonics
pub const PLACEHOLDER_PASSPHRASE: &str = "1234";

const MNEMONIC_ENTROPY_BYTES: usize = 32;

/// In-memory keyring scoped to one test network
///
/// Identities are keyed by name and never written to disk. Dropping the keyring
/// releases every key it holds.
pub struct Keyring {
    algorithm: SigningAlgorithm,
    identities: HashMap<String, Identity>,
}

impl Default for Keyring {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Keyring {
    pub fn new(algorithm: SigningAlgorithm) -> Keyring {
        Keyring {
            algorithm,
            identities: HashMap::new(),
        }
    }

    pub fn in_memory() -> Keyring {
        Keyring::new(SigningAlgorithm::default())
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Generate a fresh 24-word mnemonic and store the identity it derives
    /// with an empty passphrase
    pub fn new_identity(
        &mut self,
        name: &str,
        algorithm: SigningAlgorithm,
    ) -> Result<(Identity, Mnemonic)> {
        let entropy = utils::random_bytes(MNEMONIC_ENTROPY_BYTES);
        let mnemonic = Mnemonic::from_entropy(&entropy)
            .map_err(|e| TestnetError::KeyDerivation(format!("Failed to build mnemonic: {e}")))?;
        let identity = self.import_mnemonic(name, &mnemonic, "", algorithm)?;
        Ok((identity, mnemonic))
    }

    /// Derive an identity from an existing mnemonic, replacing any identity
    /// stored under the same name
    pub fn import_identity(
        &mut self,
        name: &str,
        phrase: &str,
        passphrase: &str,
        algorithm: SigningAlgorithm,
    ) -> Result<Identity> {
        let mnemonic = Mnemonic::parse_normalized(phrase)
            .map_err(|e| TestnetError::KeyDerivation(format!("Invalid mnemonic for {name}: {e}")))?;
        self.import_mnemonic(name, &mnemonic, passphrase, algorithm)
    }

    /// Create the identity for a genesis account: generate a mnemonic, then
    /// re-import it under the placeholder passphrase. The re-imported key is
    /// the one kept.
    pub fn create_identity(&mut self, name: &str) -> Result<Identity> {
        let algorithm = self.algorithm;
        let (_, mnemonic) = self.new_identity(name, algorithm)?;
        self.import_identity(
            name,
            &mnemonic.to_string(),
            PLACEHOLDER_PASSPHRASE,
            algorithm,
        )
    }

    fn import_mnemonic(
        &mut self,
        name: &str,
        mnemonic: &Mnemonic,
        passphrase: &str,
        algorithm: SigningAlgorithm,
    ) -> Result<Identity> {
        if name.is_empty() {
            return Err(TestnetError::KeyDerivation(
                "Identity name must not be empty".to_string(),
            ));
        }
        let seed = mnemonic.to_seed_normalized(passphrase);
        let secret = algorithm.derive_secret(&seed)?;
        let identity = Identity::from_secret(name, algorithm, secret)?;
        debug!(
            "Stored {algorithm} identity {name} with address {}",
            identity.address()
        );
        self.identities.insert(name.to_string(), identity.clone());
        Ok(identity)
    }

    pub fn get(&self, name: &str) -> Option<&Identity> {
        self.identities.get(name)
    }

    pub fn get_by_address(&self, address: &str) -> Option<&Identity> {
        self.identities
            .values()
            .find(|identity| identity.address() == address)
    }

    /// Identity names in lexicographic order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.identities.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.identities
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| TestnetError::KeyNotFound(name.to_string()))
    }

    pub fn sign(&self, name: &str, message: &[u8]) -> Result<Vec<u8>> {
        self.get(name)
            .ok_or_else(|| TestnetError::KeyNotFound(name.to_string()))?
            .sign(message)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}
