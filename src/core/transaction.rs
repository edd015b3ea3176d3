// Signed transactions accepted by a running test network
// A transaction is a TxBody plus the signer's public key and a signature over
// the body's bincode encoding

use crate::error::{Result, TestnetError};
use crate::utils::{deserialize, serialize, sha256_digest};
use crate::wallet::{Identity, PublicKey, SigningAlgorithm};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};

/// What the signer commits to
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct TxBody {
    pub chain_id: String,
    /// Signer's address
    pub signer: String,
    pub sequence: u64,
    pub memo: String,
    pub payload: Vec<u8>,
}

impl TxBody {
    pub fn new(chain_id: &str, signer: &str, sequence: u64, payload: Vec<u8>) -> TxBody {
        TxBody {
            chain_id: chain_id.to_string(),
            signer: signer.to_string(),
            sequence,
            memo: String::new(),
            payload,
        }
    }

    pub fn with_memo(mut self, memo: &str) -> TxBody {
        self.memo = memo.to_string();
        self
    }

    /// Canonical bytes the signature covers
    pub fn sign_bytes(&self) -> Result<Vec<u8>> {
        serialize(self)
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct SignedTx {
    body: TxBody,
    key_type: String,
    pub_key: Vec<u8>,
    signature: Vec<u8>,
}

impl SignedTx {
    pub fn sign(identity: &Identity, body: TxBody) -> Result<SignedTx> {
        let signature = identity.sign(&body.sign_bytes()?)?;
        let public_key = identity.public_key();
        Ok(SignedTx {
            body,
            key_type: public_key.type_url().to_string(),
            pub_key: public_key.key.clone(),
            signature,
        })
    }

    pub fn body(&self) -> &TxBody {
        &self.body
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        let algorithm = SigningAlgorithm::from_type_url(&self.key_type).ok_or_else(|| {
            TestnetError::InvalidTransaction(format!("unknown key type {}", self.key_type))
        })?;
        Ok(PublicKey::new(algorithm, self.pub_key.clone()))
    }

    /// Checks that the key belongs to the signer address and signed the body
    pub fn verify(&self) -> Result<()> {
        let public_key = self.public_key()?;
        if public_key.address() != self.body.signer {
            return Err(TestnetError::InvalidTransaction(format!(
                "public key does not belong to signer {}",
                self.body.signer
            )));
        }
        if !public_key.verify(&self.body.sign_bytes()?, &self.signature) {
            return Err(TestnetError::InvalidTransaction(
                "signature verification failed".to_string(),
            ));
        }
        Ok(())
    }

    /// Lowercase hex SHA-256 of the sign bytes
    pub fn hash(&self) -> Result<String> {
        Ok(HEXLOWER.encode(&sha256_digest(&self.body.sign_bytes()?)))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<SignedTx> {
        deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::Keyring;

    fn signed_by(keyring: &mut Keyring, name: &str) -> SignedTx {
        let identity = keyring.create_identity(name).unwrap();
        let body = TxBody::new("chain-test01", &identity.address(), 0, b"ping".to_vec());
        SignedTx::sign(&identity, body).unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let mut keyring = Keyring::in_memory();
        let tx = signed_by(&mut keyring, "alice");
        assert!(tx.verify().is_ok());
        assert_eq!(tx.public_key().unwrap().address(), tx.body().signer);
    }

    #[test]
    fn test_ed25519_sign_and_verify() {
        let mut keyring = Keyring::new(SigningAlgorithm::Ed25519);
        let tx = signed_by(&mut keyring, "bob");
        assert!(tx.verify().is_ok());
    }

    #[test]
    fn test_tampered_body_rejected() {
        let mut keyring = Keyring::in_memory();
        let mut tx = signed_by(&mut keyring, "alice");
        tx.body.payload = b"pong".to_vec();
        assert!(matches!(
            tx.verify(),
            Err(TestnetError::InvalidTransaction(_))
        ));
    }

    #[test]
    fn test_foreign_signer_rejected() {
        let mut keyring = Keyring::in_memory();
        let mut tx = signed_by(&mut keyring, "alice");
        let bob = keyring.create_identity("bob").unwrap();
        tx.body.signer = bob.address();
        assert!(matches!(
            tx.verify(),
            Err(TestnetError::InvalidTransaction(_))
        ));
    }

    #[test]
    fn test_hash_and_bytes() {
        let mut keyring = Keyring::in_memory();
        let tx = signed_by(&mut keyring, "alice");

        let hash = tx.hash().unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let decoded = SignedTx::from_bytes(&tx.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.hash().unwrap(), hash);
        assert!(SignedTx::from_bytes(&[0xff, 0x01]).is_err());
    }
}
