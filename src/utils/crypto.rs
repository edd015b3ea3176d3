use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature as Secp256k1Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::RngCore;
use ring::digest::{Context, SHA256};
use ring::hmac;
use ring::signature::{Ed25519KeyPair, KeyPair, UnparsedPublicKey, ED25519};
use ripemd::{Digest as RipemdDigest, Ripemd160};

use crate::error::{Result, TestnetError};

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

pub fn ripemd160_digest(data: &[u8]) -> Vec<u8> {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

pub fn hmac_sha512(key: &[u8], data: &[u8]) -> Vec<u8> {
    let key = hmac::Key::new(hmac::HMAC_SHA512, key);
    hmac::sign(&key, data).as_ref().to_vec()
}

pub fn base58_encode(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

pub fn base58_decode(data: &str) -> Result<Vec<u8>> {
    bs58::decode(data)
        .into_vec()
        .map_err(|e| TestnetError::InvalidAddress(format!("Invalid base58 encoding: {e}")))
}

pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Compressed SEC1 public key for a 32-byte secp256k1 scalar
pub fn secp256k1_public_key(secret: &[u8]) -> Result<Vec<u8>> {
    let signing_key = SigningKey::from_slice(secret)
        .map_err(|e| TestnetError::KeyDerivation(format!("Invalid secp256k1 scalar: {e}")))?;
    let point = signing_key.verifying_key().to_encoded_point(true);
    Ok(point.as_bytes().to_vec())
}

pub fn secp256k1_sign(secret: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let signing_key = SigningKey::from_slice(secret)
        .map_err(|e| TestnetError::KeyDerivation(format!("Invalid secp256k1 scalar: {e}")))?;
    let signature: Secp256k1Signature = signing_key.sign(message);
    Ok(signature.to_bytes().to_vec())
}

pub fn secp256k1_verify(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    let verifying_key = match VerifyingKey::from_sec1_bytes(public_key) {
        Ok(key) => key,
        Err(_) => return false,
    };
    let signature = match Secp256k1Signature::from_slice(signature) {
        Ok(sig) => sig,
        Err(_) => return false,
    };
    verifying_key.verify(message, &signature).is_ok()
}

pub fn ed25519_public_key(seed: &[u8]) -> Result<Vec<u8>> {
    let key_pair = Ed25519KeyPair::from_seed_unchecked(seed)
        .map_err(|e| TestnetError::KeyDerivation(format!("Invalid Ed25519 seed: {e}")))?;
    Ok(key_pair.public_key().as_ref().to_vec())
}

pub fn ed25519_sign(seed: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let key_pair = Ed25519KeyPair::from_seed_unchecked(seed)
        .map_err(|e| TestnetError::KeyDerivation(format!("Invalid Ed25519 seed: {e}")))?;
    Ok(key_pair.sign(message).as_ref().to_vec())
}

pub fn ed25519_verify(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    UnparsedPublicKey::new(&ED25519, public_key)
        .verify(message, signature)
        .is_ok()
}
