//! Utility functions and helpers
//!
//! Hashing, key primitives, base58 encoding and the binary encoding used for
//! transaction sign bytes.

pub mod crypto;
pub mod serialization;

pub use crypto::{
    base58_decode, base58_encode, ed25519_public_key, ed25519_sign, ed25519_verify, hmac_sha512,
    random_bytes, ripemd160_digest, secp256k1_public_key, secp256k1_sign, secp256k1_verify,
    sha256_digest,
};

pub use serialization::{deserialize, serialize};
