//! Identity store
//!
//! Named signing identities derived from BIP-39 mnemonics, held in memory for
//! the lifetime of one test network.

pub mod algorithm;
pub mod identity;
pub mod keyring;

pub use algorithm::SigningAlgorithm;
pub use bip39::Mnemonic;
pub use identity::{
    convert_address, hash_pub_key, pub_key_hash_from_address, validate_address, Identity,
    PublicKey, ADDRESS_CHECK_SUM_LEN,
};
pub use keyring::{Keyring, PLACEHOLDER_PASSPHRASE};
