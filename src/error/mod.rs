//! Error handling for the test network
//!
//! Every setup failure is returned to the caller as a [`TestnetError`]; nothing in
//! the library aborts the process. The test that asked for a network decides
//! whether the error fails it.

use std::fmt;

/// Result type alias for test network operations
pub type Result<T> = std::result::Result<T, TestnetError>;

/// Error types for identity, genesis and network setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestnetError {
    /// Key generation, mnemonic import or key parsing failed
    KeyDerivation(String),
    /// No identity stored under the requested name
    KeyNotFound(String),
    /// A module section of the base genesis state is missing or malformed
    GenesisDecode { module: String, reason: String },
    /// An account's public key type is not registered with the interface registry
    AccountPack { address: String, type_url: String },
    /// Invalid or inconsistent configuration
    Config(String),
    /// Serialization/deserialization errors outside genesis decoding
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// The network harness failed to start, stop or answer a query
    Harness(String),
    /// Transaction rejected by the network
    InvalidTransaction(String),
    /// Invalid address format
    InvalidAddress(String),
}

impl fmt::Display for TestnetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestnetError::KeyDerivation(msg) => write!(f, "Key derivation error: {msg}"),
            TestnetError::KeyNotFound(name) => write!(f, "Key not found: {name}"),
            TestnetError::GenesisDecode { module, reason } => {
                write!(f, "Failed to decode {module} genesis state: {reason}")
            }
            TestnetError::AccountPack { address, type_url } => {
                write!(
                    f,
                    "Cannot pack account {address}: public key type {type_url} is not registered"
                )
            }
            TestnetError::Config(msg) => write!(f, "Configuration error: {msg}"),
            TestnetError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            TestnetError::Io(msg) => write!(f, "I/O error: {msg}"),
            TestnetError::Harness(msg) => write!(f, "Network harness error: {msg}"),
            TestnetError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {msg}"),
            TestnetError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
        }
    }
}

impl std::error::Error for TestnetError {}

impl From<std::io::Error> for TestnetError {
    fn from(err: std::io::Error) -> Self {
        TestnetError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TestnetError {
    fn from(err: serde_json::Error) -> Self {
        TestnetError::Serialization(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for TestnetError {
    fn from(err: bincode::error::EncodeError) -> Self {
        TestnetError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for TestnetError {
    fn from(err: toml::ser::Error) -> Self {
        TestnetError::Serialization(err.to_string())
    }
}
