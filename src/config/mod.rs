//! Network configuration
//!
//! [`NetworkConfig`] carries everything the launcher needs: the encoding
//! setup, the base genesis state, and the chain and validator parameters.
//! Defaults can be overridden from `TESTNET_*` environment variables.

pub mod encoding;
pub mod pruning;
pub mod settings;

pub use encoding::{EncodingConfig, ModuleBasic, ModuleBasics};
pub use pruning::PruningStrategy;
pub use settings::{default_config, random_chain_id, NetworkConfig};
