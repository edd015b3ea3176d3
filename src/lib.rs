//! # chain-testnet - Funded Test Networks for Integration Tests
//!
//! Spins up a throwaway validator network whose genesis already holds funded
//! accounts, and hands back the keys that control them.
//!
//! ## What a Launch Does
//! - **Identities**: one mnemonic-derived key per requested name, in a keyring
//!   owned by the caller
//! - **Genesis accounts**: each identity becomes an account with
//!   `10^12 <name>token` and `10^12` of the bond denom
//! - **Genesis merge**: the accounts are appended to the auth section and the
//!   balances to the bank section of the base genesis state
//! - **Start**: the network harness writes per-validator homes and starts
//!   producing blocks
//!
//! ## Layout
//! - `wallet/`: keyring, identities, signing algorithms and addresses
//! - `genesis/`: genesis state, module sections, account packing and the merge
//! - `config/`: network configuration, encoding setup and pruning options
//! - `network/`: harness traits, the launcher and the in-process harness
//! - `core/`: coins, token policy and signed transactions
//! - `utils/`: hashing, key primitives and binary encoding
//! - `cli/`: command-line interface
//!
//! ```no_run
//! use chain_testnet::{LocalHarness, Network, NetworkConfig};
//! # use chain_testnet::cli::LoggingAppFactory;
//! # use std::sync::Arc;
//! # fn main() -> chain_testnet::Result<()> {
//! let config = NetworkConfig::default_config()?;
//! let (network, keyring) = Network::launch(
//!     &LocalHarness::new(),
//!     Arc::new(LoggingAppFactory),
//!     config,
//!     &["alice", "bob"],
//! )?;
//! assert_eq!(keyring.len(), 2);
//! # drop(network);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod genesis;
pub mod network;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{default_config, EncodingConfig, ModuleBasic, NetworkConfig, PruningStrategy};
pub use core::{Coin, Coins, DecCoin, SignedTx, TxBody, GENESIS_ACCOUNT_FUNDS};
pub use error::{Result, TestnetError};
pub use genesis::{
    add_genesis_accounts, Balance, BaseAccount, GenesisAccount, GenesisAccountFactory, GenesisDoc,
    GenesisState, InterfaceRegistry, JsonCodec,
};
pub use network::{
    AppContext, Application, ApplicationFactory, LocalHandle, LocalHarness, Network,
    NetworkHandle, NetworkHarness,
};
pub use wallet::{Identity, Keyring, Mnemonic, PublicKey, SigningAlgorithm};
