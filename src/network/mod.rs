//! Test network bootstrap
//!
//! [`Network::launch`] turns a [`NetworkConfig`](crate::config::NetworkConfig)
//! and a list of account names into a running network plus the keyring that
//! controls those accounts. How validators actually run is up to the
//! [`NetworkHarness`]; [`LocalHarness`] runs them all in-process.

pub mod harness;
pub mod launcher;
pub mod local;

pub use harness::{AppContext, Application, ApplicationFactory, NetworkHandle, NetworkHarness};
pub use launcher::Network;
pub use local::{AppToml, LocalHandle, LocalHarness, ValidatorInfo};
