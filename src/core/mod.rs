//! Core chain types
//!
//! Coin amounts and denominations, the token policy used to fund test
//! accounts, and the signed transactions a running network accepts.

pub mod coins;
pub mod monetary;
pub mod transaction;

pub use coins::{Coin, Coins, DecCoin};
pub use monetary::{DEFAULT_BOND_DENOM, DEFAULT_POWER_REDUCTION, GENESIS_ACCOUNT_FUNDS};
pub use transaction::{SignedTx, TxBody};
