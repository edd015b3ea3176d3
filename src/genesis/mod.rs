//! Genesis state and account injection
//!
//! The genesis state is a map from module name to that module's serialized
//! section. The `auth` (account registry) and `bank` (balance ledger) sections
//! have typed accessors; everything else passes through as opaque bytes.
//! [`add_genesis_accounts`] is the merge step that splices freshly generated
//! accounts into a base configuration before launch.

pub mod auth;
pub mod bank;
pub mod codec;
pub mod factory;
pub mod merge;
pub mod registry;
pub mod staking;
pub mod state;

pub use auth::{
    AuthGenesisState, AuthModule, AuthParams, BaseAccount, GenesisAccount, BASE_ACCOUNT_TYPE_URL,
};
pub use bank::{Balance, BankGenesisState, BankModule, BankParams};
pub use codec::{JsonCodec, RawSection};
pub use factory::GenesisAccountFactory;
pub use merge::{add_genesis_accounts, append_accounts};
pub use registry::{Any, InterfaceRegistry};
pub use staking::{OpaqueModule, StakingGenesisState, StakingModule, StakingParams};
pub use state::{GenesisDoc, GenesisModule, GenesisState};
