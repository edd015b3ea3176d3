use crate::config::{NetworkConfig, PruningStrategy};
use crate::core::{DecCoin, SignedTx};
use crate::error::Result;
use crate::genesis::GenesisState;
use crate::wallet::PublicKey;
use std::path::PathBuf;
use std::sync::Arc;

/// Per-validator information handed to the application factory
#[derive(Debug, Clone)]
pub struct AppContext {
    pub index: usize,
    pub moniker: String,
    pub chain_id: String,
    /// Validator home directory
    pub home: PathBuf,
    pub consensus_key: PublicKey,
    pub pruning: PruningStrategy,
    /// Lowest gas price the validator accepts
    pub min_gas_prices: DecCoin,
}

/// The state machine each validator runs
pub trait Application: Send {
    fn init_chain(&mut self, chain_id: &str, genesis: &GenesisState) -> Result<()>;

    /// Deliver the transactions committed at `height`
    fn finalize_block(&mut self, height: u64, txs: &[SignedTx]) -> Result<()>;
}

/// Builds one application instance per validator
pub trait ApplicationFactory: Send + Sync {
    fn new_app(&self, ctx: &AppContext) -> Result<Box<dyn Application>>;
}

/// Starts validators for a configuration whose genesis is already final
pub trait NetworkHarness {
    type Handle: NetworkHandle;

    fn start(
        &self,
        config: &NetworkConfig,
        app_factory: Arc<dyn ApplicationFactory>,
    ) -> Result<Self::Handle>;
}

/// A running network
pub trait NetworkHandle {
    /// Stop every validator and release its resources. Calling it again on a
    /// stopped network succeeds without doing anything.
    fn stop(&mut self) -> Result<()>;
}
