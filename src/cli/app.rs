use crate::core::SignedTx;
use crate::error::Result;
use crate::genesis::GenesisState;
use crate::network::{AppContext, Application, ApplicationFactory};
use log::info;

/// Application that only logs what the network delivers to it
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAppFactory;

impl ApplicationFactory for LoggingAppFactory {
    fn new_app(&self, ctx: &AppContext) -> Result<Box<dyn Application>> {
        Ok(Box::new(LoggingApp {
            moniker: ctx.moniker.clone(),
            txs: 0,
        }))
    }
}

struct LoggingApp {
    moniker: String,
    txs: usize,
}

impl Application for LoggingApp {
    fn init_chain(&mut self, chain_id: &str, genesis: &GenesisState) -> Result<()> {
        info!(
            "{}: init chain {chain_id} with modules {:?}",
            self.moniker,
            genesis.module_names()
        );
        Ok(())
    }

    fn finalize_block(&mut self, height: u64, txs: &[SignedTx]) -> Result<()> {
        self.txs += txs.len();
        for tx in txs {
            info!(
                "{}: block {height} includes {} from {}",
                self.moniker,
                tx.hash()?,
                tx.body().signer
            );
        }
        Ok(())
    }
}

impl Drop for LoggingApp {
    fn drop(&mut self) {
        info!("{}: processed {} transactions", self.moniker, self.txs);
    }
}
