use crate::config::NetworkConfig;
use crate::core::GENESIS_ACCOUNT_FUNDS;
use crate::error::{Result, TestnetError};
use crate::genesis::{add_genesis_accounts, GenesisAccountFactory};
use crate::network::{ApplicationFactory, NetworkHandle, NetworkHarness};
use crate::wallet::Keyring;
use log::{error, info};
use std::sync::Arc;

/// A launched test network; stops its validators when dropped
pub struct Network<H: NetworkHarness> {
    chain_id: String,
    handle: Option<H::Handle>,
}

impl<H: NetworkHarness> Network<H> {
    /// Create a funded identity per name, splice the accounts into the
    /// configuration's genesis and start the validators.
    ///
    /// Every account is built before anything starts, so a failing name
    /// leaves nothing running.
    pub fn launch(
        harness: &H,
        app_factory: Arc<dyn ApplicationFactory>,
        config: NetworkConfig,
        names: &[&str],
    ) -> Result<(Network<H>, Keyring)> {
        config.validate()?;
        if config.enable_logging {
            // A logger may already be installed by an earlier network
            let _ = env_logger::builder().is_test(true).try_init();
        }

        let mut keyring = Keyring::new(config.signing_algo);
        let factory = GenesisAccountFactory::new(&config.bond_denom);
        let (accounts, balances) =
            factory.build_accounts(&mut keyring, names, GENESIS_ACCOUNT_FUNDS)?;
        let config = add_genesis_accounts(config, &accounts, &balances)?;

        info!(
            "Starting {} with {} validators and {} genesis accounts",
            config.chain_id,
            config.num_validators,
            accounts.len()
        );
        let handle = harness.start(&config, app_factory)?;

        let network = Network {
            chain_id: config.chain_id.clone(),
            handle: Some(handle),
        };
        Ok((network, keyring))
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Result<&H::Handle> {
        self.handle
            .as_ref()
            .ok_or_else(|| TestnetError::Harness(format!("{} is stopped", self.chain_id)))
    }

    pub fn handle_mut(&mut self) -> Result<&mut H::Handle> {
        let chain_id = &self.chain_id;
        self.handle
            .as_mut()
            .ok_or_else(|| TestnetError::Harness(format!("{chain_id} is stopped")))
    }

    /// Stop the network. Only the first call reaches the harness.
    pub fn cleanup(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(mut handle) => {
                info!("Stopping {}", self.chain_id);
                handle.stop()
            }
            None => Ok(()),
        }
    }
}

impl<H: NetworkHarness> Drop for Network<H> {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            error!("Failed to stop {}: {e}", self.chain_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::{AuthGenesisState, BankGenesisState};
    use crate::testnet::{RecordingAppFactory, StubHarness};

    #[test]
    fn test_launch_injects_accounts() {
        let harness = StubHarness::default();
        let config = NetworkConfig::default_config().unwrap();
        let (network, keyring) = Network::launch(
            &harness,
            Arc::new(RecordingAppFactory::default()),
            config,
            &["alice", "bob"],
        )
        .unwrap();

        assert!(network.is_running());
        assert_eq!(keyring.names(), vec!["alice", "bob"]);

        let started = harness.started_config().unwrap();
        let codec = started.encoding.codec();
        let auth: AuthGenesisState = started.genesis_state.get(&codec).unwrap();
        let bank: BankGenesisState = started.genesis_state.get(&codec).unwrap();
        assert_eq!(auth.accounts.len(), 2);
        assert_eq!(bank.balances.len(), 2);
        assert_eq!(
            bank.balances[0].coins.amount_of("alicetoken"),
            GENESIS_ACCOUNT_FUNDS
        );
    }

    #[test]
    fn test_cleanup_stops_once() {
        let harness = StubHarness::default();
        let (mut network, _) = Network::launch(
            &harness,
            Arc::new(RecordingAppFactory::default()),
            NetworkConfig::default_config().unwrap(),
            &[],
        )
        .unwrap();

        network.cleanup().unwrap();
        network.cleanup().unwrap();
        assert!(!network.is_running());
        assert!(network.handle().is_err());
        drop(network);
        assert_eq!(harness.stop_count(), 1);
    }

    #[test]
    fn test_drop_stops_network() {
        let harness = StubHarness::default();
        {
            let _ = Network::launch(
                &harness,
                Arc::new(RecordingAppFactory::default()),
                NetworkConfig::default_config().unwrap(),
                &["alice"],
            )
            .unwrap();
        }
        assert_eq!(harness.stop_count(), 1);
    }

    #[test]
    fn test_bad_name_aborts_before_start() {
        let harness = StubHarness::default();
        let result = Network::launch(
            &harness,
            Arc::new(RecordingAppFactory::default()),
            NetworkConfig::default_config().unwrap(),
            &["alice", ""],
        );
        assert!(matches!(result, Err(TestnetError::KeyDerivation(_))));
        assert!(harness.started_config().is_none());
    }

    #[test]
    fn test_invalid_config_aborts_before_start() {
        let harness = StubHarness::default();
        let config = NetworkConfig::default_config()
            .unwrap()
            .with_num_validators(0);
        let result = Network::launch(
            &harness,
            Arc::new(RecordingAppFactory::default()),
            config,
            &["alice"],
        );
        assert!(matches!(result, Err(TestnetError::Config(_))));
        assert!(harness.started_config().is_none());
    }

    #[test]
    fn test_name_without_valid_denom_aborts_before_start() {
        let harness = StubHarness::default();
        let result = Network::launch(
            &harness,
            Arc::new(RecordingAppFactory::default()),
            NetworkConfig::default_config().unwrap(),
            &["alice smith"],
        );
        assert!(matches!(result, Err(TestnetError::Config(_))));
        assert!(harness.started_config().is_none());
    }

    #[test]
    fn test_duplicate_names_yield_two_accounts() {
        let harness = StubHarness::default();
        let (_network, keyring) = Network::launch(
            &harness,
            Arc::new(RecordingAppFactory::default()),
            NetworkConfig::default_config().unwrap(),
            &["a", "a"],
        )
        .unwrap();
        assert_eq!(keyring.len(), 1);

        let started = harness.started_config().unwrap();
        let auth: AuthGenesisState = started.genesis_state.get(&started.encoding.codec()).unwrap();
        assert_eq!(auth.accounts.len(), 2);

        let registry = started.encoding.registry();
        let first = registry.unpack_account(&auth.accounts[0]).unwrap();
        let second = registry.unpack_account(&auth.accounts[1]).unwrap();
        assert_ne!(first.address, second.address);
        // The keyring keeps the identity created last
        assert_eq!(keyring.get("a").unwrap().address(), second.address);
    }
}
