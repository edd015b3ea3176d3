// Entry point for the chain-testnet CLI
// Both commands build the same funded genesis the test helpers build, so a
// network can be inspected by hand
use chain_testnet::cli::LoggingAppFactory;
use chain_testnet::{
    add_genesis_accounts, Command, GenesisAccountFactory, GenesisDoc, Keyring, LocalHarness,
    Network, NetworkConfig, Opt, SignedTx, TestnetError, TxBody,
};
use clap::Parser;
use log::{error, info, LevelFilter};
use std::fs;
use std::process;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// Extra time allowed on top of the expected block time before `start` gives up
const START_GRACE: Duration = Duration::from_secs(30);

fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Genesis {
            accounts,
            amount,
            chain_id,
            algo,
            output,
        } => {
            let mut config = NetworkConfig::from_env()?.with_signing_algo(algo);
            if let Some(chain_id) = chain_id {
                config = config.with_chain_id(&chain_id);
            }
            config.validate()?;

            let names: Vec<&str> = accounts.iter().map(String::as_str).collect();
            let mut keyring = Keyring::new(algo);
            let (genesis_accounts, balances) = GenesisAccountFactory::new(&config.bond_denom)
                .build_accounts(&mut keyring, &names, amount)?;
            let config = add_genesis_accounts(config, &genesis_accounts, &balances)?;

            let genesis_time = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
            let doc = GenesisDoc::new(&config.chain_id, genesis_time, &config.genesis_state)?;
            let json = doc.to_json_pretty()?;
            match output {
                Some(path) => {
                    fs::write(&path, json)?;
                    info!("Wrote genesis for {} to {}", config.chain_id, path.display());
                }
                None => println!("{json}"),
            }
            for account in &genesis_accounts {
                eprintln!("{}", account.address);
            }
        }
        Command::Start {
            accounts,
            validators,
            blocks,
            chain_id,
        } => {
            let mut config = NetworkConfig::from_env()?.with_num_validators(validators);
            if let Some(chain_id) = chain_id {
                config = config.with_chain_id(&chain_id);
            }
            let wait = config
                .timeout_commit
                .saturating_mul(u32::try_from(blocks).unwrap_or(u32::MAX))
                .saturating_add(START_GRACE);

            let names: Vec<&str> = accounts.iter().map(String::as_str).collect();
            let (mut network, keyring) = Network::launch(
                &LocalHarness::new(),
                Arc::new(LoggingAppFactory),
                config,
                &names,
            )?;

            let handle = network.handle()?;
            for name in keyring.names() {
                let identity = keyring
                    .get(&name)
                    .ok_or_else(|| TestnetError::KeyNotFound(name.clone()))?;
                let body = TxBody::new(network.chain_id(), &identity.address(), 0, Vec::new())
                    .with_memo(&format!("hello from {name}"));
                let hash = handle.broadcast_tx(SignedTx::sign(identity, body)?)?;
                println!("{name} {} sent {hash}", identity.address());
            }

            let height = handle.wait_for_height(blocks, wait)?;
            println!("{} reached height {height}", network.chain_id());
            network.cleanup()?;
        }
    }
    Ok(())
}
