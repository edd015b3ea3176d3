use crate::core::GENESIS_ACCOUNT_FUNDS;
use crate::wallet::SigningAlgorithm;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "chain-testnet")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        name = "genesis",
        about = "Build a genesis document with funded accounts"
    )]
    Genesis {
        #[arg(
            long = "account",
            required = true,
            help = "Name of an account to create and fund (repeatable)"
        )]
        accounts: Vec<String>,
        #[arg(long, default_value_t = GENESIS_ACCOUNT_FUNDS, help = "Funds per denomination")]
        amount: u64,
        #[arg(long = "chain-id", help = "Chain ID (random if omitted)")]
        chain_id: Option<String>,
        #[arg(long, default_value_t = SigningAlgorithm::Secp256k1, help = "secp256k1 or ed25519")]
        algo: SigningAlgorithm,
        #[arg(long, help = "Write genesis.json here instead of stdout")]
        output: Option<PathBuf>,
    },
    #[command(name = "start", about = "Run a local network until a given height")]
    Start {
        #[arg(
            long = "account",
            help = "Name of an account to create and fund (repeatable)"
        )]
        accounts: Vec<String>,
        #[arg(long, default_value_t = 1, help = "Number of validators")]
        validators: usize,
        #[arg(long, default_value_t = 5, help = "Stop after this many blocks")]
        blocks: u64,
        #[arg(long = "chain-id", help = "Chain ID (random if omitted)")]
        chain_id: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genesis() {
        let opt = Opt::try_parse_from([
            "chain-testnet",
            "genesis",
            "--account",
            "alice",
            "--account",
            "bob",
            "--chain-id",
            "demo-1",
            "--algo",
            "ed25519",
        ])
        .unwrap();
        match opt.command {
            Command::Genesis {
                accounts,
                amount,
                chain_id,
                algo,
                output,
            } => {
                assert_eq!(accounts, vec!["alice", "bob"]);
                assert_eq!(amount, GENESIS_ACCOUNT_FUNDS);
                assert_eq!(chain_id.as_deref(), Some("demo-1"));
                assert_eq!(algo, SigningAlgorithm::Ed25519);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_genesis_requires_account() {
        assert!(Opt::try_parse_from(["chain-testnet", "genesis"]).is_err());
    }

    #[test]
    fn test_parse_start_defaults() {
        let opt = Opt::try_parse_from(["chain-testnet", "start"]).unwrap();
        match opt.command {
            Command::Start {
                accounts,
                validators,
                blocks,
                chain_id,
            } => {
                assert!(accounts.is_empty());
                assert_eq!(validators, 1);
                assert_eq!(blocks, 5);
                assert!(chain_id.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
