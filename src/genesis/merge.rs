use crate::config::{EncodingConfig, NetworkConfig};
use crate::error::Result;
use crate::genesis::{auth, bank, Balance, GenesisAccount, GenesisState};
use log::info;

const ACCOUNTS_KEY: &str = "accounts";
const BALANCES_KEY: &str = "balances";

/// Append accounts to the auth section and balances to the bank section of
/// `genesis`, returning the new state.
///
/// Existing entries, and every other field of both sections, keep their exact
/// bytes and order; only the new entries are encoded. Nothing is
/// deduplicated: appending the same account twice yields two entries.
/// `genesis` itself is never modified, so a failure leaves no half-merged
/// state behind.
pub fn append_accounts(
    genesis: &GenesisState,
    encoding: &EncodingConfig,
    accounts: &[GenesisAccount],
    balances: &[Balance],
) -> Result<GenesisState> {
    let codec = encoding.codec();
    let mut merged = genesis.clone();

    let mut auth_section = merged.raw_section(auth::MODULE_NAME)?;
    let packed = encoding
        .registry()
        .pack_accounts(accounts)?
        .iter()
        .map(|any| codec.marshal_raw(any))
        .collect::<Result<Vec<_>>>()?;
    if auth_section.append_to_array(auth::MODULE_NAME, ACCOUNTS_KEY, packed)? {
        merged.insert_raw(auth::MODULE_NAME, auth_section.encode()?);
    }

    let mut bank_section = merged.raw_section(bank::MODULE_NAME)?;
    let new_balances = balances
        .iter()
        .map(|balance| codec.marshal_raw(balance))
        .collect::<Result<Vec<_>>>()?;
    if bank_section.append_to_array(bank::MODULE_NAME, BALANCES_KEY, new_balances)? {
        merged.insert_raw(bank::MODULE_NAME, bank_section.encode()?);
    }

    Ok(merged)
}

/// Splice genesis accounts and their balances into `config`'s genesis state
pub fn add_genesis_accounts(
    mut config: NetworkConfig,
    accounts: &[GenesisAccount],
    balances: &[Balance],
) -> Result<NetworkConfig> {
    config.genesis_state = append_accounts(
        &config.genesis_state,
        &config.encoding,
        accounts,
        balances,
    )?;
    info!(
        "Added {} genesis accounts and {} balances to {}",
        accounts.len(),
        balances.len(),
        config.chain_id
    );
    Ok(config)
}
