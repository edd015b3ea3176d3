use crate::core::{monetary::name_token_denom, Coin, Coins};
use crate::error::{Result, TestnetError};
use crate::genesis::{Balance, GenesisAccount};
use crate::wallet::{Identity, Keyring};
use log::debug;

/// Builds funded genesis accounts for keyring identities
#[derive(Debug, Clone)]
pub struct GenesisAccountFactory {
    bond_denom: String,
}

impl GenesisAccountFactory {
    pub fn new(bond_denom: &str) -> GenesisAccountFactory {
        GenesisAccountFactory {
            bond_denom: bond_denom.to_string(),
        }
    }

    pub fn bond_denom(&self) -> &str {
        &self.bond_denom
    }

    /// Account plus a balance of `amount` in both `<name>token` and the bond
    /// denom, coins sorted by denomination
    ///
    /// Fails with `Config` when the name does not yield a valid denomination
    /// or when both denominations coincide.
    pub fn build_account(
        &self,
        identity: &Identity,
        amount: u64,
    ) -> Result<(GenesisAccount, Balance)> {
        if amount == 0 {
            return Err(TestnetError::Config(format!(
                "genesis funds for {} must be positive",
                identity.name()
            )));
        }

        let coins = Coins::new(vec![
            Coin::new(name_token_denom(identity.name()), amount),
            Coin::new(self.bond_denom.clone(), amount),
        ]);
        coins.validate()?;
        let account = GenesisAccount::from_identity(identity);
        let balance = Balance::new(account.address.clone(), coins);
        debug!("Built genesis account {} for {}", account.address, identity.name());
        Ok((account, balance))
    }

    /// Create an identity per name, in order, and build its account. The first
    /// failure aborts the whole batch.
    pub fn build_accounts(
        &self,
        keyring: &mut Keyring,
        names: &[&str],
        amount: u64,
    ) -> Result<(Vec<GenesisAccount>, Vec<Balance>)> {
        let mut accounts = Vec::with_capacity(names.len());
        let mut balances = Vec::with_capacity(names.len());
        for name in names {
            let identity = keyring.create_identity(name)?;
            let (account, balance) = self.build_account(&identity, amount)?;
            accounts.push(account);
            balances.push(balance);
        }
        Ok((accounts, balances))
    }
}
