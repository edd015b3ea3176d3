//! Coins and decimal coins
//!
//! `Coins` keeps its entries ordered by denomination; downstream consumers
//! serialize balances as-is, so the order must be deterministic.

use crate::error::{Result, TestnetError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MIN_DENOM_LEN: usize = 3;
const MAX_DENOM_LEN: usize = 128;

/// Check a denomination against `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`
pub fn validate_denom(denom: &str) -> Result<()> {
    let len = denom.len();
    if !(MIN_DENOM_LEN..=MAX_DENOM_LEN).contains(&len) {
        return Err(TestnetError::Config(format!(
            "invalid denom {denom:?}: length must be between {MIN_DENOM_LEN} and {MAX_DENOM_LEN}"
        )));
    }

    let mut chars = denom.chars();
    let first_is_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_is_valid = chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));
    if !first_is_letter || !rest_is_valid {
        return Err(TestnetError::Config(format!("invalid denom {denom:?}")));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u64,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u64) -> Coin {
        Coin {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Set of coins ordered by denomination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Build a coin set, sorting the entries by denomination
    pub fn new(coins: Vec<Coin>) -> Coins {
        let mut coins = Coins(coins);
        coins.sort();
        coins
    }

    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| a.denom.cmp(&b.denom));
    }

    pub fn is_sorted(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0].denom <= pair[1].denom)
    }

    /// Amount held in `denom`, zero when absent
    pub fn amount_of(&self, denom: &str) -> u64 {
        self.0
            .iter()
            .find(|coin| coin.denom == denom)
            .map(|coin| coin.amount)
            .unwrap_or(0)
    }

    pub fn denoms(&self) -> Vec<&str> {
        self.0.iter().map(|coin| coin.denom.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorted, strictly increasing denominations, positive amounts
    pub fn validate(&self) -> Result<()> {
        for coin in &self.0 {
            validate_denom(&coin.denom)?;
            if coin.amount == 0 {
                return Err(TestnetError::Config(format!(
                    "coin {} has a zero amount",
                    coin.denom
                )));
            }
        }
        for pair in self.0.windows(2) {
            if pair[0].denom == pair[1].denom {
                return Err(TestnetError::Config(format!(
                    "duplicate denomination {}",
                    pair[0].denom
                )));
            }
            if pair[0].denom > pair[1].denom {
                return Err(TestnetError::Config(format!(
                    "coins are not sorted: {} before {}",
                    pair[0].denom, pair[1].denom
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|coin| coin.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Decimal coin such as a minimum gas price (`0.000006stake`)
///
/// The amount is kept as its decimal string so it prints back exactly as it
/// was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecCoin {
    pub denom: String,
    pub amount: String,
}

impl DecCoin {
    pub fn new(amount: &str, denom: &str) -> Result<DecCoin> {
        format!("{amount}{denom}").parse()
    }

    pub fn is_zero(&self) -> bool {
        self.amount.chars().all(|c| c == '0' || c == '.')
    }
}

impl FromStr for DecCoin {
    type Err = TestnetError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| TestnetError::Config(format!("decimal coin {s:?} has no denom")))?;
        let (amount, denom) = s.split_at(split);

        let mut parts = amount.splitn(2, '.');
        let integer = parts.next().unwrap_or_default();
        let fraction = parts.next();
        let digits_ok = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
        if !digits_ok(integer) || fraction.is_some_and(|part| !digits_ok(part)) {
            return Err(TestnetError::Config(format!(
                "decimal coin {s:?} has an invalid amount"
            )));
        }
        validate_denom(denom)?;

        Ok(DecCoin {
            denom: denom.to_string(),
            amount: amount.to_string(),
        })
    }
}

impl fmt::Display for DecCoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
