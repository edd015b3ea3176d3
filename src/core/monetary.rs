/// Token policy for test networks
///
/// Staking amounts are expressed in consensus power and converted to base
/// token units with the power reduction, the same way a validator's voting
/// power is derived from its bonded tokens.
///
/// ## Units
/// - **Power reduction**: 1,000,000 base units per unit of consensus power
/// - **Account tokens**: power 1000 for every validator account
/// - **Staking tokens**: power 500 set aside for self-delegation
/// - **Bonded tokens**: power 100 actually bonded at genesis
/// - **Genesis account funds**: 10^12 of each denomination per injected account

/// Native staking denomination
pub const DEFAULT_BOND_DENOM: &str = "stake";

/// Base units per unit of consensus power
pub const DEFAULT_POWER_REDUCTION: u64 = 1_000_000;

/// Amount minted to every injected genesis account, per denomination
pub const GENESIS_ACCOUNT_FUNDS: u64 = 1_000_000_000_000;

/// Suffix appended to an account name to form its private denomination
pub const NAME_TOKEN_SUFFIX: &str = "token";

pub const ACCOUNT_POWER: u64 = 1000;
pub const STAKING_POWER: u64 = 500;
pub const BONDED_POWER: u64 = 100;

/// Minimum gas price amount, denominated in the bond denom
pub const DEFAULT_MIN_GAS_PRICE: &str = "0.000006";

/// Convert consensus power into base token units
///
/// # Examples
/// ```
/// use chain_testnet::core::monetary::{tokens_from_consensus_power, DEFAULT_POWER_REDUCTION};
/// assert_eq!(tokens_from_consensus_power(100, DEFAULT_POWER_REDUCTION), 100_000_000);
/// ```
pub fn tokens_from_consensus_power(power: u64, power_reduction: u64) -> u64 {
    power.saturating_mul(power_reduction)
}

/// Convert base token units back into consensus power, rounding down
pub fn consensus_power_from_tokens(tokens: u64, power_reduction: u64) -> u64 {
    if power_reduction == 0 {
        return 0;
    }
    tokens / power_reduction
}

/// Denomination minted for a named account, e.g. `alice` -> `alicetoken`
pub fn name_token_denom(name: &str) -> String {
    format!("{name}{NAME_TOKEN_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token_amounts() {
        assert_eq!(
            tokens_from_consensus_power(ACCOUNT_POWER, DEFAULT_POWER_REDUCTION),
            1_000_000_000
        );
        assert_eq!(
            tokens_from_consensus_power(STAKING_POWER, DEFAULT_POWER_REDUCTION),
            500_000_000
        );
        assert_eq!(
            tokens_from_consensus_power(BONDED_POWER, DEFAULT_POWER_REDUCTION),
            100_000_000
        );
        const _: () = assert!(BONDED_POWER < STAKING_POWER);
        const _: () = assert!(STAKING_POWER < ACCOUNT_POWER);
    }

    #[test]
    fn test_power_round_trip() {
        let tokens = tokens_from_consensus_power(42, DEFAULT_POWER_REDUCTION);
        assert_eq!(consensus_power_from_tokens(tokens, DEFAULT_POWER_REDUCTION), 42);
        assert_eq!(consensus_power_from_tokens(999_999, DEFAULT_POWER_REDUCTION), 0);
        assert_eq!(consensus_power_from_tokens(10, 0), 0);
    }

    #[test]
    fn test_power_saturates() {
        assert_eq!(tokens_from_consensus_power(u64::MAX, 2), u64::MAX);
    }

    #[test]
    fn test_name_token_denom() {
        assert_eq!(name_token_denom("alice"), "alicetoken");
        assert_ne!(name_token_denom("alice"), name_token_denom("bob"));
    }
}
