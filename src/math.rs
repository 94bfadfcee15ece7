// src/math.rs
use alloy_primitives::U256;

use crate::shared::errors::PoolError;

/// Shares owed for depositing `amount` into a pool that holds `pool_balance`
/// underlying against `supply` outstanding shares.
///
/// An empty share supply prices 1:1. Otherwise `floor(amount * supply / pool_balance)`,
/// rounding against the depositor.
pub fn shares_for_deposit(amount: U256, supply: U256, pool_balance: U256) -> Result<U256, PoolError> {
    if supply.is_zero() {
        return Ok(amount);
    }
    if pool_balance.is_zero() {
        return Err(PoolError::Insolvent { supply });
    }
    mul_div_floor(amount, supply, pool_balance, "share issuance")
}

/// Underlying owed for burning `shares`: `floor(shares * pool_balance / supply)`,
/// rounding against the redeemer.
pub fn payout_for_redeem(shares: U256, pool_balance: U256, supply: U256) -> Result<U256, PoolError> {
    if shares > supply {
        return Err(PoolError::InsufficientShares {
            requested: shares,
            available: supply,
        });
    }
    if supply.is_zero() {
        return Ok(U256::ZERO);
    }
    mul_div_floor(shares, pool_balance, supply, "redemption payout")
}

fn mul_div_floor(a: U256, b: U256, denominator: U256, what: &'static str) -> Result<U256, PoolError> {
    a.checked_mul(b)
        .and_then(|product| product.checked_div(denominator))
        .ok_or(PoolError::Overflow(what))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn test_bootstrap_is_one_to_one() {
        assert_eq!(shares_for_deposit(u(50), U256::ZERO, U256::ZERO).unwrap(), u(50));
        // Leftover underlying with no shares still bootstraps at 1:1
        assert_eq!(shares_for_deposit(u(50), U256::ZERO, u(7)).unwrap(), u(50));
    }

    #[test]
    fn test_deposit_rounds_down() {
        // 10 * 3 / 7 = 4.28..
        assert_eq!(shares_for_deposit(u(10), u(3), u(7)).unwrap(), u(4));
        assert_eq!(shares_for_deposit(u(50), u(50), u(50)).unwrap(), u(50));
        assert_eq!(shares_for_deposit(u(1), u(100), u(1_000)).unwrap(), U256::ZERO);
    }

    #[test]
    fn test_redeem_rounds_down() {
        // 2 * 7 / 3 = 4.66..
        assert_eq!(payout_for_redeem(u(2), u(7), u(3)).unwrap(), u(4));
        assert_eq!(payout_for_redeem(u(100), u(100), u(100)).unwrap(), u(100));
    }

    #[test]
    fn test_redeem_above_supply() {
        assert_eq!(
            payout_for_redeem(u(5), u(7), u(3)),
            Err(PoolError::InsufficientShares {
                requested: u(5),
                available: u(3),
            })
        );
    }

    #[test]
    fn test_insolvent_pool() {
        assert_eq!(
            shares_for_deposit(u(1), u(10), U256::ZERO),
            Err(PoolError::Insolvent { supply: u(10) })
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(
            shares_for_deposit(U256::MAX, u(2), u(3)),
            Err(PoolError::Overflow("share issuance"))
        );
    }
}
