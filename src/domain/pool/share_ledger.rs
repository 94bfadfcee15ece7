//! Pool share balances and allowances

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::shared::errors::PoolError;
use crate::shared::types::ShareAmount;

/// Share balances plus the scalar total.
///
/// Every mutation either applies fully or returns an error with nothing
/// changed, so `sum(balances) == total_supply` always holds.
#[derive(Debug, Clone, Default)]
pub struct ShareLedger {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    total_supply: U256,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_supply(&self) -> ShareAmount {
        self.total_supply
    }

    pub fn balance_of(&self, holder: Address) -> ShareAmount {
        self.balances.get(&holder).copied().unwrap_or(U256::ZERO)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> ShareAmount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Holders with a non-zero balance.
    pub fn holders(&self) -> impl Iterator<Item = (Address, ShareAmount)> + '_ {
        self.balances.iter().map(|(holder, shares)| (*holder, *shares))
    }

    pub fn mint(&mut self, to: Address, shares: ShareAmount) -> Result<(), PoolError> {
        let supply = self
            .total_supply
            .checked_add(shares)
            .ok_or(PoolError::Overflow("share supply"))?;
        let balance = self
            .balance_of(to)
            .checked_add(shares)
            .ok_or(PoolError::Overflow("share balance"))?;

        self.total_supply = supply;
        self.set_balance(to, balance);
        Ok(())
    }

    pub fn burn(&mut self, from: Address, shares: ShareAmount) -> Result<(), PoolError> {
        let balance = self.balance_of(from);
        if balance < shares {
            return Err(PoolError::InsufficientShares {
                requested: shares,
                available: balance,
            });
        }

        self.total_supply -= shares;
        self.set_balance(from, balance - shares);
        Ok(())
    }

    pub fn transfer(&mut self, from: Address, to: Address, shares: ShareAmount) -> Result<(), PoolError> {
        let from_balance = self.balance_of(from);
        if from_balance < shares {
            return Err(PoolError::InsufficientShares {
                requested: shares,
                available: from_balance,
            });
        }
        if from == to {
            return Ok(());
        }
        // Cannot overflow: both balances are bounded by total_supply.
        let to_balance = self.balance_of(to) + shares;

        self.set_balance(from, from_balance - shares);
        self.set_balance(to, to_balance);
        Ok(())
    }

    pub fn approve(&mut self, owner: Address, spender: Address, shares: ShareAmount) {
        if shares.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), shares);
        }
    }

    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        shares: ShareAmount,
    ) -> Result<(), PoolError> {
        let allowed = self.allowance(from, spender);
        if allowed < shares {
            return Err(PoolError::InsufficientAllowance {
                requested: shares,
                allowed,
            });
        }

        self.transfer(from, to, shares)?;
        self.approve(from, spender, allowed - shares);
        Ok(())
    }

    /// Whether the holder balances add up to the total supply.
    pub fn is_conserved(&self) -> bool {
        let mut sum = U256::ZERO;
        for shares in self.balances.values() {
            match sum.checked_add(*shares) {
                Some(next) => sum = next,
                None => return false,
            }
        }
        sum == self.total_supply
    }

    fn set_balance(&mut self, holder: Address, balance: U256) {
        if balance.is_zero() {
            self.balances.remove(&holder);
        } else {
            self.balances.insert(holder, balance);
        }
    }
}
