//! In-memory fungible asset with a faucet

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::domain::asset::AssetLedger;
use crate::shared::types::{AssetAmount, Token, AMOUNT_DECIMALS};

/// Faucet-enabled stand-in for the collateral token.
#[derive(Debug, Clone)]
pub struct MockToken {
    token: Token,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    total_supply: U256,
}

impl MockToken {
    pub fn new(address: Address, symbol: &str) -> Self {
        Self {
            token: Token::new(address, symbol, AMOUNT_DECIMALS),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: U256::ZERO,
        }
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Mint fresh units to `to`.
    pub fn faucet(&mut self, to: Address, amount: AssetAmount) -> bool {
        let Some(supply) = self.total_supply.checked_add(amount) else {
            return false;
        };
        let Some(balance) = self.balance_of(to).checked_add(amount) else {
            return false;
        };
        self.total_supply = supply;
        self.balances.insert(to, balance);
        debug!("{} faucet: {} -> {}", self.token.symbol, amount, to);
        true
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return false;
        }
        if from == to {
            return true;
        }
        let Some(to_balance) = self.balance_of(to).checked_add(amount) else {
            return false;
        };
        self.balances.insert(from, from_balance - amount);
        self.balances.insert(to, to_balance);
        true
    }
}

impl AssetLedger for MockToken {
    fn address(&self) -> Address {
        self.token.address
    }

    fn balance_of(&self, owner: Address) -> AssetAmount {
        self.balances.get(&owner).copied().unwrap_or(U256::ZERO)
    }

    fn allowance(&self, owner: Address, spender: Address) -> AssetAmount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: AssetAmount) -> bool {
        self.allowances.insert((owner, spender), amount);
        true
    }

    fn transfer(&mut self, from: Address, to: Address, amount: AssetAmount) -> bool {
        self.move_balance(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: AssetAmount,
    ) -> bool {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return false;
        }
        if !self.move_balance(from, to, amount) {
            return false;
        }
        self.allowances.insert((from, spender), allowed - amount);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_faucet_and_transfer() {
        let mut dai = MockToken::new(addr(0xda), "DAI");
        assert!(dai.faucet(addr(1), U256::from(50u64)));
        assert_eq!(dai.balance_of(addr(1)), U256::from(50u64));
        assert_eq!(dai.total_supply(), U256::from(50u64));

        assert!(dai.transfer(addr(1), addr(2), U256::from(20u64)));
        assert_eq!(dai.balance_of(addr(1)), U256::from(30u64));
        assert_eq!(dai.balance_of(addr(2)), U256::from(20u64));

        assert!(!dai.transfer(addr(1), addr(2), U256::from(31u64)));
        assert_eq!(dai.balance_of(addr(1)), U256::from(30u64));
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let mut dai = MockToken::new(addr(0xda), "DAI");
        dai.faucet(addr(1), U256::from(50u64));
        dai.approve(addr(1), addr(9), U256::from(40u64));

        assert!(!dai.transfer_from(addr(9), addr(1), addr(9), U256::from(41u64)));
        assert!(dai.transfer_from(addr(9), addr(1), addr(9), U256::from(25u64)));
        assert_eq!(dai.allowance(addr(1), addr(9)), U256::from(15u64));
        assert_eq!(dai.balance_of(addr(9)), U256::from(25u64));
    }

    #[test]
    fn test_rejected_transfer_from_changes_nothing() {
        let mut dai = MockToken::new(addr(0xda), "DAI");
        dai.faucet(addr(1), U256::from(10u64));
        dai.approve(addr(1), addr(9), U256::from(100u64));

        assert!(!dai.transfer_from(addr(9), addr(1), addr(9), U256::from(11u64)));
        assert_eq!(dai.allowance(addr(1), addr(9)), U256::from(100u64));
        assert_eq!(dai.balance_of(addr(1)), U256::from(10u64));
    }
}
