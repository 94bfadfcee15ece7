//! Asset domain - the underlying fungible asset ledger

use alloy_primitives::Address;

use crate::shared::types::AssetAmount;

/// Fungible asset ledger the pool takes custody through.
///
/// Mirrors the token interface the pool consumes. The acting account is passed
/// explicitly. A call that returns `false` must leave the ledger unchanged.
pub trait AssetLedger {
    /// Address of the asset itself.
    fn address(&self) -> Address;

    fn balance_of(&self, owner: Address) -> AssetAmount;

    fn allowance(&self, owner: Address, spender: Address) -> AssetAmount;

    fn approve(&mut self, owner: Address, spender: Address, amount: AssetAmount) -> bool;

    /// Move `amount` from `from` to `to`, acting as `from`.
    fn transfer(&mut self, from: Address, to: Address, amount: AssetAmount) -> bool;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance.
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: AssetAmount,
    ) -> bool;
}
