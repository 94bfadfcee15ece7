//! Collateral-backed liquidity pool

use alloy_primitives::Address;
use tracing::{debug, info, warn};

use super::events::PoolEvent;
use super::share_ledger::ShareLedger;
use super::PoolMetadata;
use crate::domain::asset::AssetLedger;
use crate::domain::oracle::{FeedKey, OracleRegistry, PricePort, PriceValue};
use crate::math::{payout_for_redeem, shares_for_deposit};
use crate::shared::errors::{OracleError, PoolError};
use crate::shared::types::{AssetAmount, FixedValue, ShareAmount};

/// Issues shares against deposits of one underlying asset and reports that
/// asset's price from one oracle feed.
///
/// Share math always reads the pool's live balance from the asset ledger, so
/// underlying sent to the pool directly accrues to existing holders. Mutating
/// calls take `&mut self`; the exclusive borrow keeps a ledger callback from
/// re-entering mid-operation.
pub struct LiquidityPool<R> {
    address: Address,
    underlyer: Address,
    metadata: PoolMetadata,
    price: PricePort<R>,
    shares: ShareLedger,
    events: Vec<PoolEvent>,
}

impl<R: OracleRegistry> LiquidityPool<R> {
    pub fn new(address: Address, underlyer: Address, metadata: PoolMetadata, price: PricePort<R>) -> Self {
        info!(
            "Pool {} ({}) created: underlyer={}, registry={}, feed={}",
            address,
            metadata.symbol,
            underlyer,
            price.registry_address(),
            price.label()
        );
        Self {
            address,
            underlyer,
            metadata,
            price,
            shares: ShareLedger::new(),
            events: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn underlyer(&self) -> Address {
        self.underlyer
    }

    pub fn price_registry(&self) -> Address {
        self.price.registry_address()
    }

    /// Oracle key of the pool's feed, fixed at construction.
    pub fn key_pair(&self) -> FeedKey {
        self.price.key()
    }

    pub fn feed_label(&self) -> &str {
        self.price.label()
    }

    pub fn metadata(&self) -> &PoolMetadata {
        &self.metadata
    }

    pub fn total_supply(&self) -> ShareAmount {
        self.shares.total_supply()
    }

    pub fn balance_of(&self, holder: Address) -> ShareAmount {
        self.shares.balance_of(holder)
    }

    pub fn share_allowance(&self, owner: Address, spender: Address) -> ShareAmount {
        self.shares.allowance(owner, spender)
    }

    pub fn shares(&self) -> &ShareLedger {
        &self.shares
    }

    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }

    /// Underlying currently held by the pool.
    pub fn underlying_balance<L: AssetLedger + ?Sized>(&self, ledger: &L) -> Result<AssetAmount, PoolError> {
        self.check_ledger(ledger)?;
        Ok(ledger.balance_of(self.address))
    }

    /// Shares `add_liquidity(amount)` would mint right now.
    pub fn preview_add_liquidity<L: AssetLedger + ?Sized>(
        &self,
        ledger: &L,
        amount: AssetAmount,
    ) -> Result<ShareAmount, PoolError> {
        self.check_ledger(ledger)?;
        if amount.is_zero() {
            return Err(PoolError::InvalidAmount("deposit must be greater than zero".to_string()));
        }

        let pool_balance = ledger.balance_of(self.address);
        let supply = self.shares.total_supply();
        let minted = shares_for_deposit(amount, supply, pool_balance)?;
        if minted.is_zero() {
            return Err(PoolError::InvalidAmount(format!(
                "deposit of {} mints no shares at {} shares per {} underlying",
                amount, supply, pool_balance
            )));
        }
        supply
            .checked_add(minted)
            .ok_or(PoolError::Overflow("share supply"))?;
        Ok(minted)
    }

    /// Underlying `redeem(shares)` from `holder` would pay right now.
    pub fn preview_redeem<L: AssetLedger + ?Sized>(
        &self,
        ledger: &L,
        holder: Address,
        shares: ShareAmount,
    ) -> Result<AssetAmount, PoolError> {
        self.check_ledger(ledger)?;
        if shares.is_zero() {
            return Err(PoolError::InvalidAmount("redemption must be greater than zero".to_string()));
        }

        let held = self.shares.balance_of(holder);
        if held < shares {
            return Err(PoolError::InsufficientShares {
                requested: shares,
                available: held,
            });
        }

        payout_for_redeem(shares, ledger.balance_of(self.address), self.shares.total_supply())
    }

    /// Pull `amount` underlying from `depositor` and mint the shares it buys.
    ///
    /// The depositor must have approved the pool for at least `amount` on the
    /// asset ledger.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for zero or dust deposits and for the pool depositing
    /// into itself. `TransferFailed` when the ledger refuses the pull or
    /// delivers less than `amount`; whatever did arrive is refunded. Pool
    /// shares never change on error.
    pub fn add_liquidity<L: AssetLedger + ?Sized>(
        &mut self,
        ledger: &mut L,
        depositor: Address,
        amount: AssetAmount,
    ) -> Result<ShareAmount, PoolError> {
        if depositor == self.address {
            return Err(PoolError::InvalidAmount(format!(
                "pool {} cannot deposit into itself",
                self.address
            )));
        }

        // All checks run before the pull, which is the last fallible step.
        let minted = self.preview_add_liquidity(ledger, amount)?;
        let balance_before = ledger.balance_of(self.address);

        if !ledger.transfer_from(self.address, depositor, self.address, amount) {
            warn!(
                "Pool {}: pull of {} from {} rejected (balance {}, allowance {})",
                self.address,
                amount,
                depositor,
                ledger.balance_of(depositor),
                ledger.allowance(depositor, self.address)
            );
            return Err(PoolError::TransferFailed(format!(
                "could not pull {} underlying from {}",
                amount, depositor
            )));
        }

        let received = ledger.balance_of(self.address).saturating_sub(balance_before);
        if received != amount {
            // Shares are only issued against underlying that actually arrived
            let refunded = received.is_zero() || ledger.transfer(self.address, depositor, received);
            warn!(
                "Pool {}: pull of {} from {} delivered {} (refunded: {})",
                self.address, amount, depositor, received, refunded
            );
            return Err(PoolError::TransferFailed(format!(
                "pull of {} underlying from {} delivered {}",
                amount, depositor, received
            )));
        }

        self.shares.mint(depositor, minted)?;
        self.record(PoolEvent::LiquidityAdded {
            depositor,
            amount,
            shares: minted,
        });
        info!(
            "Pool {}: {} deposited {} -> {} shares (supply {})",
            self.address,
            depositor,
            amount,
            minted,
            self.shares.total_supply()
        );

        Ok(minted)
    }

    /// Burn `shares` from `holder` and pay out their share of the underlying.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for zero, `InsufficientShares` above the holder's
    /// balance, `TransferFailed` when the ledger refuses the payout (the burn
    /// is restored).
    pub fn redeem<L: AssetLedger + ?Sized>(
        &mut self,
        ledger: &mut L,
        holder: Address,
        shares: ShareAmount,
    ) -> Result<AssetAmount, PoolError> {
        let payout = self.preview_redeem(ledger, holder, shares)?;

        self.shares.burn(holder, shares)?;
        if !ledger.transfer(self.address, holder, payout) {
            self.shares.mint(holder, shares)?;
            warn!(
                "Pool {}: payout of {} to {} rejected, burn of {} shares restored",
                self.address, payout, holder, shares
            );
            return Err(PoolError::TransferFailed(format!(
                "could not pay {} underlying to {}",
                payout, holder
            )));
        }

        self.record(PoolEvent::LiquidityRedeemed {
            holder,
            shares,
            payout,
        });
        info!(
            "Pool {}: {} redeemed {} shares -> {} (supply {})",
            self.address,
            holder,
            shares,
            payout,
            self.shares.total_supply()
        );

        Ok(payout)
    }

    pub fn transfer_shares(&mut self, from: Address, to: Address, shares: ShareAmount) -> Result<(), PoolError> {
        self.shares.transfer(from, to, shares)?;
        self.record(PoolEvent::SharesTransferred { from, to, shares });
        Ok(())
    }

    pub fn approve_shares(&mut self, owner: Address, spender: Address, shares: ShareAmount) {
        self.shares.approve(owner, spender, shares);
        self.record(PoolEvent::SharesApproved {
            owner,
            spender,
            shares,
        });
    }

    pub fn transfer_shares_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        shares: ShareAmount,
    ) -> Result<(), PoolError> {
        self.shares.transfer_from(spender, from, to, shares)?;
        self.record(PoolEvent::SharesTransferred { from, to, shares });
        Ok(())
    }

    /// Raw leaf for the pool's feed; decoding needs the feed label.
    pub async fn get_token_bnb_price(&self) -> Result<FixedValue, OracleError> {
        self.price.raw_value().await
    }

    /// The pool's feed decoded with its registered precision.
    pub async fn current_price(&self) -> Result<PriceValue, OracleError> {
        self.price.current_price().await
    }

    fn check_ledger<L: AssetLedger + ?Sized>(&self, ledger: &L) -> Result<(), PoolError> {
        if ledger.address() != self.underlyer {
            return Err(PoolError::WrongAsset {
                expected: self.underlyer,
                actual: ledger.address(),
            });
        }
        Ok(())
    }

    fn record(&mut self, event: PoolEvent) {
        debug!("Pool {} event {}: {:?}", self.address, event.name(), event);
        self.events.push(event);
    }
}
