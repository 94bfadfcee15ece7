//! Pool domain - share issuance and redemption against the underlying asset

mod events;
mod liquidity_pool;
mod share_ledger;

pub use events::PoolEvent;
pub use liquidity_pool::LiquidityPool;
pub use share_ledger::ShareLedger;

use serde::{Deserialize, Serialize};

use crate::shared::types::AMOUNT_DECIMALS;

/// LP token metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for PoolMetadata {
    fn default() -> Self {
        Self {
            name: "Defi Pool Token".to_string(),
            symbol: "DPT".to_string(),
            decimals: AMOUNT_DECIMALS,
        }
    }
}
