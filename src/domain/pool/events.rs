//! Pool event journal

use alloy_primitives::Address;
use serde::Serialize;

use crate::shared::types::{AssetAmount, ShareAmount};

/// Emitted once per successful pool mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum PoolEvent {
    LiquidityAdded {
        depositor: Address,
        amount: AssetAmount,
        shares: ShareAmount,
    },
    LiquidityRedeemed {
        holder: Address,
        shares: ShareAmount,
        payout: AssetAmount,
    },
    SharesTransferred {
        from: Address,
        to: Address,
        shares: ShareAmount,
    },
    SharesApproved {
        owner: Address,
        spender: Address,
        shares: ShareAmount,
    },
}

impl PoolEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PoolEvent::LiquidityAdded { .. } => "LiquidityAdded",
            PoolEvent::LiquidityRedeemed { .. } => "LiquidityRedeemed",
            PoolEvent::SharesTransferred { .. } => "SharesTransferred",
            PoolEvent::SharesApproved { .. } => "SharesApproved",
        }
    }
}
