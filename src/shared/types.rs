//! Common types used across the application

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Decimals of both the underlying asset and pool shares.
pub const AMOUNT_DECIMALS: u8 = 18;

/// Amount of the underlying asset, in its smallest unit.
pub type AssetAmount = U256;

/// Amount of pool shares, in their smallest unit.
pub type ShareAmount = U256;

/// Raw 32-byte oracle leaf value.
pub type FixedValue = B256;

/// Token representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(address: Address, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
        }
    }
}
