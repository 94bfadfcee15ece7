//! Per-feed precision rules

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::key_codec::KeyCodec;
use crate::shared::errors::CodecError;

/// Largest precision whose scale `10^decimals` still fits a 256-bit word.
pub const MAX_DECIMALS: u8 = 77;

/// Numeric feeds the oracle network publishes, all scaled by 10^18.
const STANDARD_FEEDS: &[(&str, u8)] = &[
    ("BNB-USD", 18),
    ("BTC-BNB", 18),
    ("BTC-USD", 18),
    ("BUSD-BNB", 18),
    ("DAI-BNB", 18),
    ("DAI-USD", 18),
    ("ETH-BNB", 18),
    ("ETH-USD", 18),
    ("UMB-USD", 18),
    ("USDT-BNB", 18),
];

/// Decimal scaling of one feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPrecision {
    pub decimals: u8,
}

/// Registry of known feed labels and their precision.
///
/// There is no fallback: a label missing from the table cannot be decoded.
#[derive(Debug, Clone, Default)]
pub struct FeedTable {
    entries: BTreeMap<String, FeedPrecision>,
}

impl FeedTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table with every standard feed registered.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for (label, decimals) in STANDARD_FEEDS {
            table.entries.insert(
                label.to_string(),
                FeedPrecision { decimals: *decimals },
            );
        }
        table
    }

    /// Add a feed. The label must be key-encodable and not yet registered.
    pub fn register(&mut self, label: &str, decimals: u8) -> Result<(), CodecError> {
        check_entry(label, decimals)?;
        if self.entries.contains_key(label) {
            return Err(CodecError::DuplicateLabel(label.to_string()));
        }
        self.entries
            .insert(label.to_string(), FeedPrecision { decimals });
        Ok(())
    }

    pub fn precision(&self, label: &str) -> Result<FeedPrecision, CodecError> {
        self.entries
            .get(label)
            .copied()
            .ok_or_else(|| CodecError::UnknownLabel(label.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check every entry; run once at startup.
    pub fn validate(&self) -> Result<(), CodecError> {
        self.entries
            .iter()
            .try_for_each(|(label, precision)| check_entry(label, precision.decimals))
    }
}

fn check_entry(label: &str, decimals: u8) -> Result<(), CodecError> {
    KeyCodec::encode(label)?;
    if decimals > MAX_DECIMALS {
        return Err(CodecError::InvalidPrecision {
            label: label.to_string(),
            decimals,
        });
    }
    Ok(())
}
