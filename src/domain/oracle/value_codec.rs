//! Raw leaf value -> typed price decoding

use std::fmt;

use alloy_primitives::{B256, U256};
use serde::Serialize;

use super::feed_table::FeedTable;
use crate::shared::errors::CodecError;
use crate::shared::types::FixedValue;
use crate::shared::utils::{format_units, parse_units};

/// Fixed-point price as published by a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceValue {
    raw: U256,
    decimals: u8,
}

impl PriceValue {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Integer value in the feed's smallest unit.
    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Lossy floating point view, for display and coarse comparisons.
    pub fn as_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for PriceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_units(self.raw, self.decimals))
    }
}

/// Leaf value coder backed by a precision table.
#[derive(Debug, Clone)]
pub struct ValueCodec {
    table: FeedTable,
}

impl ValueCodec {
    pub fn new(table: FeedTable) -> Self {
        Self { table }
    }

    pub fn standard() -> Self {
        Self::new(FeedTable::standard())
    }

    pub fn table(&self) -> &FeedTable {
        &self.table
    }

    /// Decode a raw big-endian leaf into a price using the label's precision.
    pub fn decode(&self, raw: &FixedValue, label: &str) -> Result<PriceValue, CodecError> {
        let precision = self.table.precision(label)?;
        let value = U256::from_be_bytes(raw.0);
        Ok(PriceValue::new(value, precision.decimals))
    }

    /// Encode a decimal price string into the leaf the network would publish.
    pub fn encode(&self, price: &str, label: &str) -> Result<FixedValue, CodecError> {
        let precision = self.table.precision(label)?;
        let value = parse_units(price, precision.decimals).map_err(|reason| {
            CodecError::InvalidValue {
                label: label.to_string(),
                reason,
            }
        })?;
        Ok(B256::from(value.to_be_bytes::<32>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: u128) -> FixedValue {
        B256::from(U256::from(value).to_be_bytes::<32>())
    }

    #[test]
    fn test_decode_dai_bnb() {
        let codec = ValueCodec::standard();
        // 0.0033 BNB per DAI at 18 decimals
        let price = codec.decode(&leaf(3_300_000_000_000_000), "DAI-BNB").unwrap();

        assert_eq!(price.decimals(), 18);
        assert_eq!(price.to_string(), "0.0033");
        assert!(price.as_f64() > 0.001 && price.as_f64() < 0.005);
    }

    #[test]
    fn test_decode_reads_big_endian() {
        let codec = ValueCodec::standard();
        let mut word = [0u8; 32];
        word[31] = 1;
        let price = codec.decode(&B256::from(word), "ETH-USD").unwrap();
        assert_eq!(price.raw(), U256::from(1u64));
        assert_eq!(price.to_string(), "0.000000000000000001");
    }

    #[test]
    fn test_precision_is_per_feed() {
        let mut table = FeedTable::standard();
        table.register("WBTC-BNB", 8).unwrap();
        let codec = ValueCodec::new(table);

        let raw = leaf(1_250_000_000);
        assert_eq!(codec.decode(&raw, "WBTC-BNB").unwrap().to_string(), "12.5");
        assert_eq!(
            codec.decode(&raw, "ETH-BNB").unwrap().to_string(),
            "0.00000000125"
        );
    }

    #[test]
    fn test_unknown_label_is_an_error() {
        let codec = ValueCodec::standard();
        assert_eq!(
            codec.decode(&leaf(1), "UNKNOWN-PAIR"),
            Err(CodecError::UnknownLabel("UNKNOWN-PAIR".to_string()))
        );
    }

    #[test]
    fn test_encode_matches_decode() {
        let codec = ValueCodec::standard();
        let raw = codec.encode("0.0033", "DAI-BNB").unwrap();
        assert_eq!(raw, leaf(3_300_000_000_000_000));
        assert_eq!(codec.decode(&raw, "DAI-BNB").unwrap().to_string(), "0.0033");

        assert!(matches!(
            codec.encode("abc", "DAI-BNB"),
            Err(CodecError::InvalidValue { .. })
        ));
        assert!(matches!(
            codec.encode("1", "UNKNOWN-PAIR"),
            Err(CodecError::UnknownLabel(_))
        ));
    }
}
