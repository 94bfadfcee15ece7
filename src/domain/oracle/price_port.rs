//! Pool-side binding to one oracle feed

use alloy_primitives::Address;
use tracing::debug;

use super::key_codec::{FeedKey, KeyCodec};
use super::registry::OracleRegistry;
use super::value_codec::{PriceValue, ValueCodec};
use crate::shared::errors::OracleError;
use crate::shared::types::FixedValue;

/// Reads and decodes the price of a single feed.
///
/// The key is encoded once at construction; every query goes back to the
/// registry since staleness is the registry's concern.
pub struct PricePort<R> {
    registry: R,
    key: FeedKey,
    label: String,
    codec: ValueCodec,
}

impl<R: OracleRegistry> PricePort<R> {
    /// Fails if the label cannot be keyed or has no precision rule.
    pub fn new(registry: R, label: &str, codec: ValueCodec) -> Result<Self, OracleError> {
        let key = KeyCodec::encode(label)?;
        codec.table().precision(label)?;

        Ok(Self {
            registry,
            key,
            label: label.to_string(),
            codec,
        })
    }

    pub fn key(&self) -> FeedKey {
        self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn registry_address(&self) -> Address {
        self.registry.address()
    }

    /// Undecoded leaf currently stored for this feed.
    pub async fn raw_value(&self) -> Result<FixedValue, OracleError> {
        let raw = self.registry.get(&self.key).await?;
        debug!("Read {} = {} from registry {}", self.label, raw, self.registry.address());
        Ok(raw)
    }

    pub async fn current_price(&self) -> Result<PriceValue, OracleError> {
        let raw = self.raw_value().await?;
        Ok(self.codec.decode(&raw, &self.label)?)
    }
}
