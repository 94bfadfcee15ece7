//! Oracle registry served from a JSON leaf snapshot
//!
//! ```json
//! {
//!   "registry": "0x8f98d3B5C911206C1Ac08B9938875620A03BCd59",
//!   "leaves": { "DAI-BNB": "0x000000000000000000000000000000000000000000000000000bb9551fc24000" }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::domain::oracle::{FeedKey, KeyCodec, OracleRegistry};
use crate::shared::errors::{AppError, OracleError};
use crate::shared::types::FixedValue;

#[derive(Debug, Deserialize)]
struct LeafSnapshot {
    registry: Address,
    leaves: BTreeMap<String, FixedValue>,
}

/// Immutable registry loaded once from disk.
#[derive(Debug, Clone)]
pub struct SnapshotRegistry {
    address: Address,
    leaves: HashMap<FeedKey, FixedValue>,
}

impl SnapshotRegistry {
    pub fn from_json(content: &str) -> Result<Self, AppError> {
        let snapshot: LeafSnapshot = serde_json::from_str(content)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse leaf snapshot: {}", e)))?;

        let mut leaves = HashMap::with_capacity(snapshot.leaves.len());
        for (label, value) in snapshot.leaves {
            leaves.insert(KeyCodec::encode(&label)?, value);
        }

        Ok(Self {
            address: snapshot.registry,
            leaves,
        })
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let registry = Self::from_json(&content)?;
        info!(
            "Loaded {} oracle leaves from {}",
            registry.leaves.len(),
            path.as_ref().display()
        );
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

#[async_trait]
impl OracleRegistry for SnapshotRegistry {
    fn address(&self) -> Address {
        self.address
    }

    async fn get(&self, key: &FeedKey) -> Result<FixedValue, OracleError> {
        self.leaves
            .get(key)
            .copied()
            .ok_or_else(|| OracleError::RegistryUnavailable(format!("no leaf in snapshot for {}", key)))
    }
}
