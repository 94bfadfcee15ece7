//! Mutable in-process oracle registry

use std::collections::HashMap;

use alloy_primitives::Address;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::oracle::{FeedKey, KeyCodec, OracleRegistry};
use crate::shared::errors::{CodecError, OracleError};
use crate::shared::types::FixedValue;

/// Leaf store that can be updated while readers hold it.
pub struct InMemoryRegistry {
    address: Address,
    leaves: RwLock<HashMap<FeedKey, FixedValue>>,
}

impl InMemoryRegistry {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            leaves: RwLock::new(HashMap::new()),
        }
    }

    pub async fn set(&self, key: FeedKey, value: FixedValue) {
        debug!("Registry {} set {} = {}", self.address, key, value);
        self.leaves.write().await.insert(key, value);
    }

    /// Store a value under the key encoded from `label`.
    pub async fn set_label(&self, label: &str, value: FixedValue) -> Result<FeedKey, CodecError> {
        let key = KeyCodec::encode(label)?;
        self.set(key, value).await;
        Ok(key)
    }

    pub async fn remove(&self, key: &FeedKey) -> Option<FixedValue> {
        self.leaves.write().await.remove(key)
    }

    pub async fn len(&self) -> usize {
        self.leaves.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.leaves.read().await.is_empty()
    }
}

#[async_trait]
impl OracleRegistry for InMemoryRegistry {
    fn address(&self) -> Address {
        self.address
    }

    async fn get(&self, key: &FeedKey) -> Result<FixedValue, OracleError> {
        self.leaves
            .read()
            .await
            .get(key)
            .copied()
            .ok_or_else(|| OracleError::RegistryUnavailable(format!("no leaf stored for {}", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    #[tokio::test]
    async fn test_set_get_remove() {
        let registry = InMemoryRegistry::new(Address::repeat_byte(7));
        let key = registry
            .set_label("BNB-USD", B256::repeat_byte(1))
            .await
            .unwrap();

        assert_eq!(registry.get(&key).await.unwrap(), B256::repeat_byte(1));
        assert_eq!(registry.len().await, 1);

        registry.remove(&key).await;
        assert!(registry.is_empty().await);
        assert!(matches!(
            registry.get(&key).await,
            Err(OracleError::RegistryUnavailable(_))
        ));
    }
}
