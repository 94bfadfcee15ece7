//! Oracle registry interface

use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;

use super::key_codec::FeedKey;
use crate::shared::errors::OracleError;
use crate::shared::types::FixedValue;

/// Read-only view of the oracle network's leaf store.
///
/// Consensus, signatures and proofs are the registry's business; callers only
/// see the latest value stored under a key.
#[async_trait]
pub trait OracleRegistry: Send + Sync {
    /// On-chain address of the registry.
    fn address(&self) -> Address;

    async fn get(&self, key: &FeedKey) -> Result<FixedValue, OracleError>;
}

#[async_trait]
impl<R: OracleRegistry + ?Sized> OracleRegistry for Arc<R> {
    fn address(&self) -> Address {
        (**self).address()
    }

    async fn get(&self, key: &FeedKey) -> Result<FixedValue, OracleError> {
        (**self).get(key).await
    }
}
