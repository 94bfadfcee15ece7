//! Defipool - oracle-priced liquidity pool
//! Built with Domain-Driven Design principles

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod math;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use domain::asset::AssetLedger;
pub use domain::oracle::{FeedKey, FeedTable, KeyCodec, OracleRegistry, PricePort, PriceValue, ValueCodec};
pub use domain::pool::{LiquidityPool, PoolEvent, PoolMetadata};
pub use infrastructure::{InMemoryRegistry, MockToken, SnapshotRegistry};
