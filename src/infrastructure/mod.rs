//! Infrastructure layer - concrete ledger and registry adapters

pub mod ledger;
pub mod registry;

pub use ledger::MockToken;
pub use registry::{InMemoryRegistry, SnapshotRegistry};
