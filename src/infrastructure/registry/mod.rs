//! Oracle registry adapters

mod in_memory;
mod snapshot;

pub use in_memory::InMemoryRegistry;
pub use snapshot::SnapshotRegistry;
