//! Asset ledger adapters

mod mock_token;

pub use mock_token::MockToken;
