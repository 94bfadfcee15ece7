//! Error handling for the application

use alloy_primitives::{Address, B256, U256};
use thiserror::Error;

/// Feed key / feed value codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid feed label {label:?}: {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("Invalid feed key {0}")]
    InvalidKey(B256),

    #[error("Malformed feed key {input:?}: {reason}")]
    MalformedKey { input: String, reason: String },

    #[error("Unknown feed label: {0}")]
    UnknownLabel(String),

    #[error("Invalid value for {label}: {reason}")]
    InvalidValue { label: String, reason: String },

    #[error("Invalid precision for {label}: {decimals} decimals")]
    InvalidPrecision { label: String, decimals: u8 },

    #[error("Duplicate feed label: {0}")]
    DuplicateLabel(String),
}

/// Oracle read errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("Decode error: {0}")]
    Decode(#[from] CodecError),
}

/// Pool operation errors. Every variant leaves pool and ledger untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient shares: requested {requested}, available {available}")]
    InsufficientShares { requested: U256, available: U256 },

    #[error("Insufficient share allowance: requested {requested}, allowed {allowed}")]
    InsufficientAllowance { requested: U256, allowed: U256 },

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Wrong asset ledger: expected {expected}, got {actual}")]
    WrongAsset { expected: Address, actual: Address },

    #[error("Pool holds no underlying while {supply} shares are outstanding")]
    Insolvent { supply: U256 },

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Oracle error: {0}")]
    OracleError(#[from] OracleError),

    #[error("Pool error: {0}")]
    PoolError(#[from] PoolError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<CodecError> for AppError {
    fn from(err: CodecError) -> Self {
        AppError::OracleError(OracleError::Decode(err))
    }
}
