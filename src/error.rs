use ethers::signers::WalletError;
use ethers::types::Address;
use thiserror::Error;

use crate::types::Stage;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Balance query failed for asset {asset:?} (user {user:?}): {reason}")]
    BalanceFetch {
        user: Address,
        asset: Address,
        reason: String,
    },

    #[error("Invalid {label} balance {value}: arithmetic requires a finite non-negative value")]
    InvalidBalance { label: &'static str, value: f64 },

    #[error("Attestation submission failed: {0}")]
    Publish(String),

    #[error("Attestation submission timed out after {secs}s; the record may or may not have been created, not retrying")]
    PublishTimedOut { secs: u64 },
}

impl AppError {
    /// Pipeline stage a run was in when this error occurred. None for
    /// errors raised before a run starts (config, wallet setup).
    pub fn stage(&self) -> Option<Stage> {
        match self {
            AppError::BalanceFetch { .. } => Some(Stage::Fetching),
            AppError::InvalidBalance { .. } => Some(Stage::Scoring),
            AppError::Publish(_) | AppError::PublishTimedOut { .. } => Some(Stage::Publishing),
            AppError::Config(_) | AppError::Wallet(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
