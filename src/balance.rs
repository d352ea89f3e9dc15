use async_trait::async_trait;
use ethers::types::{Address, U256};
use ethers::utils::format_units;

use crate::error::{AppError, Result};

/// External balance-query collaborator. Returns the raw base-unit balance
/// for a (user, asset) pair, with no decimals applied. Implementations hold
/// no per-run state and must be safe to call concurrently for different
/// users.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn raw_balance(&self, user: Address, asset: Address) -> Result<U256>;
}

/// Normalizes raw on-chain balances into human-unit quantities.
pub struct BalanceReader<S> {
    source: S,
    decimals: u32,
}

impl<S: BalanceSource> BalanceReader<S> {
    pub fn new(source: S, decimals: u32) -> Self {
        Self { source, decimals }
    }

    /// Query the balance of `asset` held by `user` and scale it down by
    /// 10^decimals. A failed query surfaces as-is with the failing pair
    /// attached; there is no retry and no partial or default value, the
    /// caller decides whether the run aborts.
    pub async fn fetch_balance(&self, user: Address, asset: Address) -> Result<f64> {
        let raw = self.source.raw_balance(user, asset).await?;
        let scaled = format_units(raw, self.decimals).map_err(|e| AppError::BalanceFetch {
            user,
            asset,
            reason: format!("raw balance does not fit the fixed-point range: {e}"),
        })?;
        scaled.parse::<f64>().map_err(|e| AppError::BalanceFetch {
            user,
            asset,
            reason: format!("scaled balance is not numeric: {e}"),
        })
    }
}
