use ethers::types::{Address, TxHash};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// The fixed balance triplet one scoring run reads. All three tokens live on
/// the same lending protocol and share the reference stablecoin's decimals.
#[derive(Debug, Clone, Copy)]
pub struct AssetSet {
    /// Interest-bearing collateral token (aUSDC).
    pub collateral: Address,
    /// Variable-rate debt token.
    pub debt: Address,
    /// Raw underlying stablecoin (USDC).
    pub underlying: Address,
}

// ---------------------------------------------------------------------------
// Score snapshot
// ---------------------------------------------------------------------------

/// One user's balances and derived metrics at a single point in time.
/// Constructed once per run and never mutated; durable storage is the
/// notarization service's job, not ours.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreSnapshot {
    pub collateral: f64,
    pub debt: f64,
    pub underlying: f64,
    /// Estimated additional borrowable amount: collateral * LTV - debt.
    pub borrow_capacity: f64,
    /// 1 - debt / (collateral + underlying). Defined as 1 when the
    /// denominator is zero.
    pub utilization_ratio: f64,
    /// floor(utilization_ratio * 100). Unclamped; goes negative or above
    /// 100 when debt exceeds the denominator.
    pub percentage_score: i64,
    /// Unix seconds at computation time.
    pub computed_at_secs: u64,
}

// ---------------------------------------------------------------------------
// Attestation handle
// ---------------------------------------------------------------------------

/// Handle to the durable record created by the notarization service. The
/// record itself lives with the service; this is the only reference we keep.
#[derive(Debug, Clone, Serialize)]
pub struct AttestationHandle {
    pub id: u64,
    pub tx_hash: TxHash,
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub user: Address,
    pub snapshot: ScoreSnapshot,
    /// None when the publish stage is disabled.
    pub attestation: Option<AttestationHandle>,
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

/// A run moves strictly forward through these states and can fail from any
/// of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Scoring,
    Publishing,
    Done,
    Failed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Fetching => "fetching",
            Stage::Scoring => "scoring",
            Stage::Publishing => "publishing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{s}")
    }
}
