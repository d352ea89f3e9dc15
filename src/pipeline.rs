use ethers::types::Address;
use tokio::try_join;
use tracing::info;

use crate::attest::{AttestationPublisher, AttestationSink};
use crate::balance::{BalanceReader, BalanceSource};
use crate::error::Result;
use crate::scorer::compute_score;
use crate::types::{AssetSet, RunSummary, Stage};

/// Sequences one scoring run: fetch the three protocol balances, derive the
/// score snapshot, then notarize it. Holds no per-run state, so a single
/// pipeline value serves repeated runs for different users.
pub struct Pipeline<S, N> {
    reader: BalanceReader<S>,
    publisher: AttestationPublisher<N>,
    /// When false the run stops after scoring and no record is created.
    publish_enabled: bool,
}

impl<S: BalanceSource, N: AttestationSink> Pipeline<S, N> {
    pub fn new(
        reader: BalanceReader<S>,
        publisher: AttestationPublisher<N>,
        publish_enabled: bool,
    ) -> Self {
        Self {
            reader,
            publisher,
            publish_enabled,
        }
    }

    /// Run the pipeline once for `user`. Any stage error aborts the run
    /// immediately: no score is computed from incomplete balances and no
    /// attestation is ever published from an invalid snapshot.
    pub async fn run(&self, user: Address, assets: &AssetSet) -> Result<RunSummary> {
        info!(stage = %Stage::Fetching, user = ?user, "fetching protocol balances");
        // The three queries are independent, so issue them concurrently;
        // scoring waits for all of them and the first failure wins.
        let (collateral, debt, underlying) = try_join!(
            self.reader.fetch_balance(user, assets.collateral),
            self.reader.fetch_balance(user, assets.debt),
            self.reader.fetch_balance(user, assets.underlying),
        )?;

        info!(stage = %Stage::Scoring, collateral, debt, underlying, "deriving score");
        let snapshot = compute_score(collateral, debt, underlying)?;

        let attestation = if self.publish_enabled {
            info!(
                stage = %Stage::Publishing,
                score = snapshot.percentage_score,
                "submitting attestation"
            );
            Some(self.publisher.publish(&snapshot, user).await?)
        } else {
            info!("publish stage disabled, skipping attestation");
            None
        };

        info!(stage = %Stage::Done, score = snapshot.percentage_score, "run complete");
        Ok(RunSummary {
            user,
            snapshot,
            attestation,
        })
    }
}
