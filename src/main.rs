mod attest;
mod balance;
mod chain;
mod config;
mod error;
mod pipeline;
mod report;
mod scorer;
mod types;

use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::attest::AttestationPublisher;
use crate::balance::BalanceReader;
use crate::chain::{LensBalanceSource, NotarySink};
use crate::config::{Config, PUBLISH_TIMEOUT_SECS};
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::types::Stage;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        match e.stage() {
            Some(stage) => error!(state = %Stage::Failed, "Run failed during {stage} stage: {e}"),
            None => error!("Fatal error: {e}"),
        }
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let client = chain::connect(&cfg)?;
    info!("Connected to {} (chain id {})", cfg.rpc_url, cfg.chain_id);

    let reader = BalanceReader::new(
        LensBalanceSource::new(cfg.balance_contract, client.clone()),
        cfg.token_decimals,
    );
    let publisher = AttestationPublisher::new(
        NotarySink::new(cfg.notary_contract, client),
        cfg.schema_id.clone(),
        Duration::from_secs(PUBLISH_TIMEOUT_SECS),
    );

    let pipeline = Pipeline::new(reader, publisher, cfg.publish);
    let summary = pipeline.run(cfg.user_address, &cfg.assets()).await?;

    println!("{}", report::render(&summary));
    match serde_json::to_string(&summary) {
        Ok(json) => info!(event = "RUN_SUMMARY", "{json}"),
        Err(e) => warn!("summary serialization failed: {e}"),
    }
    if let Some(handle) = &summary.attestation {
        info!("Attestation recorded: id={} tx={:?}", handle.id, handle.tx_hash);
    }
    Ok(())
}
