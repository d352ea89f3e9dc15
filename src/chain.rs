use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::RawLog;
use ethers::contract::{abigen, EthLogDecode};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, I256, U256};

use crate::attest::AttestationSink;
use crate::balance::BalanceSource;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::AttestationHandle;

abigen!(
    BalanceLens,
    r#"[
        function balanceOf(address user, address token) view returns (uint256)
    ]"#;

    ScoreNotary,
    r#"[
        function attest(string schemaId, int256[] payload, address subject) returns (uint64)
        event AttestationCreated(uint64 indexed id, string schemaId, address indexed subject)
    ]"#;
);

pub type ChainClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Build the signing RPC client both collaborators share. The client itself
/// is stateless and safe to use from concurrent runs.
pub fn connect(cfg: &Config) -> Result<Arc<ChainClient>> {
    let provider = Provider::<Http>::try_from(cfg.rpc_url.as_str())
        .map_err(|e| AppError::Config(format!("RPC_URL is not a usable endpoint: {e}")))?;
    let wallet = cfg
        .private_key
        .parse::<LocalWallet>()?
        .with_chain_id(cfg.chain_id);
    Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
}

/// Read-only view over the deployed balance lens contract.
pub struct LensBalanceSource {
    contract: BalanceLens<ChainClient>,
}

impl LensBalanceSource {
    pub fn new(address: Address, client: Arc<ChainClient>) -> Self {
        Self {
            contract: BalanceLens::new(address, client),
        }
    }
}

#[async_trait]
impl BalanceSource for LensBalanceSource {
    async fn raw_balance(&self, user: Address, asset: Address) -> Result<U256> {
        self.contract
            .balance_of(user, asset)
            .call()
            .await
            .map_err(|e| AppError::BalanceFetch {
                user,
                asset,
                reason: e.to_string(),
            })
    }
}

/// Write handle to the notarization contract.
pub struct NotarySink {
    contract: ScoreNotary<ChainClient>,
}

impl NotarySink {
    pub fn new(address: Address, client: Arc<ChainClient>) -> Self {
        Self {
            contract: ScoreNotary::new(address, client),
        }
    }
}

#[async_trait]
impl AttestationSink for NotarySink {
    async fn submit(
        &self,
        schema_id: &str,
        payload: Vec<I256>,
        subject: Address,
    ) -> Result<AttestationHandle> {
        let call = self.contract.attest(schema_id.to_owned(), payload, subject);
        let pending = call
            .send()
            .await
            .map_err(|e| AppError::Publish(format!("transaction rejected: {e}")))?;
        let receipt = pending
            .await
            .map_err(|e| AppError::Publish(format!("confirmation failed: {e}")))?
            .ok_or_else(|| AppError::Publish("transaction dropped before inclusion".to_string()))?;

        // The created record id only surfaces through the contract's event.
        for log in &receipt.logs {
            let raw = RawLog {
                topics: log.topics.clone(),
                data: log.data.to_vec(),
            };
            if let Ok(event) = AttestationCreatedFilter::decode_log(&raw) {
                return Ok(AttestationHandle {
                    id: event.id,
                    tx_hash: receipt.transaction_hash,
                });
            }
        }
        Err(AppError::Publish(
            "receipt carries no AttestationCreated event".to_string(),
        ))
    }
}
