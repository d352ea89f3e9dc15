use ethers::types::Address;

use crate::error::{AppError, Result};
use crate::types::AssetSet;

pub const DEFAULT_RPC_URL: &str = "https://sepolia.base.org";

/// Base Sepolia.
pub const DEFAULT_CHAIN_ID: u64 = 84532;

/// Read-only lens contract exposing balanceOf(user, token) for the
/// protocol's tokens.
pub const DEFAULT_BALANCE_CONTRACT: &str = "0xdeB02056E277174566A1c425a8e60550142B70A2";

/// Interest-bearing collateral token (aUSDC on Base Sepolia).
pub const DEFAULT_COLLATERAL_TOKEN: &str = "0xf53B60F4006cab2b3C4688ce41fD5362427A2A66";

/// Loan-to-value factor applied to collateral when estimating borrow
/// capacity. Protocol configuration, not derived.
pub const LTV_RATIO: f64 = 0.77;

/// The reference stablecoin carries 6 decimals; raw balances are divided
/// by 10^6.
pub const DEFAULT_TOKEN_DECIMALS: u32 = 6;

/// Submissions still pending past this deadline are reported as ambiguous.
/// The notarization service does not deduplicate, so they are never retried.
pub const PUBLISH_TIMEOUT_SECS: u64 = 90;

/// Off-chain reputation slot in the attestation payload. Reserved; always
/// zero in this version.
pub const OFFCHAIN_SCORE_RESERVED: i64 = 0;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub chain_id: u64,
    /// Hex signing key (PRIVATE_KEY). Authenticates outbound calls only;
    /// never logged or persisted.
    pub private_key: String,
    /// Balance lens contract address (BALANCE_CONTRACT)
    pub balance_contract: Address,
    /// Notarization contract address (NOTARY_CONTRACT)
    pub notary_contract: Address,
    /// Collateral token address (COLLATERAL_TOKEN)
    pub collateral_token: Address,
    /// Variable-debt token address (DEBT_TOKEN)
    pub debt_token: Address,
    /// Underlying stablecoin address (UNDERLYING_TOKEN)
    pub underlying_token: Address,
    /// Wallet being scored (USER_ADDRESS)
    pub user_address: Address,
    /// Attestation schema identifier (SCHEMA_ID)
    pub schema_id: String,
    /// Decimals used to scale raw balances (TOKEN_DECIMALS)
    pub token_decimals: u32,
    /// Whether the publish stage runs (PUBLISH); false gives a dry run that
    /// stops after scoring.
    pub publish: bool,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            rpc_url: std::env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            chain_id: std::env::var("CHAIN_ID")
                .unwrap_or_else(|_| DEFAULT_CHAIN_ID.to_string())
                .parse::<u64>()
                .map_err(|_| AppError::Config("CHAIN_ID must be a decimal chain id".to_string()))?,
            private_key: require("PRIVATE_KEY")?,
            balance_contract: addr_or_default("BALANCE_CONTRACT", DEFAULT_BALANCE_CONTRACT)?,
            notary_contract: addr_required("NOTARY_CONTRACT")?,
            collateral_token: addr_or_default("COLLATERAL_TOKEN", DEFAULT_COLLATERAL_TOKEN)?,
            debt_token: addr_required("DEBT_TOKEN")?,
            underlying_token: addr_required("UNDERLYING_TOKEN")?,
            user_address: addr_required("USER_ADDRESS")?,
            schema_id: require("SCHEMA_ID")?,
            token_decimals: std::env::var("TOKEN_DECIMALS")
                .unwrap_or_else(|_| DEFAULT_TOKEN_DECIMALS.to_string())
                .parse::<u32>()
                .map_err(|_| {
                    AppError::Config("TOKEN_DECIMALS must be a small non-negative integer".to_string())
                })?,
            publish: std::env::var("PUBLISH")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The balance triplet a run fetches, in scoring order.
    pub fn assets(&self) -> AssetSet {
        AssetSet {
            collateral: self.collateral_token,
            debt: self.debt_token,
            underlying: self.underlying_token,
        }
    }
}

fn require(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| AppError::Config(format!("{name} must be set")))
}

fn parse_addr(name: &str, value: &str) -> Result<Address> {
    value
        .parse::<Address>()
        .map_err(|_| AppError::Config(format!("{name} is not a valid 20-byte hex address: {value}")))
}

fn addr_required(name: &str) -> Result<Address> {
    parse_addr(name, &require(name)?)
}

fn addr_or_default(name: &str, default: &str) -> Result<Address> {
    parse_addr(name, &std::env::var(name).unwrap_or_else(|_| default.to_string()))
}
