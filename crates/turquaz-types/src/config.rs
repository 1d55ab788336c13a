//! Configuration types for a Turquaz engine instance.

use serde::{Deserialize, Serialize};

use crate::{constants, Address, Result, TurquazError};

/// The signing domain an engine instance binds order signatures to.
///
/// Changing any field changes every order hash, so signatures made for one
/// deployment or version can never be replayed against another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainConfig {
    /// Protocol name (e.g. "Turquaz").
    pub name: String,
    /// Protocol version (e.g. "0.1").
    pub version: String,
    /// Network the engine is deployed on.
    pub chain_id: u64,
    /// The engine instance's own identity.
    pub engine_address: Address,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            name: constants::DEFAULT_DOMAIN_NAME.to_string(),
            version: constants::DEFAULT_DOMAIN_VERSION.to_string(),
            chain_id: constants::DEFAULT_CHAIN_ID,
            engine_address: Address::ZERO,
        }
    }
}

/// Configuration for a settlement engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Signing domain.
    pub domain: DomainConfig,
    /// Relayer fee per leg, in basis points.
    pub fee_bps: u32,
    /// Reject fills smaller than an order's signed `min_settle_amount`.
    pub enforce_min_settle_amount: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            domain: DomainConfig::default(),
            fee_bps: constants::DEFAULT_FEE_BPS,
            enforce_min_settle_amount: false,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.fee_bps > constants::BPS_DENOMINATOR {
            return Err(TurquazError::Configuration(format!(
                "fee_bps {} exceeds {}",
                self.fee_bps,
                constants::BPS_DENOMINATOR
            )));
        }
        if self.domain.name.is_empty() {
            return Err(TurquazError::Configuration("domain.name is empty".into()));
        }
        if self.domain.version.is_empty() {
            return Err(TurquazError::Configuration("domain.version is empty".into()));
        }
        Ok(())
    }
}
