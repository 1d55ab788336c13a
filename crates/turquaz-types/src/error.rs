//! Error types for the Turquaz settlement engine.
//!
//! All errors use the `TQ_ERR_` prefix convention for easy grepping in logs.
//! Every error is local to a single call and leaves persistent state exactly
//! as it was before that call. Codes are grouped by family:
//! - 1xx: Input validity
//! - 2xx: Temporal (expiration, cancellation)
//! - 3xx: Fill state
//! - 4xx: Resource (balances, custody)
//! - 5xx: Authentication
//! - 6xx: Economic
//! - 9xx: General / internal

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, Asset};

/// Central error enum for all Turquaz operations.
#[derive(Debug, Error)]
pub enum TurquazError {
    // =================================================================
    // Input Validity (1xx)
    // =================================================================
    /// The two orders are not complementary, or disagree on the quote asset.
    #[error("TQ_ERR_100: Asset mismatch: orders are not complementary")]
    AssetMismatch,

    /// A native-asset deposit carried a different attached value.
    #[error("TQ_ERR_101: Amount mismatch: declared {declared}, attached {attached}")]
    AmountMismatch { declared: Decimal, attached: Decimal },

    /// An amount was negative, zero where forbidden, or fractional.
    #[error("TQ_ERR_102: Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Order A is structurally invalid.
    #[error("TQ_ERR_103: Order A is invalid: {reason}")]
    InvalidOrderA { reason: String },

    /// Order B is structurally invalid.
    #[error("TQ_ERR_104: Order B is invalid: {reason}")]
    InvalidOrderB { reason: String },

    // =================================================================
    // Temporal (2xx)
    // =================================================================
    #[error("TQ_ERR_200: Order A expired")]
    OrderAExpired,

    #[error("TQ_ERR_201: Order B expired")]
    OrderBExpired,

    /// Order A's creator raised their cancel watermark past its creation time.
    #[error("TQ_ERR_202: Order A cancelled by its creator")]
    OrderACancelled,

    #[error("TQ_ERR_203: Order B cancelled by its creator")]
    OrderBCancelled,

    // =================================================================
    // Fill State (3xx)
    // =================================================================
    #[error("TQ_ERR_300: Order A is fully filled")]
    OrderAFilled,

    #[error("TQ_ERR_301: Order B is fully filled")]
    OrderBFilled,

    /// A fill larger than the order's remaining amount was recorded.
    #[error("TQ_ERR_302: Order fully filled: requested {requested}, remaining {remaining}")]
    OrderFullyFilled { requested: Decimal, remaining: Decimal },

    // =================================================================
    // Resource (4xx)
    // =================================================================
    /// Not enough ledger balance to perform the operation.
    #[error("TQ_ERR_400: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// The seller's creator cannot cover the seller order's remaining amount.
    #[error("TQ_ERR_401: Seller does not have enough of {asset} to release")]
    SellerInsufficientAsset { asset: Asset },

    /// The buyer's creator cannot cover the buyer order's remaining amount.
    #[error("TQ_ERR_402: Buyer does not have enough of {asset} to release")]
    BuyerInsufficientAsset { asset: Asset },

    /// The custody host refused to move funds in or out.
    #[error("TQ_ERR_403: Custody transfer failed: {reason}")]
    CustodyTransferFailed { reason: String },

    // =================================================================
    // Authentication (5xx)
    // =================================================================
    /// No verification strategy authorizes this order hash for its creator.
    #[error("TQ_ERR_500: Order could not be verified for creator {creator}")]
    UnverifiableOrder { creator: Address },

    #[error("TQ_ERR_501: Order A could not be verified")]
    OrderAUnverifiable,

    #[error("TQ_ERR_502: Order B could not be verified")]
    OrderBUnverifiable,

    // =================================================================
    // Economic (6xx)
    // =================================================================
    /// The seller's ask exceeds the buyer's bid.
    #[error("TQ_ERR_600: Price cross violation: buy price is less than sell price")]
    PriceCrossViolation,

    /// The clearing quantity truncates to zero.
    #[error("TQ_ERR_601: Nothing to settle: clearing quantity is zero")]
    NothingToSettle,

    /// The fill is below an order's signed minimum settle amount.
    #[error("TQ_ERR_602: Fill {fill} is below the minimum settle amount {minimum}")]
    BelowMinSettleAmount { fill: Decimal, minimum: Decimal },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// An intermediate amount did not fit the decimal representation.
    #[error("TQ_ERR_900: Arithmetic overflow")]
    ArithmeticOverflow,

    /// Solvency invariant violated. Critical safety alert.
    #[error("TQ_ERR_901: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("TQ_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// Serialization / deserialization error.
    #[error("TQ_ERR_903: Serialization error: {0}")]
    Serialization(String),
}

impl TurquazError {
    /// The `TQ_ERR_` code of this error, for structured logging.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::AssetMismatch => 100,
            Self::AmountMismatch { .. } => 101,
            Self::InvalidAmount(_) => 102,
            Self::InvalidOrderA { .. } => 103,
            Self::InvalidOrderB { .. } => 104,
            Self::OrderAExpired => 200,
            Self::OrderBExpired => 201,
            Self::OrderACancelled => 202,
            Self::OrderBCancelled => 203,
            Self::OrderAFilled => 300,
            Self::OrderBFilled => 301,
            Self::OrderFullyFilled { .. } => 302,
            Self::InsufficientBalance { .. } => 400,
            Self::SellerInsufficientAsset { .. } => 401,
            Self::BuyerInsufficientAsset { .. } => 402,
            Self::CustodyTransferFailed { .. } => 403,
            Self::UnverifiableOrder { .. } => 500,
            Self::OrderAUnverifiable => 501,
            Self::OrderBUnverifiable => 502,
            Self::PriceCrossViolation => 600,
            Self::NothingToSettle => 601,
            Self::BelowMinSettleAmount { .. } => 602,
            Self::ArithmeticOverflow => 900,
            Self::SupplyInvariantViolation { .. } => 901,
            Self::Configuration(_) => 902,
            Self::Serialization(_) => 903,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TurquazError>;

impl From<serde_json::Error> for TurquazError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
