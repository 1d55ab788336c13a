//! System-wide constants for the Turquaz settlement engine.

/// Basis points in one whole (100%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Default relayer fee charged on each leg of a settlement (1%).
pub const DEFAULT_FEE_BPS: u32 = 100;

/// Protocol name bound into every order signature.
pub const DEFAULT_DOMAIN_NAME: &str = "Turquaz";

/// Protocol version bound into every order signature.
pub const DEFAULT_DOMAIN_VERSION: &str = "0.1";

/// Network identifier used when none is configured.
pub const DEFAULT_CHAIN_ID: u64 = 43_114;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Turquaz";
