// sgsync-core: Domain model and reconciliation logic between sgsync-api and the CLI.

pub mod config;
pub mod convert;
pub mod error;
pub mod gateway;
pub mod model;
pub mod reconcile;
pub mod runner;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{GatewayConfig, TlsVerification};
pub use sgsync_api::TransportConfig;
pub use error::CoreError;
pub use gateway::FirewallGateway;
pub use reconcile::{
    GroupOutcome, GroupReport, OperationError, ReconciliationReport, RuleAction, RuleOp, reconcile,
};
pub use runner::run_cycle;
pub use source::AddressSource;

// Re-export model types at the crate root for ergonomics.
pub use model::{AddressFamily, AddressRange, GroupId, IngressRule, ResolvedAddress, RuleGroup, Tag};
