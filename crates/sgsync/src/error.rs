//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use sgsync_core::CoreError;

/// Exit codes per the CLI contract.
pub mod exit_code {
    #![allow(dead_code)]

    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Address resolution ───────────────────────────────────────────

    #[error("Could not determine the external IP address")]
    #[diagnostic(
        code(sgsync::address_unavailable),
        help(
            "No majority of WAN IP providers agreed on an answer.\n\
             Check connectivity, or configure ip_providers in your profile.\n\
             Reason: {reason}"
        )
    )]
    AddressUnavailable { reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(sgsync::auth_failed),
        help(
            "The control plane rejected the API key.\n\
             Verify it, or store a fresh one with: sgsync config set api_key <KEY>"
        )
    )]
    AuthFailed { message: String },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(sgsync::no_credentials),
        help(
            "Configure credentials with: sgsync config init\n\
             Or set the SGSYNC_API_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Security group not found: {message}")]
    #[diagnostic(
        code(sgsync::group_not_found),
        help("Check the group ids in your profile against the firewall console.")
    )]
    GroupNotFound { message: String },

    // ── Connection ───────────────────────────────────────────────────

    #[error("Control plane unreachable: {message}")]
    #[diagnostic(
        code(sgsync::connection_failed),
        help("Check the endpoint URL and network connectivity, then retry.")
    )]
    ConnectionFailed { message: String },

    // ── Firewall state ───────────────────────────────────────────────

    #[error("Corrupt rule data in group {group}: cannot parse CIDR {cidr:?}")]
    #[diagnostic(
        code(sgsync::corrupt_rule),
        help(
            "A rule carrying the managed tag holds an unparseable CIDR.\n\
             Repair or delete it in the firewall console; sgsync will not\n\
             mutate a group it cannot fully read."
        )
    )]
    CorruptRule { group: String, cidr: String },

    // ── Cycle outcome ────────────────────────────────────────────────

    #[error("Reconciliation finished with {count} failed operation(s)")]
    #[diagnostic(
        code(sgsync::cycle_errors),
        help("The failures are listed in the report above. The next run retries them.")
    )]
    CycleErrors { count: usize },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(sgsync::api_error))]
    ApiError { code: String, message: String },

    // ── Validation / configuration ───────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sgsync::validation))]
    Validation { field: String, reason: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sgsync::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sgsync config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(sgsync::no_config),
        help(
            "Create one with: sgsync config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Config file already exists")]
    #[diagnostic(
        code(sgsync::config_exists),
        help("Use --force to overwrite: sgsync config init --force\nPath: {path}")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(sgsync::config))]
    Config(#[from] sgsync_config::ConfigError),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AddressUnavailable { .. } | Self::ConnectionFailed { .. } => {
                exit_code::CONNECTION
            }
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::GroupNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AddressUnavailable { reason } => CliError::AddressUnavailable { reason },

            CoreError::GroupNotFound { message } => CliError::GroupNotFound { message },

            CoreError::GroupMalformed { message } => CliError::Validation {
                field: "group".into(),
                reason: message,
            },

            CoreError::CorruptRule { group, cidr, .. } => CliError::CorruptRule { group, cidr },

            CoreError::AuthorizationFailed { message } => CliError::AuthFailed { message },

            CoreError::Transient { message } => CliError::ConnectionFailed { message },

            CoreError::Api { message, code, .. } => CliError::ApiError {
                code: code.unwrap_or_default(),
                message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}
