// ── Core error types ──
//
// Domain-facing errors from sgsync-core. Consumers never see HTTP status
// codes or JSON parse failures directly; the `From<sgsync_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Cycle-fatal errors ───────────────────────────────────────────
    /// The external address could not be determined. Nothing may be
    /// mutated this cycle.
    #[error("External address unavailable: {reason}")]
    AddressUnavailable { reason: String },

    /// One or more configured group ids do not exist.
    #[error("Security group not found: {message}")]
    GroupNotFound { message: String },

    /// A configured group id is syntactically invalid.
    #[error("Malformed security group id: {message}")]
    GroupMalformed { message: String },

    /// A managed rule's CIDR failed to parse. The firewall state is not
    /// trustworthy, so the cycle stops before mutating anything further.
    #[error("Corrupt rule data in group {group}: cannot parse CIDR {cidr:?}: {reason}")]
    CorruptRule {
        group: String,
        cidr: String,
        reason: String,
    },

    // ── Recordable operation errors ──────────────────────────────────
    /// The credential was rejected. Permanent until fixed externally,
    /// but treated like any other per-operation failure within a cycle.
    #[error("Authorization failed: {message}")]
    AuthorizationFailed { message: String },

    /// Retriable network or service fault. The next scheduled cycle is
    /// the retry mechanism.
    #[error("Transient API error: {message}")]
    Transient { message: String },

    // ── Other ────────────────────────────────────────────────────────
    #[error("Control plane error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether this error invalidates the view of current state and must
    /// abort the cycle, as opposed to being recorded per operation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AddressUnavailable { .. }
                | Self::GroupNotFound { .. }
                | Self::GroupMalformed { .. }
                | Self::CorruptRule { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sgsync_api::Error> for CoreError {
    fn from(err: sgsync_api::Error) -> Self {
        match err {
            sgsync_api::Error::NoConsensus { queried, answered } => CoreError::AddressUnavailable {
                reason: format!("{answered} of {queried} providers answered, no majority"),
            },
            sgsync_api::Error::Authentication { message } => {
                CoreError::AuthorizationFailed { message }
            }
            sgsync_api::Error::InvalidApiKey => CoreError::AuthorizationFailed {
                message: "Invalid API key".into(),
            },
            sgsync_api::Error::Transport(ref e) => {
                if e.is_timeout() || e.is_connect() {
                    CoreError::Transient {
                        message: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            sgsync_api::Error::Timeout { timeout_secs } => CoreError::Transient {
                message: format!("request timed out after {timeout_secs}s"),
            },
            sgsync_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            sgsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sgsync_api::Error::Api {
                message,
                code,
                status,
            } => match code.as_deref() {
                Some("InvalidGroup.NotFound") => CoreError::GroupNotFound { message },
                Some("InvalidGroupId.Malformed") => CoreError::GroupMalformed { message },
                _ if status == 403 => CoreError::AuthorizationFailed { message },
                _ if status >= 500 => CoreError::Transient { message },
                _ => CoreError::Api {
                    message,
                    code,
                    status: Some(status),
                },
            },
            sgsync_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
