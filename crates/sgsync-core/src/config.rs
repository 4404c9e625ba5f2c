// ── Gateway connection settings ──

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification policy for control-plane connections.
#[derive(Debug, Clone)]
pub enum TlsVerification {
    /// Use the system certificate store.
    SystemDefaults,
    /// Trust a custom CA certificate (PEM file).
    CustomCa(PathBuf),
    /// Accept any certificate.
    DangerAcceptInvalid,
}

/// Everything needed to open a firewall control-plane session.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Control plane base URL.
    pub endpoint: Url,
    /// API key sent as `X-API-Key`.
    pub api_key: SecretString,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Translate into the api crate's transport settings.
    pub fn transport(&self) -> sgsync_api::TransportConfig {
        transport_settings(&self.tls, self.timeout)
    }
}

/// Build the api crate's transport settings without a full gateway config.
/// Address resolution needs a transport but no credentials.
pub fn transport_settings(tls: &TlsVerification, timeout: Duration) -> sgsync_api::TransportConfig {
    let tls = match tls {
        TlsVerification::SystemDefaults => sgsync_api::TlsMode::System,
        TlsVerification::CustomCa(path) => sgsync_api::TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => sgsync_api::TlsMode::DangerAcceptInvalid,
    };
    sgsync_api::TransportConfig {
        tls,
        timeout,
    }
}
