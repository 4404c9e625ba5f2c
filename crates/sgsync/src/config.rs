//! Flag-aware settings resolution on top of `sgsync_config`.
//!
//! Core never sees CLI types -- it receives a pre-built `GatewayConfig`
//! plus the group list and tag.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use sgsync_config::{Config, Profile};
use sgsync_core::{GatewayConfig, GroupId, Tag, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a reconciling command needs, resolved from config + flags.
pub struct RunSettings {
    pub gateway: GatewayConfig,
    pub groups: Vec<GroupId>,
    pub tag: Tag,
    pub providers: Option<Vec<Url>>,
    pub interval: Duration,
}

/// Reconciling commands refuse to run without a tag and at least one
/// group; an empty tag would silently skip every group.
pub fn require_targets(settings: &RunSettings) -> Result<(), CliError> {
    if settings.groups.is_empty() {
        return Err(CliError::Validation {
            field: "group".into(),
            reason: "at least one rule group is required (--group or the profile's groups)".into(),
        });
    }
    if settings.tag.is_empty() {
        return Err(CliError::Validation {
            field: "tag".into(),
            reason: "a managing tag is required (--tag or the profile's tag)".into(),
        });
    }
    Ok(())
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build `RunSettings` from the config file, profile, and CLI overrides.
pub fn resolve_settings(global: &GlobalOpts) -> Result<RunSettings, CliError> {
    let cfg = sgsync_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg, global);
    }

    // No profile found -- try to build from CLI flags / env vars alone.
    let endpoint_str = global.endpoint.as_deref().ok_or_else(|| CliError::NoConfig {
        path: sgsync_config::config_path().display().to_string(),
    })?;

    let endpoint: Url = endpoint_str.parse().map_err(|_| CliError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {endpoint_str}"),
    })?;

    let api_key = global
        .api_key
        .as_ref()
        .map(|key| SecretString::from(key.clone()))
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name,
        })?;

    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(RunSettings {
        gateway: GatewayConfig {
            endpoint,
            api_key,
            tls,
            timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
        },
        groups: global.groups.iter().map(|g| GroupId::from(g.as_str())).collect(),
        tag: Tag::from(global.tag.clone().unwrap_or_default()),
        providers: None,
        interval: Duration::from_secs(cfg.defaults.interval_secs),
    })
}

/// Translate a `Profile` + global flags into `RunSettings`.
///
/// This is the single boundary where CLI config types cross into core types.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<RunSettings, CliError> {
    // 1. Endpoint (flag > env > profile)
    let endpoint_str = global.endpoint.as_deref().unwrap_or(&profile.endpoint);
    let endpoint: Url = endpoint_str.parse().map_err(|_| CliError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {endpoint_str}"),
    })?;

    // 2. API key
    let api_key = resolve_api_key(profile, profile_name, global)?;

    // 3. TLS verification
    let tls = if global.insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 4. Groups (flag > profile)
    let raw_groups: &[String] = if global.groups.is_empty() {
        &profile.groups
    } else {
        &global.groups
    };

    // 5. Tag (flag > profile; empty tag disables reconciliation)
    let tag = global
        .tag
        .clone()
        .or_else(|| profile.tag.clone())
        .unwrap_or_default();

    // 6. Providers (profile only)
    let providers = sgsync_config::profile_ip_providers(profile)?;

    // 7. Timings (flag > profile > defaults)
    let timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(cfg.defaults.timeout),
    );
    let interval = Duration::from_secs(
        profile
            .interval_secs
            .unwrap_or(cfg.defaults.interval_secs),
    );

    Ok(RunSettings {
        gateway: GatewayConfig {
            endpoint,
            api_key,
            tls,
            timeout,
        },
        groups: raw_groups.iter().map(|g| GroupId::from(g.as_str())).collect(),
        tag: Tag::from(tag),
        providers,
        interval,
    })
}

// ── Credential helpers ───────────────────────────────────────────────

/// Resolve an API key from the credential chain, CLI flag first.
fn resolve_api_key(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    if let Some(ref key) = global.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    match sgsync_config::resolve_api_key(profile, profile_name) {
        Ok(key) => Ok(key),
        Err(sgsync_config::ConfigError::NoCredentials { profile }) => {
            Err(CliError::NoCredentials { profile })
        }
        Err(e) => Err(e.into()),
    }
}
