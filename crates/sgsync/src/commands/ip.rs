//! Resolve and print the current public IP.
//!
//! Needs provider access only, never credentials, so this command works
//! before any profile is configured.

use std::time::Duration;

use sgsync_core::source::AddressSource;
use sgsync_core::{ResolvedAddress, TlsVerification};

use crate::cli::GlobalOpts;
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = sgsync_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);

    let tls = if global.insecure || profile.and_then(|p| p.insecure).unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca) = profile.and_then(|p| p.ca_cert.clone()) {
        TlsVerification::CustomCa(ca)
    } else {
        TlsVerification::SystemDefaults
    };
    let providers = profile
        .map(sgsync_config::profile_ip_providers)
        .transpose()?
        .flatten();

    let timeout = global
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(cfg.defaults.timeout);
    let transport = sgsync_core::config::transport_settings(&tls, Duration::from_secs(timeout));
    let source = sgsync_core::source::wan_source(&transport, providers)?;

    let resolved = source.resolve().await?;

    let out = output::render_single(&global.output, &resolved, detail, ResolvedAddress::to_string);
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(addr: &ResolvedAddress) -> String {
    format!(
        "Address: {addr}\nFamily:  {}\nCIDR:    {}",
        addr.family(),
        addr.cidr()
    )
}
