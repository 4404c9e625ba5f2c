//! Config subcommand handlers.

use sgsync_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

fn empty_profile() -> Profile {
    Profile {
        endpoint: String::new(),
        api_key: None,
        api_key_env: None,
        groups: Vec::new(),
        tag: None,
        ip_providers: None,
        ca_cert: None,
        insecure: None,
        timeout: None,
        interval_secs: None,
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: write a starter config ────────────────────────────
        ConfigCommand::Init { force } => {
            let path = sgsync_config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let starter = Profile {
                endpoint: "https://firewall.example.net".into(),
                api_key_env: Some("SGSYNC_API_KEY".into()),
                groups: vec!["sg-xxxxxxxx".into()],
                tag: Some("sgsync-managed".into()),
                ..empty_profile()
            };
            let mut cfg = Config::default();
            cfg.profiles.insert("default".into(), starter);

            sgsync_config::save_config(&cfg)?;
            eprintln!("✓ Starter configuration written to {}", path.display());
            eprintln!("  Edit it, then test with: sgsync ip");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = sgsync_config::load_config_or_default();
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| format!("{c:#?}"),
                |_| "config".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", sgsync_config::config_path().display());
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = sgsync_config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: sgsync config init");
            } else {
                for name in cfg.profiles.keys() {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = sgsync_config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                let available: Vec<_> = cfg.profiles.keys().cloned().collect();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_profile = Some(name.clone());
            sgsync_config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = sgsync_config::load_config_or_default();
            let profile_name = active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(empty_profile);

            match key.as_str() {
                "endpoint" => profile.endpoint = value,
                "tag" => profile.tag = Some(value),
                "groups" => {
                    profile.groups = value.split(',').map(str::to_owned).collect();
                }
                "api_key" | "api-key" => profile.api_key = Some(value),
                "api_key_env" | "api-key-env" => profile.api_key_env = Some(value),
                "ip_providers" | "ip-providers" => {
                    profile.ip_providers =
                        Some(value.split(',').map(str::to_owned).collect());
                }
                "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
                "insecure" => {
                    profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                        field: "insecure".into(),
                        reason: "must be 'true' or 'false'".into(),
                    })?);
                }
                "timeout" => {
                    profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                        field: "timeout".into(),
                        reason: "must be a number (seconds)".into(),
                    })?);
                }
                "interval_secs" | "interval-secs" => {
                    profile.interval_secs =
                        Some(value.parse().map_err(|_| CliError::Validation {
                            field: "interval_secs".into(),
                            reason: "must be a number (seconds)".into(),
                        })?);
                }
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: endpoint, tag, groups, \
                             api_key, api_key_env, ip_providers, ca_cert, insecure, timeout, \
                             interval_secs"
                        ),
                    });
                }
            }

            sgsync_config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }
    }
}
