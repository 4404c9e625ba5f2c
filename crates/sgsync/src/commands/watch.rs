//! Continuous reconciliation on an interval.
//!
//! Fatal-per-cycle errors (no provider consensus, listing failures) are
//! logged and retried next cycle; credential and usage errors stop the
//! loop, since waiting will not fix them.

use owo_colors::OwoColorize;

use sgsync_core::{GroupOutcome, ReconciliationReport, run_cycle};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::commands::sync::{format_actions, outcome_label};
use crate::config::RunSettings;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    args: WatchArgs,
    settings: &RunSettings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    crate::config::require_targets(settings)?;

    let interval = args.interval.unwrap_or(settings.interval);
    let color = output::should_color(&global.color);

    let gateway = sgsync_core::gateway::connect(&settings.gateway)?;
    let source =
        sgsync_core::source::wan_source(&settings.gateway.transport(), settings.providers.clone())?;

    if !global.quiet {
        eprintln!(
            "Watching {} group(s) every {}; tag {:?}",
            settings.groups.len(),
            humantime::format_duration(interval),
            settings.tag.as_str(),
        );
    }

    let mut completed: u64 = 0;
    loop {
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        match run_cycle(&source, &gateway, &settings.groups, &settings.tag).await {
            Ok(report) => {
                if !global.quiet {
                    print_cycle(&stamp.to_string(), &report, color);
                }
            }
            Err(e) => {
                let err: CliError = e.into();
                match err {
                    // Waiting will not produce a valid credential or fix
                    // a bad group id.
                    CliError::AuthFailed { .. }
                    | CliError::NoCredentials { .. }
                    | CliError::Validation { .. } => return Err(err),
                    _ => eprintln!("[{stamp}] cycle failed: {err}"),
                }
            }
        }

        completed += 1;
        if let Some(max) = args.cycles {
            if completed >= max {
                return Ok(());
            }
        }

        tokio::time::sleep(interval).await;
    }
}

fn print_cycle(stamp: &str, report: &ReconciliationReport, color: bool) {
    for group in &report.groups {
        let label = outcome_label(group.outcome);
        let label = if color {
            match group.outcome {
                GroupOutcome::Matched => label.green().to_string(),
                GroupOutcome::Replaced | GroupOutcome::Created => label.yellow().to_string(),
                GroupOutcome::Skipped => label.dimmed().to_string(),
            }
        } else {
            label.to_string()
        };

        let errors = if group.errors.is_empty() {
            String::new()
        } else {
            let text = format!(" [{} failed]", group.errors.len());
            if color { text.red().to_string() } else { text }
        };

        println!(
            "[{stamp}] {} {}: {label} {}{errors}",
            report.address,
            group.group_id,
            format_actions(group),
        );
    }
}
