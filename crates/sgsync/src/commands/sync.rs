//! One-shot reconciliation.

use tabled::Tabled;

use sgsync_core::{GroupOutcome, GroupReport, ReconciliationReport, RuleOp, run_cycle};

use crate::cli::GlobalOpts;
use crate::config::RunSettings;
use crate::error::CliError;
use crate::output;

// ── Report table row ────────────────────────────────────────────────

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Actions")]
    actions: String,
    #[tabled(rename = "Errors")]
    errors: String,
}

impl From<&GroupReport> for GroupRow {
    fn from(g: &GroupReport) -> Self {
        Self {
            group: g.group_id.to_string(),
            outcome: outcome_label(g.outcome).into(),
            actions: format_actions(g),
            errors: if g.errors.is_empty() {
                "-".into()
            } else {
                g.errors
                    .iter()
                    .map(|e| format!("{} {}: {}", op_symbol(e.op), e.cidr, e.message))
                    .collect::<Vec<_>>()
                    .join("; ")
            },
        }
    }
}

pub(crate) fn outcome_label(outcome: GroupOutcome) -> &'static str {
    match outcome {
        GroupOutcome::Matched => "matched",
        GroupOutcome::Replaced => "replaced",
        GroupOutcome::Created => "created",
        GroupOutcome::Skipped => "skipped",
    }
}

pub(crate) fn op_symbol(op: RuleOp) -> &'static str {
    match op {
        RuleOp::Keep => "=",
        RuleOp::Remove => "-",
        RuleOp::Add => "+",
    }
}

pub(crate) fn format_actions(g: &GroupReport) -> String {
    if g.actions.is_empty() {
        return "-".into();
    }
    g.actions
        .iter()
        .map(|a| format!("{}{}", op_symbol(a.op), a.cidr))
        .collect::<Vec<_>>()
        .join(" ")
}

fn report_detail(report: &ReconciliationReport) -> String {
    let table = output::render_list(
        &crate::cli::OutputFormat::Table,
        &report.groups,
        |g| GroupRow::from(g),
        |g| g.group_id.to_string(),
    );
    format!("Address: {}\n{table}", report.address)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(settings: &RunSettings, global: &GlobalOpts) -> Result<(), CliError> {
    crate::config::require_targets(settings)?;

    let gateway = sgsync_core::gateway::connect(&settings.gateway)?;
    let source =
        sgsync_core::source::wan_source(&settings.gateway.transport(), settings.providers.clone())?;

    let report = run_cycle(&source, &gateway, &settings.groups, &settings.tag).await?;

    let out = output::render_single(
        &global.output,
        &report,
        report_detail,
        |r| r.address.to_string(),
    );
    output::print_output(&out, global.quiet);

    let failed: usize = report.groups.iter().map(|g| g.errors.len()).sum();
    if failed > 0 {
        return Err(CliError::CycleErrors { count: failed });
    }
    Ok(())
}
