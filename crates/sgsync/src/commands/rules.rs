//! Show the ingress rules in the configured groups.

use serde::Serialize;
use tabled::Tabled;

use sgsync_core::{FirewallGateway, RuleGroup};

use crate::cli::GlobalOpts;
use crate::config::RunSettings;
use crate::error::CliError;
use crate::output;

#[derive(Clone, Tabled, Serialize)]
struct RuleRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "CIDR")]
    cidr: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Managed")]
    managed: String,
}

fn rows(groups: &[RuleGroup], tag: &sgsync_core::Tag) -> Vec<RuleRow> {
    let mut out = Vec::new();
    for group in groups {
        for rule in &group.ingress {
            let Some(range) = rule.range() else {
                // Oddly shaped rules (both or neither family) still show up,
                // marked as unmanageable.
                out.push(RuleRow {
                    group: group.id.to_string(),
                    family: "?".into(),
                    cidr: "?".into(),
                    description: String::new(),
                    managed: "no".into(),
                });
                continue;
            };
            let family = rule
                .family()
                .map(|f| f.to_string())
                .unwrap_or_else(|| "?".into());
            let managed =
                !tag.is_empty() && tag.matches(range.description.as_deref());
            out.push(RuleRow {
                group: group.id.to_string(),
                family,
                cidr: range.cidr.clone(),
                description: range.description.clone().unwrap_or_default(),
                managed: if managed { "yes" } else { "no" }.into(),
            });
        }
    }
    out
}

pub async fn handle(settings: &RunSettings, global: &GlobalOpts) -> Result<(), CliError> {
    let gateway = sgsync_core::gateway::connect(&settings.gateway)?;
    let groups = gateway.list_groups(&settings.groups).await?;

    let data = rows(&groups, &settings.tag);
    let out = output::render_list(&global.output, &data, RuleRow::clone, |r| r.cidr.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
