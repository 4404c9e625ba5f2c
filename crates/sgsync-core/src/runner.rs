// ── Cycle runner ──
//
// One cycle: resolve the current address, list the configured groups,
// reconcile. The runner owns the ordering guarantee that no mutation
// happens before both the resolve and the list have succeeded.

use tracing::{debug, info};

use crate::error::CoreError;
use crate::gateway::FirewallGateway;
use crate::model::{GroupId, Tag};
use crate::reconcile::{ReconciliationReport, reconcile};
use crate::source::AddressSource;

/// Run one full reconciliation cycle.
///
/// Fatal conditions (address unavailable, listing failure, corrupt rule
/// data) return `Err` before or without mutating; per-operation failures
/// are recorded in the returned report.
pub async fn run_cycle<S, G>(
    source: &S,
    gateway: &G,
    group_ids: &[GroupId],
    tag: &Tag,
) -> Result<ReconciliationReport, CoreError>
where
    S: AddressSource,
    G: FirewallGateway,
{
    let resolved = source.resolve().await?;
    info!(address = %resolved, "resolved external address");

    if group_ids.is_empty() {
        debug!("no rule groups configured, nothing to reconcile");
        return Ok(ReconciliationReport {
            address: resolved,
            groups: Vec::new(),
        });
    }

    let groups = gateway.list_groups(group_ids).await?;
    debug!(count = groups.len(), "listed rule groups");

    reconcile(gateway, &groups, tag, resolved).await
}
