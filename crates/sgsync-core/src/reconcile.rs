// ── Rule reconciliation ──
//
// Given one freshly resolved address, a tag, and the listed state of the
// configured rule groups, decide per group whether the managed rule is
// fresh, stale, or missing, and issue the minimal remove/add calls.
//
// Groups are independent decision units: an operation failure in one
// group is recorded in the report and never blocks the others. Only a
// corrupt managed rule aborts the cycle, because from that point the
// listed state cannot be trusted.

use ipnetwork::IpNetwork;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::gateway::FirewallGateway;
use crate::model::{AddressFamily, AddressRange, GroupId, IngressRule, ResolvedAddress, RuleGroup, Tag};

// ── Report types ────────────────────────────────────────────────────

/// What happened to one rule group in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOutcome {
    /// The managed rule already allows the current address.
    Matched,
    /// A stale managed rule was replaced (remove, then add).
    Replaced,
    /// No managed rule carried the tag; one was created.
    Created,
    /// Empty tag: the group was not evaluated.
    Skipped,
}

/// One firewall operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOp {
    Keep,
    Remove,
    Add,
}

/// One completed operation (or no-op) on a rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleAction {
    pub op: RuleOp,
    pub family: AddressFamily,
    pub cidr: String,
}

/// One failed operation. Recorded, never retried within the cycle.
#[derive(Debug, Clone, Serialize)]
pub struct OperationError {
    pub op: RuleOp,
    pub cidr: String,
    pub message: String,
}

/// Per-group slice of the cycle report.
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub group_id: GroupId,
    pub outcome: GroupOutcome,
    pub actions: Vec<RuleAction>,
    pub errors: Vec<OperationError>,
}

/// The outcome of one full reconciliation cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub address: ResolvedAddress,
    pub groups: Vec<GroupReport>,
}

impl ReconciliationReport {
    pub fn has_errors(&self) -> bool {
        self.groups.iter().any(|g| !g.errors.is_empty())
    }

    /// Number of mutating calls that succeeded this cycle.
    pub fn mutations(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| &g.actions)
            .filter(|a| a.op != RuleOp::Keep)
            .count()
    }
}

// ── Classification ──────────────────────────────────────────────────

enum Disposition<'a> {
    /// Not ours: untagged, oddly shaped, or someone else's rule.
    Unmanaged,
    /// Ours, but for the other address family; reconciled only when an
    /// address of that family is observed.
    OtherFamily,
    /// Ours and already correct.
    Fresh(&'a AddressRange),
    /// Ours and pointing at a previous address.
    Stale(&'a AddressRange),
}

fn classify<'a>(
    rule: &'a IngressRule,
    tag: &Tag,
    resolved: ResolvedAddress,
    group: &GroupId,
) -> Result<Disposition<'a>, CoreError> {
    let (Some(family), Some(range)) = (rule.family(), rule.range()) else {
        return Ok(Disposition::Unmanaged);
    };

    if !tag.matches(range.description.as_deref()) {
        return Ok(Disposition::Unmanaged);
    }

    if family != resolved.family() {
        return Ok(Disposition::OtherFamily);
    }

    let network: IpNetwork = range.cidr.parse().map_err(|e: ipnetwork::IpNetworkError| {
        CoreError::CorruptRule {
            group: group.to_string(),
            cidr: range.cidr.clone(),
            reason: e.to_string(),
        }
    })?;

    // Prefix length is deliberately ignored: a managed /24 whose written
    // address equals the resolved address still counts as fresh.
    if network.ip() == resolved.ip() {
        Ok(Disposition::Fresh(range))
    } else {
        Ok(Disposition::Stale(range))
    }
}

// ── Reconciliation ──────────────────────────────────────────────────

/// Reconcile every listed group against the resolved address.
///
/// Groups are processed sequentially in input order. Returns `Err` only
/// for cycle-fatal conditions (corrupt rule data); per-operation failures
/// land in the report.
pub async fn reconcile<G: FirewallGateway>(
    gateway: &G,
    groups: &[RuleGroup],
    tag: &Tag,
    resolved: ResolvedAddress,
) -> Result<ReconciliationReport, CoreError> {
    let mut reports = Vec::with_capacity(groups.len());
    for group in groups {
        reports.push(reconcile_group(gateway, group, tag, resolved).await?);
    }
    Ok(ReconciliationReport {
        address: resolved,
        groups: reports,
    })
}

async fn reconcile_group<G: FirewallGateway>(
    gateway: &G,
    group: &RuleGroup,
    tag: &Tag,
    resolved: ResolvedAddress,
) -> Result<GroupReport, CoreError> {
    if tag.is_empty() {
        return Ok(GroupReport {
            group_id: group.id.clone(),
            outcome: GroupOutcome::Skipped,
            actions: Vec::new(),
            errors: Vec::new(),
        });
    }

    let mut tag_seen = false;
    let mut replaced = false;
    let mut actions = Vec::new();
    let mut errors = Vec::new();

    for rule in &group.ingress {
        match classify(rule, tag, resolved, &group.id)? {
            Disposition::Unmanaged | Disposition::OtherFamily => {}

            Disposition::Fresh(range) => {
                tag_seen = true;
                info!(group = %group.id, %tag, cidr = %range.cidr, "rule matches current address");
                actions.push(RuleAction {
                    op: RuleOp::Keep,
                    family: resolved.family(),
                    cidr: range.cidr.clone(),
                });
            }

            Disposition::Stale(range) => {
                tag_seen = true;
                replaced = true;
                info!(
                    group = %group.id, %tag, old = %range.cidr, new = %resolved.cidr(),
                    "rule is stale, replacing"
                );

                match gateway.remove_rule(&group.id, rule).await {
                    Ok(()) => actions.push(RuleAction {
                        op: RuleOp::Remove,
                        family: resolved.family(),
                        cidr: range.cidr.clone(),
                    }),
                    Err(e) => {
                        warn!(group = %group.id, cidr = %range.cidr, error = %e, "failed to remove stale rule");
                        errors.push(OperationError {
                            op: RuleOp::Remove,
                            cidr: range.cidr.clone(),
                            message: e.to_string(),
                        });
                    }
                }

                // Best effort: the add is attempted even when the remove
                // failed, so the allow-list regains the current address.
                match gateway
                    .add_rule(&group.id, resolved.family(), &resolved.cidr(), tag)
                    .await
                {
                    Ok(()) => actions.push(RuleAction {
                        op: RuleOp::Add,
                        family: resolved.family(),
                        cidr: resolved.cidr(),
                    }),
                    Err(e) => {
                        warn!(group = %group.id, cidr = %resolved.cidr(), error = %e, "failed to add replacement rule");
                        errors.push(OperationError {
                            op: RuleOp::Add,
                            cidr: resolved.cidr(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }
    }

    if !tag_seen {
        info!(group = %group.id, %tag, cidr = %resolved.cidr(), "no managed rule for tag, creating");
        match gateway
            .add_rule(&group.id, resolved.family(), &resolved.cidr(), tag)
            .await
        {
            Ok(()) => actions.push(RuleAction {
                op: RuleOp::Add,
                family: resolved.family(),
                cidr: resolved.cidr(),
            }),
            Err(e) => {
                warn!(group = %group.id, cidr = %resolved.cidr(), error = %e, "failed to create rule");
                errors.push(OperationError {
                    op: RuleOp::Add,
                    cidr: resolved.cidr(),
                    message: e.to_string(),
                });
            }
        }
    }

    let outcome = if !tag_seen {
        GroupOutcome::Created
    } else if replaced {
        GroupOutcome::Replaced
    } else {
        GroupOutcome::Matched
    };

    Ok(GroupReport {
        group_id: group.id.clone(),
        outcome,
        actions,
        errors,
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::net::IpAddr;
    use std::sync::Mutex;

    use super::*;
    use crate::model::AddressRange;

    // ── Recording mock gateway ──────────────────────────────────────

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Remove {
            group: String,
            cidr: String,
        },
        Add {
            group: String,
            family: AddressFamily,
            cidr: String,
            tag: String,
        },
    }

    #[derive(Default)]
    struct MockGateway {
        calls: Mutex<Vec<Call>>,
        fail_remove_in: Option<String>,
        fail_add_in: Option<String>,
    }

    impl MockGateway {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl FirewallGateway for MockGateway {
        async fn list_groups(&self, _ids: &[GroupId]) -> Result<Vec<RuleGroup>, CoreError> {
            Ok(Vec::new())
        }

        async fn add_rule(
            &self,
            group: &GroupId,
            family: AddressFamily,
            cidr: &str,
            tag: &Tag,
        ) -> Result<(), CoreError> {
            self.calls.lock().unwrap().push(Call::Add {
                group: group.to_string(),
                family,
                cidr: cidr.to_owned(),
                tag: tag.to_string(),
            });
            if self.fail_add_in.as_deref() == Some(group.as_str()) {
                return Err(CoreError::Transient {
                    message: "connection reset".into(),
                });
            }
            Ok(())
        }

        async fn remove_rule(&self, group: &GroupId, rule: &IngressRule) -> Result<(), CoreError> {
            let cidr = rule.range().map(|r| r.cidr.clone()).unwrap_or_default();
            self.calls.lock().unwrap().push(Call::Remove {
                group: group.to_string(),
                cidr,
            });
            if self.fail_remove_in.as_deref() == Some(group.as_str()) {
                return Err(CoreError::Transient {
                    message: "connection reset".into(),
                });
            }
            Ok(())
        }
    }

    // ── Builders ────────────────────────────────────────────────────

    fn v4_rule(cidr: &str, description: &str) -> IngressRule {
        IngressRule {
            ipv4: Some(AddressRange {
                cidr: cidr.into(),
                description: Some(description.into()),
            }),
            ipv6: None,
        }
    }

    fn v6_rule(cidr: &str, description: &str) -> IngressRule {
        IngressRule {
            ipv4: None,
            ipv6: Some(AddressRange {
                cidr: cidr.into(),
                description: Some(description.into()),
            }),
        }
    }

    fn group(id: &str, ingress: Vec<IngressRule>) -> RuleGroup {
        RuleGroup {
            id: GroupId::from(id),
            name: None,
            ingress,
        }
    }

    fn addr(s: &str) -> ResolvedAddress {
        ResolvedAddress::from(s.parse::<IpAddr>().unwrap())
    }

    async fn run(
        gateway: &MockGateway,
        groups: Vec<RuleGroup>,
        tag: &str,
        resolved: &str,
    ) -> ReconciliationReport {
        reconcile(gateway, &groups, &Tag::from(tag), addr(resolved))
            .await
            .unwrap()
    }

    // ── Create / match / replace ────────────────────────────────────

    #[tokio::test]
    async fn create_if_absent() {
        let gw = MockGateway::default();
        let report = run(&gw, vec![group("sg-1", vec![])], "home", "203.0.113.7").await;

        assert_eq!(report.groups[0].outcome, GroupOutcome::Created);
        assert_eq!(
            gw.calls(),
            vec![Call::Add {
                group: "sg-1".into(),
                family: AddressFamily::Ipv4,
                cidr: "203.0.113.7/32".into(),
                tag: "home".into(),
            }]
        );
    }

    #[tokio::test]
    async fn matched_rule_is_idempotent() {
        let gw = MockGateway::default();
        let groups = vec![group("sg-1", vec![v4_rule("203.0.113.7/32", "home")])];

        let first = run(&gw, groups.clone(), "home", "203.0.113.7").await;
        assert_eq!(first.groups[0].outcome, GroupOutcome::Matched);
        assert!(gw.calls().is_empty(), "matched rule must issue no mutations");

        // Second pass over the same state: still matched, still zero calls.
        let second = run(&gw, groups, "home", "203.0.113.7").await;
        assert_eq!(second.groups[0].outcome, GroupOutcome::Matched);
        assert!(gw.calls().is_empty());
        assert_eq!(second.mutations(), 0);
    }

    #[tokio::test]
    async fn replace_on_change_removes_then_adds() {
        let gw = MockGateway::default();
        let groups = vec![group("sg-1", vec![v4_rule("203.0.113.7/32", "home")])];

        let report = run(&gw, groups, "home", "198.51.100.9").await;

        assert_eq!(report.groups[0].outcome, GroupOutcome::Replaced);
        assert_eq!(
            gw.calls(),
            vec![
                Call::Remove {
                    group: "sg-1".into(),
                    cidr: "203.0.113.7/32".into(),
                },
                Call::Add {
                    group: "sg-1".into(),
                    family: AddressFamily::Ipv4,
                    cidr: "198.51.100.9/32".into(),
                    tag: "home".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn prefix_length_is_ignored_for_matching() {
        let gw = MockGateway::default();
        let groups = vec![group("sg-1", vec![v4_rule("203.0.113.7/24", "home")])];

        let report = run(&gw, groups, "home", "203.0.113.7").await;

        assert_eq!(report.groups[0].outcome, GroupOutcome::Matched);
        assert!(gw.calls().is_empty());
    }

    // ── Dual-stack ──────────────────────────────────────────────────

    #[tokio::test]
    async fn dual_stack_families_are_independent() {
        let gw = MockGateway::default();
        let groups = vec![group(
            "sg-1",
            vec![
                v4_rule("203.0.113.7/32", "home"),
                v6_rule("2001:db8::7/128", "home"),
            ],
        )];

        // Only the IPv4 address changed; the IPv6 rule stays untouched.
        let report = run(&gw, groups, "home", "198.51.100.9").await;

        assert_eq!(report.groups[0].outcome, GroupOutcome::Replaced);
        assert_eq!(
            gw.calls(),
            vec![
                Call::Remove {
                    group: "sg-1".into(),
                    cidr: "203.0.113.7/32".into(),
                },
                Call::Add {
                    group: "sg-1".into(),
                    family: AddressFamily::Ipv4,
                    cidr: "198.51.100.9/32".into(),
                    tag: "home".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn missing_family_is_created_alongside_the_other() {
        let gw = MockGateway::default();
        let groups = vec![group("sg-1", vec![v6_rule("2001:db8::7/128", "home")])];

        // Only an IPv6 rule exists; an IPv4 observation creates its own rule.
        let report = run(&gw, groups, "home", "203.0.113.7").await;

        assert_eq!(report.groups[0].outcome, GroupOutcome::Created);
        assert_eq!(
            gw.calls(),
            vec![Call::Add {
                group: "sg-1".into(),
                family: AddressFamily::Ipv4,
                cidr: "203.0.113.7/32".into(),
                tag: "home".into(),
            }]
        );
    }

    // ── Non-interference ────────────────────────────────────────────

    #[tokio::test]
    async fn foreign_rules_are_never_touched() {
        let gw = MockGateway::default();
        let groups = vec![group(
            "sg-1",
            vec![
                v4_rule("10.0.0.0/8", "office-vpn"),
                v4_rule("192.0.2.1/32", ""),
            ],
        )];

        let report = run(&gw, groups, "home", "203.0.113.7").await;

        // Neither foreign rule matched the tag, so the create path runs
        // and nothing is removed.
        assert_eq!(report.groups[0].outcome, GroupOutcome::Created);
        assert_eq!(gw.calls().len(), 1);
        assert!(matches!(gw.calls()[0], Call::Add { .. }));
    }

    #[tokio::test]
    async fn rule_with_both_slots_is_unmanaged() {
        let gw = MockGateway::default();
        let odd = IngressRule {
            ipv4: Some(AddressRange {
                cidr: "198.51.100.9/32".into(),
                description: Some("home".into()),
            }),
            ipv6: Some(AddressRange {
                cidr: "2001:db8::9/128".into(),
                description: Some("home".into()),
            }),
        };
        let groups = vec![group("sg-1", vec![odd])];

        let report = run(&gw, groups, "home", "203.0.113.7").await;

        // The oddly-shaped rule never counts as the managed rule.
        assert_eq!(report.groups[0].outcome, GroupOutcome::Created);
        assert_eq!(gw.calls().len(), 1);
    }

    // ── Empty tag ───────────────────────────────────────────────────

    #[tokio::test]
    async fn empty_tag_disables_everything() {
        let gw = MockGateway::default();
        let groups = vec![group("sg-1", vec![v4_rule("203.0.113.7/32", "")])];

        let report = run(&gw, groups, "", "198.51.100.9").await;

        assert_eq!(report.groups[0].outcome, GroupOutcome::Skipped);
        assert!(gw.calls().is_empty());
    }

    // ── Error handling ──────────────────────────────────────────────

    #[tokio::test]
    async fn corrupt_cidr_aborts_the_cycle() {
        let gw = MockGateway::default();
        let groups = vec![
            group("sg-1", vec![v4_rule("not-a-cidr", "home")]),
            group("sg-2", vec![]),
        ];

        let err = reconcile(&gw, &groups, &Tag::from("home"), addr("203.0.113.7"))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::CorruptRule { .. }));
        assert!(err.is_fatal());
        assert!(gw.calls().is_empty(), "no mutation on untrustworthy state");
    }

    #[tokio::test]
    async fn corrupt_cidr_in_foreign_rule_is_ignored() {
        let gw = MockGateway::default();
        let groups = vec![group("sg-1", vec![v4_rule("garbage", "someone-else")])];

        // The CIDR is only parsed for rules carrying our tag.
        let report = run(&gw, groups, "home", "203.0.113.7").await;
        assert_eq!(report.groups[0].outcome, GroupOutcome::Created);
    }

    #[tokio::test]
    async fn failed_group_does_not_block_siblings() {
        let gw = MockGateway {
            fail_add_in: Some("sg-1".into()),
            ..MockGateway::default()
        };
        let groups = vec![group("sg-1", vec![]), group("sg-2", vec![])];

        let report = run(&gw, groups, "home", "203.0.113.7").await;

        assert_eq!(report.groups[0].outcome, GroupOutcome::Created);
        assert_eq!(report.groups[0].errors.len(), 1);
        assert_eq!(report.groups[0].errors[0].op, RuleOp::Add);

        // sg-2 was still evaluated and mutated in the same cycle.
        assert_eq!(report.groups[1].outcome, GroupOutcome::Created);
        assert!(report.groups[1].errors.is_empty());
        assert_eq!(gw.calls().len(), 2);
        assert!(report.has_errors());
    }

    #[tokio::test]
    async fn failed_remove_still_attempts_the_add() {
        let gw = MockGateway {
            fail_remove_in: Some("sg-1".into()),
            ..MockGateway::default()
        };
        let groups = vec![group("sg-1", vec![v4_rule("203.0.113.7/32", "home")])];

        let report = run(&gw, groups, "home", "198.51.100.9").await;

        assert_eq!(report.groups[0].outcome, GroupOutcome::Replaced);
        assert_eq!(report.groups[0].errors.len(), 1);
        assert_eq!(report.groups[0].errors[0].op, RuleOp::Remove);

        let calls = gw.calls();
        assert_eq!(calls.len(), 2, "remove failure must not cancel the add");
        assert!(matches!(calls[1], Call::Add { .. }));
    }
}
