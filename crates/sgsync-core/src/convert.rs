// ── Wire ⇄ model conversion ──
//
// The api crate speaks the control plane's camelCase JSON; the model is
// what the reconciler reasons about. Revocation goes back out in the
// exact wire shape the listing returned, since rules have no ids.

use sgsync_api::types::{AddressRangeResponse, IngressRuleResponse, SecurityGroupResponse};

use crate::model::{AddressRange, GroupId, IngressRule, RuleGroup};

pub fn group_from_wire(wire: SecurityGroupResponse) -> RuleGroup {
    RuleGroup {
        id: GroupId::from(wire.id),
        name: wire.name,
        ingress: wire.ingress_rules.into_iter().map(rule_from_wire).collect(),
    }
}

pub fn rule_from_wire(wire: IngressRuleResponse) -> IngressRule {
    IngressRule {
        ipv4: wire.ipv4_range.map(range_from_wire),
        ipv6: wire.ipv6_range.map(range_from_wire),
    }
}

fn range_from_wire(wire: AddressRangeResponse) -> AddressRange {
    AddressRange {
        cidr: wire.cidr,
        description: wire.description,
    }
}

pub fn rule_to_wire(rule: &IngressRule) -> IngressRuleResponse {
    IngressRuleResponse {
        ipv4_range: rule.ipv4.as_ref().map(range_to_wire),
        ipv6_range: rule.ipv6.as_ref().map(range_to_wire),
    }
}

fn range_to_wire(range: &AddressRange) -> AddressRangeResponse {
    AddressRangeResponse {
        cidr: range.cidr.clone(),
        description: range.description.clone(),
    }
}
