// Wire types for the firewall control plane (REST + JSON, camelCase).

use serde::{Deserialize, Serialize};

/// Envelope for `GET v1/groups`.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupListResponse {
    pub data: Vec<SecurityGroupResponse>,
}

/// One security group as returned by the control plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupResponse {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ingress_rules: Vec<IngressRuleResponse>,
}

/// One ingress rule. Exactly one of the two range slots is populated for
/// rules this system manages; anything else is someone else's rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRuleResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_range: Option<AddressRangeResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_range: Option<AddressRangeResponse>,
}

/// A CIDR range with its free-text description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRangeResponse {
    pub cidr: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body for `POST v1/groups/{id}/ingress`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRuleRequest {
    /// `"IPV4"` or `"IPV6"`.
    pub family: String,
    pub cidr: String,
    pub description: String,
}
