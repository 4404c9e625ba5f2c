// ── Domain model ──
//
// All identity here is value-based: groups are opaque ids, and managed
// rules are recognized by the tag stored in their description, never by
// rule identity — the rule's match criteria change whenever the operator's
// address does.

mod address;
mod rule;

pub use address::{AddressFamily, ResolvedAddress};
pub use rule::{AddressRange, IngressRule, RuleGroup};

use serde::{Deserialize, Serialize};

/// Opaque identifier of a firewall rule group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GroupId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The label identifying rules managed by this system, stored in the
/// rule's description field. Case-sensitive, exact-match only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty tag disables both the create path and stale handling.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact, case-sensitive comparison against a rule description.
    pub fn matches(&self, description: Option<&str>) -> bool {
        description == Some(self.0.as_str())
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
