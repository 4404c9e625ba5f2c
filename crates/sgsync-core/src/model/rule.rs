// ── Rule group and ingress rule ──

use serde::Serialize;

use super::{AddressFamily, GroupId};

/// A CIDR range plus the free-text description the control plane stores
/// with it. The description is where the managing tag lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressRange {
    pub cidr: String,
    pub description: Option<String>,
}

/// One ingress permission entry. Rules this system produces populate
/// exactly one of the two slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngressRule {
    pub ipv4: Option<AddressRange>,
    pub ipv6: Option<AddressRange>,
}

impl IngressRule {
    /// The rule's address family, derived from which slot is populated.
    /// `None` when both or neither are set — not a shape this system
    /// produces, so such rules are treated as unmanaged.
    pub fn family(&self) -> Option<AddressFamily> {
        match (&self.ipv4, &self.ipv6) {
            (Some(_), None) => Some(AddressFamily::Ipv4),
            (None, Some(_)) => Some(AddressFamily::Ipv6),
            _ => None,
        }
    }

    /// The populated range, if the rule is well-formed.
    pub fn range(&self) -> Option<&AddressRange> {
        match self.family()? {
            AddressFamily::Ipv4 => self.ipv4.as_ref(),
            AddressFamily::Ipv6 => self.ipv6.as_ref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.range()?.description.as_deref()
    }
}

/// A rule group as listed from the control plane. Never cached across
/// cycles; every cycle re-reads current state.
#[derive(Debug, Clone, Serialize)]
pub struct RuleGroup {
    pub id: GroupId,
    pub name: Option<String>,
    pub ingress: Vec<IngressRule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(cidr: &str, description: &str) -> AddressRange {
        AddressRange {
            cidr: cidr.into(),
            description: Some(description.into()),
        }
    }

    #[test]
    fn family_from_populated_slot() {
        let v4 = IngressRule {
            ipv4: Some(range("203.0.113.7/32", "home")),
            ipv6: None,
        };
        assert_eq!(v4.family(), Some(AddressFamily::Ipv4));
        assert_eq!(v4.description(), Some("home"));

        let v6 = IngressRule {
            ipv4: None,
            ipv6: Some(range("2001:db8::7/128", "home")),
        };
        assert_eq!(v6.family(), Some(AddressFamily::Ipv6));
    }

    #[test]
    fn both_or_neither_slot_has_no_family() {
        let both = IngressRule {
            ipv4: Some(range("203.0.113.7/32", "home")),
            ipv6: Some(range("2001:db8::7/128", "home")),
        };
        assert_eq!(both.family(), None);
        assert_eq!(both.range(), None);

        let neither = IngressRule {
            ipv4: None,
            ipv6: None,
        };
        assert_eq!(neither.family(), None);
    }
}
