// ── Address types ──

use std::net::IpAddr;

use serde::Serialize;

/// Address family of a rule or a resolved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum AddressFamily {
    /// Wire form `IPV4`.
    #[strum(serialize = "IPV4")]
    Ipv4,
    /// Wire form `IPV6`.
    #[strum(serialize = "IPV6")]
    Ipv6,
}

/// The caller's current public address. Obtained once per cycle,
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedAddress(IpAddr);

impl ResolvedAddress {
    pub fn ip(&self) -> IpAddr {
        self.0
    }

    pub fn family(&self) -> AddressFamily {
        match self.0 {
            IpAddr::V4(_) => AddressFamily::Ipv4,
            IpAddr::V6(_) => AddressFamily::Ipv6,
        }
    }

    /// The CIDR written to the firewall: a host route, /32 or /128.
    pub fn cidr(&self) -> String {
        match self.0 {
            IpAddr::V4(v4) => format!("{v4}/32"),
            IpAddr::V6(v6) => format!("{v6}/128"),
        }
    }
}

impl From<IpAddr> for ResolvedAddress {
    fn from(ip: IpAddr) -> Self {
        Self(ip)
    }
}

impl std::fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}
