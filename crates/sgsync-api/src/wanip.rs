// External address discovery by consensus.
//
// Queries several plaintext-IP HTTP providers concurrently and accepts an
// answer only when a strict majority of the successful responses agree.
// A single flaky or lying provider therefore cannot steer the firewall.

use std::net::IpAddr;

use futures_util::future::join_all;
use tracing::{debug, warn};
use url::Url;

use crate::Error;

/// Providers queried when none are configured. All return the caller's
/// address as plain text.
pub const DEFAULT_PROVIDERS: &[&str] = &[
    "https://checkip.amazonaws.com/",
    "https://api.ipify.org/",
    "https://icanhazip.com/",
    "https://ident.me/",
];

/// Consensus-based resolver for the caller's public address.
pub struct WanIpResolver {
    http: reqwest::Client,
    providers: Vec<Url>,
}

impl WanIpResolver {
    /// Build a resolver over the default provider set.
    pub fn new(transport: &crate::TransportConfig) -> Result<Self, Error> {
        let providers = DEFAULT_PROVIDERS
            .iter()
            .map(|raw| Url::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            http: transport.build_client()?,
            providers,
        })
    }

    /// Build a resolver over a custom provider set.
    pub fn with_providers(
        transport: &crate::TransportConfig,
        providers: Vec<Url>,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            providers,
        })
    }

    /// Resolve the current external address.
    ///
    /// Fails with [`Error::NoConsensus`] when no provider answers or the
    /// answers lack a strict majority.
    pub async fn external_ip(&self) -> Result<IpAddr, Error> {
        let lookups = self.providers.iter().map(|url| self.query(url));
        let answers: Vec<IpAddr> = join_all(lookups).await.into_iter().flatten().collect();

        let queried = self.providers.len();
        let answered = answers.len();

        // Tally in first-seen order so logging is deterministic.
        let mut tally: Vec<(IpAddr, usize)> = Vec::new();
        for ip in &answers {
            match tally.iter_mut().find(|(seen, _)| seen == ip) {
                Some((_, count)) => *count += 1,
                None => tally.push((*ip, 1)),
            }
        }

        match tally.iter().max_by_key(|(_, count)| *count) {
            Some(&(ip, count)) if count * 2 > answered => {
                debug!(%ip, votes = count, answered, "external address consensus");
                Ok(ip)
            }
            _ => Err(Error::NoConsensus { queried, answered }),
        }
    }

    /// Query a single provider; failures are logged and discarded so one
    /// dead provider never fails the whole lookup.
    async fn query(&self, url: &Url) -> Option<IpAddr> {
        let body = match self.http.get(url.clone()).send().await {
            Ok(resp) if resp.status().is_success() => resp.text().await.ok()?,
            Ok(resp) => {
                warn!(%url, status = %resp.status(), "address provider returned an error");
                return None;
            }
            Err(e) => {
                warn!(%url, error = %e, "address provider unreachable");
                return None;
            }
        };

        match body.trim().parse::<IpAddr>() {
            Ok(ip) => {
                debug!(%url, %ip, "address provider answered");
                Some(ip)
            }
            Err(_) => {
                warn!(%url, "address provider returned unparsable body");
                None
            }
        }
    }
}
