// ── External address seam ──

use sgsync_api::{TransportConfig, WanIpResolver};
use url::Url;

use crate::error::CoreError;
use crate::model::ResolvedAddress;

/// Resolves the caller's current public address. Stateless; one lookup
/// per reconciliation cycle.
pub trait AddressSource {
    fn resolve(&self) -> impl Future<Output = Result<ResolvedAddress, CoreError>> + Send;
}

impl AddressSource for WanIpResolver {
    async fn resolve(&self) -> Result<ResolvedAddress, CoreError> {
        let ip = self.external_ip().await?;
        Ok(ResolvedAddress::from(ip))
    }
}

/// Build the production address source, optionally over a custom provider
/// list (falls back to the api crate's defaults).
pub fn wan_source(
    transport: &TransportConfig,
    providers: Option<Vec<Url>>,
) -> Result<WanIpResolver, CoreError> {
    let resolver = match providers {
        Some(urls) => WanIpResolver::with_providers(transport, urls)?,
        None => WanIpResolver::new(transport)?,
    };
    Ok(resolver)
}
