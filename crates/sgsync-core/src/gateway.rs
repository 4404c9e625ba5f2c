// ── Firewall gateway seam ──
//
// The reconciler talks to the control plane exclusively through this
// trait: list, add, remove — one group or rule per call, no batching.
// Production impl wraps `sgsync_api::FirewallClient`; tests substitute a
// recording mock.

use sgsync_api::FirewallClient;
use sgsync_api::types::IngressRuleRequest;

use crate::config::GatewayConfig;
use crate::convert;
use crate::error::CoreError;
use crate::model::{AddressFamily, GroupId, IngressRule, RuleGroup, Tag};

/// Thin operation set over the cloud firewall control plane.
pub trait FirewallGateway {
    /// List the given rule groups. Failing here is fatal to the cycle:
    /// nothing has been enumerated, so nothing may be mutated.
    fn list_groups(
        &self,
        ids: &[GroupId],
    ) -> impl Future<Output = Result<Vec<RuleGroup>, CoreError>> + Send;

    /// Add one ingress rule allowing `cidr`, labeled with `tag`.
    fn add_rule(
        &self,
        group: &GroupId,
        family: AddressFamily,
        cidr: &str,
        tag: &Tag,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Remove one existing ingress rule.
    fn remove_rule(
        &self,
        group: &GroupId,
        rule: &IngressRule,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl FirewallGateway for FirewallClient {
    async fn list_groups(&self, ids: &[GroupId]) -> Result<Vec<RuleGroup>, CoreError> {
        let raw_ids: Vec<String> = ids.iter().map(|id| id.as_str().to_owned()).collect();
        let groups = self.describe_groups(&raw_ids).await?;
        Ok(groups.into_iter().map(convert::group_from_wire).collect())
    }

    async fn add_rule(
        &self,
        group: &GroupId,
        family: AddressFamily,
        cidr: &str,
        tag: &Tag,
    ) -> Result<(), CoreError> {
        let request = IngressRuleRequest {
            family: family.to_string(),
            cidr: cidr.to_owned(),
            description: tag.as_str().to_owned(),
        };
        self.authorize_ingress(group.as_str(), &request).await?;
        Ok(())
    }

    async fn remove_rule(&self, group: &GroupId, rule: &IngressRule) -> Result<(), CoreError> {
        self.revoke_ingress(group.as_str(), &convert::rule_to_wire(rule))
            .await?;
        Ok(())
    }
}

/// Open a control-plane session from gateway settings.
pub fn connect(config: &GatewayConfig) -> Result<FirewallClient, CoreError> {
    let client = FirewallClient::from_api_key(
        config.endpoint.as_str(),
        &config.api_key,
        &config.transport(),
    )?;
    Ok(client)
}
