//! Application grants.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::error::DomainResult;
use crate::model::{Application, ApplicationId, Principal};

use super::traits::{AssetReader, GrantReader, HierarchyReader, MembershipReader};
use super::PermissionResolver;

impl<H, G, A, M> PermissionResolver<H, G, A, M>
where
    H: HierarchyReader + 'static,
    G: GrantReader + 'static,
    A: AssetReader + 'static,
    M: MembershipReader + 'static,
{
    /// Applications granted to `principal` by currently-valid application
    /// records, sorted by id.
    #[instrument(skip(self, principal), fields(principal = %principal))]
    pub async fn granted_applications(&self, principal: &Principal) -> DomainResult<Vec<Application>> {
        let records = self.resolve_application_grants(principal).await?;
        let ids: BTreeSet<ApplicationId> = records
            .into_iter()
            .flat_map(|record| record.applications)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut applications = self.assets.applications_by_ids(&ids).await?;
        applications.sort_by(|a, b| a.id.cmp(&b.id));
        applications.dedup_by(|a, b| a.id == b.id);
        debug!(applications = applications.len(), "resolved granted applications");
        Ok(applications)
    }
}
