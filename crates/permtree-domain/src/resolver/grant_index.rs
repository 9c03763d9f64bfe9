//! Grant index: principal -> currently-valid permission records.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, instrument};

use crate::cache::GrantCacheKey;
use crate::error::{DomainError, DomainResult};
use crate::model::{ApplicationPermission, PermissionId, Principal, UserGroupId};

use super::traits::{AssetReader, GrantReader, HierarchyReader, MembershipReader};
use super::types::GrantSet;
use super::PermissionResolver;

impl<H, G, A, M> PermissionResolver<H, G, A, M>
where
    H: HierarchyReader + 'static,
    G: GrantReader + 'static,
    A: AssetReader + 'static,
    M: MembershipReader + 'static,
{
    /// Ids of the currently-valid records that apply to `principal`.
    pub async fn resolve_grant_ids(
        &self,
        principal: &Principal,
    ) -> DomainResult<BTreeSet<PermissionId>> {
        Ok(self.resolve_grants(principal).await?.ids())
    }

    /// Currently-valid records that apply to `principal`.
    ///
    /// For a user: records naming the user, plus records naming any of the
    /// user's groups. For a group: only records naming that group.
    #[instrument(skip(self, principal), fields(principal = %principal))]
    pub async fn resolve_grants(&self, principal: &Principal) -> DomainResult<Arc<GrantSet>> {
        let cache_key = match &self.config.cache {
            Some(cache) if cache.is_enabled() => {
                let key = GrantCacheKey::new(principal.clone(), self.grants.version().await?);
                if let Some(hit) = cache.get(&key).await {
                    return Ok(hit);
                }
                Some(key)
            }
            _ => None,
        };

        let scope = self.principal_scope(principal).await?;
        let batches = try_join_all(
            scope
                .iter()
                .map(|member| self.grants.records_for_principal(member)),
        )
        .await?;
        let grants = Arc::new(GrantSet::from_records(batches.into_iter().flatten()));

        debug!(
            scope = scope.len(),
            records = grants.len(),
            "resolved grants"
        );

        if let (Some(cache), Some(key)) = (&self.config.cache, cache_key) {
            cache.insert(key, Arc::clone(&grants)).await;
        }
        Ok(grants)
    }

    /// Currently-valid application records that apply to `principal`,
    /// with the same inheritance rules as [`Self::resolve_grants`].
    pub async fn resolve_application_grants(
        &self,
        principal: &Principal,
    ) -> DomainResult<Vec<ApplicationPermission>> {
        let scope = self.principal_scope(principal).await?;
        let batches = try_join_all(
            scope
                .iter()
                .map(|member| self.grants.application_records_for_principal(member)),
        )
        .await?;

        let mut seen = BTreeSet::new();
        Ok(batches
            .into_iter()
            .flatten()
            .filter(ApplicationPermission::is_currently_valid)
            .filter(|record| seen.insert(record.id.clone()))
            .collect())
    }

    /// Groups a user inherits grants from.
    ///
    /// Groups do not belong to groups, so asking for a group's groups is an
    /// `InvalidPrincipal` error.
    pub async fn member_groups(&self, principal: &Principal) -> DomainResult<BTreeSet<UserGroupId>> {
        match principal {
            Principal::User(user) => self.membership.groups_of(user).await,
            Principal::Group(group) => Err(DomainError::InvalidPrincipal {
                value: principal.to_string(),
                reason: format!("group '{group}' cannot inherit from other groups"),
            }),
        }
    }

    /// The principal itself plus every principal it inherits from.
    ///
    /// Fails with `NotFound` for unknown users or groups.
    pub(crate) async fn principal_scope(&self, principal: &Principal) -> DomainResult<Vec<Principal>> {
        match principal {
            Principal::User(_) => {
                let groups = self.member_groups(principal).await?;
                let mut scope = Vec::with_capacity(groups.len() + 1);
                scope.push(principal.clone());
                scope.extend(groups.into_iter().map(Principal::Group));
                Ok(scope)
            }
            Principal::Group(group) => {
                if !self.membership.group_exists(group).await? {
                    return Err(DomainError::not_found("user group", group.as_str()));
                }
                Ok(vec![principal.clone()])
            }
        }
    }
}
