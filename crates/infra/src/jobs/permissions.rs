//! `backfill-permissions`: role defaults → direct permission rows.

use std::sync::Arc;

use tracing::{debug, info, instrument};
use tripdesk_common::Clock;
use tripdesk_core::{default_permissions_for, PermissionRepository, UserDirectory};
use tripdesk_domain::{PermissionGrant, Result as DomainResult, User};

use super::{JobOptions, JobSummary};

const JOB: &str = "backfill-permissions";

pub struct BackfillPermissionsJob {
    users: Arc<dyn UserDirectory>,
    permissions: Arc<dyn PermissionRepository>,
    clock: Arc<dyn Clock>,
}

impl BackfillPermissionsJob {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        permissions: Arc<dyn PermissionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { users, permissions, clock }
    }

    /// Users that already hold any direct permission are left alone.
    #[instrument(skip(self))]
    pub async fn run(&self, options: JobOptions) -> DomainResult<JobSummary> {
        let users = self.users.list_users().await?;
        let mut summary = JobSummary::default();

        for user in users {
            summary.processed += 1;
            if let Err(err) = self.backfill_user(&user, options, &mut summary).await {
                summary.record_error(JOB, &user.email, err);
            }
        }

        summary.log(JOB, options);
        Ok(summary)
    }

    async fn backfill_user(
        &self,
        user: &User,
        options: JobOptions,
        summary: &mut JobSummary,
    ) -> DomainResult<()> {
        if !self.permissions.direct_permissions(user.id).await?.is_empty() {
            debug!(job = JOB, user = %user.email, "User already has permissions, skipping");
            summary.skipped += 1;
            return Ok(());
        }

        let defaults = default_permissions_for(user.role);
        if defaults.is_empty() {
            summary.skipped += 1;
            return Ok(());
        }

        if options.dry_run {
            info!(job = JOB, user = %user.email, permissions = defaults.len(), "Would grant role defaults");
            summary.migrated += 1;
            return Ok(());
        }

        let granted_at = self.clock.now();
        let grants: Vec<PermissionGrant> = defaults
            .into_iter()
            .map(|permission| PermissionGrant { permission, granted_by: None, granted_at })
            .collect();
        self.permissions.replace_direct_permissions(user.id, &grants).await?;
        summary.migrated += 1;
        Ok(())
    }
}
