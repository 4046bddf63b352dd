//! Application context - wires repositories and services for one process

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tripdesk_common::{Clock, SystemClock};
use tripdesk_core::{LeaveAllocationService, ReportingService};
use tripdesk_domain::{Config, Result};
use tripdesk_infra::config;
use tripdesk_infra::database::{
    DbManager, SqliteAttachmentRepository, SqliteBillingRepository, SqliteLeadRepository,
    SqliteLeaveRepository, SqlitePermissionRepository, SqliteReportingRepository,
    SqliteUserRepository,
};
use tripdesk_infra::jobs::{
    BackfillPermissionsJob, MigrateAttachmentsJob, MigrateCostsJob, MigratePaymentsJob,
};
use tripdesk_infra::LocalAttachmentStore;

pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub clock: Arc<dyn Clock>,
}

impl AppContext {
    /// Load configuration from `path`, or from the environment and the usual
    /// config files when no path is given.
    pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
        match path {
            Some(path) => config::load_from_file(Some(path)),
            None => config::load(),
        }
    }

    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Open the database and make sure the schema exists.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let db = DbManager::from_config(&config.database)?;
        db.run_migrations()?;
        info!(db_path = %config.database.path, "TripDesk context ready");

        Ok(Self { config, db: Arc::new(db), clock })
    }

    pub fn reporting(&self) -> ReportingService {
        ReportingService::new(
            Arc::new(SqliteReportingRepository::new(self.db.clone())),
            self.clock.clone(),
        )
        .with_cache(self.config.reporting.cache_enabled)
    }

    pub fn leave_allocation(&self) -> LeaveAllocationService {
        LeaveAllocationService::new(
            Arc::new(SqliteLeaveRepository::new(self.db.clone())),
            self.clock.clone(),
        )
    }

    fn billing(&self) -> Arc<SqliteBillingRepository> {
        Arc::new(SqliteBillingRepository::new(self.db.clone()))
    }

    pub fn migrate_costs_job(&self) -> MigrateCostsJob {
        MigrateCostsJob::new(
            self.billing(),
            Arc::new(SqliteLeadRepository::new(self.db.clone())),
            self.clock.clone(),
        )
    }

    pub fn migrate_payments_job(&self) -> MigratePaymentsJob {
        MigratePaymentsJob::new(self.billing(), self.clock.clone())
    }

    pub fn migrate_attachments_job(&self) -> MigrateAttachmentsJob {
        let attachments = &self.config.attachments;
        MigrateAttachmentsJob::new(
            Arc::new(SqliteAttachmentRepository::new(self.db.clone())),
            Arc::new(LocalAttachmentStore::new(&attachments.root)),
            &attachments.legacy_root,
        )
    }

    pub fn backfill_permissions_job(&self) -> BackfillPermissionsJob {
        BackfillPermissionsJob::new(
            Arc::new(SqliteUserRepository::new(self.db.clone())),
            Arc::new(SqlitePermissionRepository::new(self.db.clone())),
            self.clock.clone(),
        )
    }
}
