//! One-shot data migration jobs
//!
//! Every job is idempotent: records whose natural key already exists in the
//! target are skipped. In dry-run mode a job reports what it would migrate and
//! writes nothing. A failing record is counted and logged, and the batch moves
//! on to the next one.

pub mod attachments;
pub mod costs;
pub mod payments;
pub mod permissions;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use tripdesk_common::ErrorClassification;
use tripdesk_domain::TripDeskError;

use crate::errors::InfraError;

pub use attachments::MigrateAttachmentsJob;
pub use costs::MigrateCostsJob;
pub use payments::MigratePaymentsJob;
pub use permissions::BackfillPermissionsJob;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobOptions {
    pub dry_run: bool,
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub processed: usize,
    /// Records written, or that would be in dry-run mode.
    pub migrated: usize,
    pub skipped: usize,
    pub missing_relation: usize,
    pub errors: usize,
}

impl JobSummary {
    pub(crate) fn record_error(&mut self, job: &'static str, record: &str, err: TripDeskError) {
        self.errors += 1;
        let err = InfraError(err);
        if err.is_critical() {
            error!(job, record, error = %err.0, "Record failed");
        } else {
            warn!(job, record, error = %err.0, "Record failed");
        }
    }

    pub(crate) fn log(&self, job: &'static str, options: JobOptions) {
        info!(
            job,
            dry_run = options.dry_run,
            processed = self.processed,
            migrated = self.migrated,
            skipped = self.skipped,
            missing_relation = self.missing_relation,
            errors = self.errors,
            "Job finished"
        );
    }
}
