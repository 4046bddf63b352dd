//! `migrate-attachments`: legacy attachment files → the configured store.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, instrument, warn};
use tripdesk_core::{AttachmentRepository, AttachmentStore};
use tripdesk_domain::{Attachment, AttachmentStorage, Result as DomainResult, TripDeskError};

use super::{JobOptions, JobSummary};
use crate::errors::to_domain;

const JOB: &str = "migrate-attachments";

pub struct MigrateAttachmentsJob {
    attachments: Arc<dyn AttachmentRepository>,
    store: Arc<dyn AttachmentStore>,
    legacy_root: PathBuf,
}

impl MigrateAttachmentsJob {
    pub fn new(
        attachments: Arc<dyn AttachmentRepository>,
        store: Arc<dyn AttachmentStore>,
        legacy_root: impl Into<PathBuf>,
    ) -> Self {
        Self { attachments, store, legacy_root: legacy_root.into() }
    }

    #[instrument(skip(self))]
    pub async fn run(&self, options: JobOptions) -> DomainResult<JobSummary> {
        let pending = self.attachments.list_by_storage(AttachmentStorage::Legacy).await?;
        let mut summary = JobSummary::default();

        for attachment in pending {
            summary.processed += 1;
            if let Err(err) = self.migrate_file(&attachment, options, &mut summary).await {
                summary.record_error(JOB, &attachment.path, err);
            }
        }

        summary.log(JOB, options);
        Ok(summary)
    }

    async fn migrate_file(
        &self,
        attachment: &Attachment,
        options: JobOptions,
        summary: &mut JobSummary,
    ) -> DomainResult<()> {
        let key = attachment.path.trim_start_matches('/').to_string();

        if self.store.exists(&key).await? {
            warn!(job = JOB, path = %key, "Attachment already stored, skipping");
            summary.skipped += 1;
            if !options.dry_run {
                self.attachments.set_storage(attachment.id, AttachmentStorage::Local, &key).await?;
            }
            return Ok(());
        }

        let source = self.legacy_root.join(&key);
        if !tokio::fs::try_exists(&source).await.map_err(to_domain)? {
            return Err(TripDeskError::NotFound(format!("legacy file {}", source.display())));
        }

        if options.dry_run {
            info!(job = JOB, path = %key, "Would migrate attachment");
            summary.migrated += 1;
            return Ok(());
        }

        let bytes = tokio::fs::read(&source).await.map_err(to_domain)?;
        self.store.put(&key, bytes).await?;
        self.attachments.set_storage(attachment.id, AttachmentStorage::Local, &key).await?;
        summary.migrated += 1;
        Ok(())
    }
}
