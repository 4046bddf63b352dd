//! Command dispatch

use chrono::Datelike;
use serde_json::{json, Value};
use tracing::info;
use tripdesk_core::leave::allocation::remaining;
use tripdesk_infra::{JobOptions, JobSummary};

use crate::args::Command;
use crate::context::AppContext;

/// Run one command and return its JSON output.
pub async fn run(ctx: &AppContext, command: Command) -> anyhow::Result<Value> {
    match command {
        Command::Init => Ok(json!({ "database": ctx.db.path().display().to_string() })),
        Command::MigrateCosts(job) => {
            let options = job.options();
            let summary = ctx.migrate_costs_job().run(options).await?;
            Ok(job_output("migrate-costs", options, &summary))
        }
        Command::MigratePayments(job) => {
            let options = job.options();
            let summary = ctx.migrate_payments_job().run(options).await?;
            Ok(job_output("migrate-payments", options, &summary))
        }
        Command::MigrateAttachments(job) => {
            let options = job.options();
            let summary = ctx.migrate_attachments_job().run(options).await?;
            Ok(job_output("migrate-attachments", options, &summary))
        }
        Command::BackfillPermissions(job) => {
            let options = job.options();
            let summary = ctx.backfill_permissions_job().run(options).await?;
            Ok(job_output("backfill-permissions", options, &summary))
        }
        Command::Report(report) => {
            let preset = report.preset()?;
            let filters = report.filters()?;
            let summary = ctx.reporting().summary(preset, &filters).await?;
            info!(total_leads = summary.total_leads, "Report generated");
            Ok(serde_json::to_value(summary)?)
        }
        Command::LeaveBalance { user, year } => {
            let year = year.unwrap_or_else(|| ctx.clock.today().year());
            let allocation = ctx.leave_allocation();
            let budget = allocation.allocations();
            let used = allocation.used_leaves(user, Some(year)).await?;

            Ok(json!({
                "user_id": user,
                "year": year,
                "allocations": budget,
                "used": used,
                "remaining": remaining(&budget, &used),
            }))
        }
    }
}

fn job_output(job: &str, options: JobOptions, summary: &JobSummary) -> Value {
    json!({ "job": job, "dry_run": options.dry_run, "summary": summary })
}
