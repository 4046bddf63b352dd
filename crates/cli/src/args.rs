//! Command-line arguments

use std::path::PathBuf;

use anyhow::{anyhow, bail};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use tripdesk_domain::{DateRangePreset, LeadStatus, Platform, ReportFilters, Vocabulary};
use tripdesk_infra::JobOptions;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "tripdesk")]
#[command(version, about = "TripDesk back-office operations")]
pub struct Cli {
    /// Raise log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Config file to use instead of the environment and usual locations.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the database schema if it is missing.
    Init,
    /// Turn legacy cost rows into invoices and vendor bills.
    MigrateCosts(JobArgs),
    /// Turn legacy paid amounts into customer payments.
    MigratePayments(JobArgs),
    /// Copy legacy attachment files into the attachment store.
    MigrateAttachments(JobArgs),
    /// Grant role defaults to users without direct permissions.
    BackfillPermissions(JobArgs),
    /// Print the dashboard summary for a date range.
    Report(ReportArgs),
    /// Print leave allocations, usage and remaining days for a user.
    LeaveBalance {
        #[arg(long)]
        user: Uuid,
        /// Calendar year, current year when omitted.
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct JobArgs {
    /// Report what would be migrated without writing anything.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl JobArgs {
    pub const fn options(self) -> JobOptions {
        JobOptions { dry_run: self.dry_run }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// today, yesterday, last_7_days, last_30_days, month_to_date,
    /// quarter_to_date or year_to_date. Ignored when --from/--to are given.
    #[arg(long, default_value = "month_to_date")]
    pub preset: String,
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
    #[arg(long)]
    pub sales_user: Option<Uuid>,
    #[arg(long)]
    pub operation_user: Option<Uuid>,
    /// Lead platform key, e.g. `facebook`.
    #[arg(long)]
    pub source: Option<String>,
    /// Lead status key, e.g. `confirmed`.
    #[arg(long)]
    pub stage: Option<String>,
}

impl ReportArgs {
    pub fn preset(&self) -> anyhow::Result<DateRangePreset> {
        if let (Some(start), Some(end)) = (self.from, self.to) {
            if start > end {
                bail!("--from {start} is after --to {end}");
            }
            return Ok(DateRangePreset::Custom { start, end });
        }
        DateRangePreset::from_key(&self.preset)
            .ok_or_else(|| anyhow!("unknown preset '{}'", self.preset))
    }

    pub fn filters(&self) -> anyhow::Result<ReportFilters> {
        let source = self
            .source
            .as_deref()
            .map(|key| Platform::from_key(key).ok_or_else(|| anyhow!("unknown source '{key}'")))
            .transpose()?;
        let stage = self
            .stage
            .as_deref()
            .map(|key| LeadStatus::from_key(key).ok_or_else(|| anyhow!("unknown stage '{key}'")))
            .transpose()?;

        Ok(ReportFilters {
            sales_user: self.sales_user,
            operation_user: self.operation_user,
            source,
            stage,
        })
    }
}
