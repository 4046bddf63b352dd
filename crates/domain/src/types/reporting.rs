//! Dashboard reporting types

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::leave::DateSpan;
use super::vocabulary::{CallStatus, LeadStatus, Platform};

/// Named date ranges offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "snake_case")]
pub enum DateRangePreset {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    MonthToDate,
    QuarterToDate,
    YearToDate,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRangePreset {
    /// Resolve to an inclusive day span relative to `today`.
    pub fn resolve(&self, today: NaiveDate) -> DateSpan {
        let (start, end) = match *self {
            Self::Today => (today, today),
            Self::Yesterday => {
                let yesterday = today - Duration::days(1);
                (yesterday, yesterday)
            }
            Self::Last7Days => (today - Duration::days(6), today),
            Self::Last30Days => (today - Duration::days(29), today),
            Self::MonthToDate => (today.with_day(1).unwrap_or(today), today),
            Self::QuarterToDate => {
                let quarter_month = (today.month0() / 3) * 3 + 1;
                let start = NaiveDate::from_ymd_opt(today.year(), quarter_month, 1).unwrap_or(today);
                (start, today)
            }
            Self::YearToDate => (today.with_ordinal(1).unwrap_or(today), today),
            Self::Custom { start, end } => (start, end),
        };
        DateSpan::new(start, end)
    }

    /// Parse a preset key such as `last_7_days`. `custom` needs explicit dates.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "today" => Some(Self::Today),
            "yesterday" => Some(Self::Yesterday),
            "last_7_days" => Some(Self::Last7Days),
            "last_30_days" => Some(Self::Last30Days),
            "month_to_date" => Some(Self::MonthToDate),
            "quarter_to_date" => Some(Self::QuarterToDate),
            "year_to_date" => Some(Self::YearToDate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportFilters {
    pub sales_user: Option<Uuid>,
    pub operation_user: Option<Uuid>,
    pub source: Option<Platform>,
    pub stage: Option<LeadStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub range: DateSpan,
    pub total_leads: u64,
    /// Keyed by stored status text so unrecognized values are still counted.
    pub leads_by_status: BTreeMap<String, u64>,
    pub converted_leads: u64,
    /// Percentage, two decimal places.
    pub conversion_rate: Decimal,
    /// Sum of `total_amount` over paid invoices.
    pub revenue: Decimal,
    pub calls_by_status: BTreeMap<CallStatus, u64>,
}
