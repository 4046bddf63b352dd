mod support;

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use support::{clock_on, date, lead, MockReportingRepository};
use tripdesk_core::ReportingService;
use tripdesk_domain::{
    CallCenterCall, CallStatus, CallType, DateRangePreset, Invoice, InvoiceStatus, Lead,
    LeadStatus, Platform, Recorded, ReportFilters,
};
use uuid::Uuid;

fn invoice(lead_id: Uuid, on: NaiveDate, total: Decimal, status: InvoiceStatus) -> Invoice {
    let mut invoice = Invoice::new(lead_id, format!("INV-{}", on.format("%m%d")), on, total);
    invoice.status = status.into();
    invoice
}

fn call(lead_id: Uuid, on: NaiveDate, status: CallStatus) -> CallCenterCall {
    let mut call = CallCenterCall::new(lead_id, CallType::PreDeparture);
    call.status = status;
    call.created_at = on.and_hms_opt(11, 0, 0).unwrap().and_utc();
    call.updated_at = call.created_at;
    call
}

struct Seed {
    repository: MockReportingRepository,
    sales_a: Uuid,
    leads: Vec<Lead>,
}

fn seed() -> Seed {
    let creator = Uuid::new_v4();
    let sales_a = Uuid::new_v4();

    let confirmed = lead(creator, LeadStatus::Confirmed, date(2024, 5, 2));
    let mut completed = lead(creator, LeadStatus::OperationComplete, date(2024, 5, 3));
    completed.assigned_to = Some(sales_a);
    completed.platform = Some(Platform::Whatsapp);
    let mut fresh = lead(creator, LeadStatus::New, date(2024, 5, 10));
    fresh.assigned_to = Some(sales_a);
    let last_month = lead(creator, LeadStatus::Confirmed, date(2024, 4, 28));

    let invoices = vec![
        invoice(confirmed.id, date(2024, 5, 5), dec!(1000.00), InvoiceStatus::Paid),
        invoice(completed.id, date(2024, 5, 6), dec!(2500.50), InvoiceStatus::Paid),
        invoice(fresh.id, date(2024, 5, 12), dec!(500.00), InvoiceStatus::Pending),
        invoice(last_month.id, date(2024, 4, 30), dec!(750.00), InvoiceStatus::Paid),
    ];
    let calls = vec![
        call(confirmed.id, date(2024, 5, 7), CallStatus::Completed),
        call(completed.id, date(2024, 5, 8), CallStatus::NotAnswered),
        call(completed.id, date(2024, 5, 9), CallStatus::Completed),
    ];

    let leads = vec![confirmed, completed, fresh, last_month];
    Seed {
        repository: MockReportingRepository::new(leads.clone(), invoices, calls),
        sales_a,
        leads,
    }
}

fn service(repository: &MockReportingRepository) -> ReportingService {
    ReportingService::new(Arc::new(repository.clone()), Arc::new(clock_on(2024, 5, 20)))
}

#[tokio::test]
async fn month_to_date_summary() {
    let seed = seed();
    let summary = service(&seed.repository)
        .summary(DateRangePreset::MonthToDate, &ReportFilters::default())
        .await
        .unwrap();

    assert_eq!(summary.range.start, date(2024, 5, 1));
    assert_eq!(summary.range.end, date(2024, 5, 20));
    assert_eq!(summary.total_leads, 3);
    assert_eq!(summary.converted_leads, 2);
    assert_eq!(summary.conversion_rate, dec!(66.67));
    assert_eq!(summary.revenue, dec!(3500.50));
    assert_eq!(summary.leads_by_status.get("confirmed"), Some(&1));
    assert_eq!(summary.leads_by_status.get("new"), Some(&1));
    assert_eq!(summary.calls_by_status.get(&CallStatus::Completed), Some(&2));
    assert_eq!(summary.calls_by_status.get(&CallStatus::NotAnswered), Some(&1));
}

#[tokio::test]
async fn empty_range_has_zero_conversion() {
    let seed = seed();
    let summary = service(&seed.repository)
        .summary(
            DateRangePreset::Custom { start: date(2023, 1, 1), end: date(2023, 1, 31) },
            &ReportFilters::default(),
        )
        .await
        .unwrap();

    assert_eq!(summary.total_leads, 0);
    assert_eq!(summary.conversion_rate, Decimal::ZERO);
    assert_eq!(summary.revenue, Decimal::ZERO);
}

#[tokio::test]
async fn filters_narrow_every_aggregate() {
    let seed = seed();
    let filters = ReportFilters { sales_user: Some(seed.sales_a), ..ReportFilters::default() };

    let summary =
        service(&seed.repository).summary(DateRangePreset::MonthToDate, &filters).await.unwrap();

    assert_eq!(summary.total_leads, 2);
    assert_eq!(summary.converted_leads, 1);
    assert_eq!(summary.conversion_rate, dec!(50.00));
    assert_eq!(summary.revenue, dec!(2500.50));
    assert_eq!(summary.calls_by_status.values().sum::<u64>(), 2);

    let by_source = ReportFilters { source: Some(Platform::Whatsapp), ..ReportFilters::default() };
    let summary =
        service(&seed.repository).summary(DateRangePreset::MonthToDate, &by_source).await.unwrap();
    assert_eq!(summary.total_leads, 1);
}

#[tokio::test]
async fn unrecognized_statuses_count_toward_total_only() {
    let mut seed = seed();
    let mut odd = seed.leads[0].clone();
    odd.id = Uuid::new_v4();
    odd.status = Recorded::from_raw("on_hold");
    seed.leads.push(odd);
    let repository = MockReportingRepository::new(seed.leads, Vec::new(), Vec::new());

    let summary = service(&repository)
        .summary(DateRangePreset::MonthToDate, &ReportFilters::default())
        .await
        .unwrap();

    assert_eq!(summary.total_leads, 4);
    assert_eq!(summary.converted_leads, 2);
    assert_eq!(summary.leads_by_status.get("on_hold"), Some(&1));
    assert_eq!(summary.conversion_rate, dec!(50.00));
}

#[tokio::test]
async fn repeated_queries_hit_the_cache_until_filters_change() {
    let seed = seed();
    let service = service(&seed.repository);

    let first = service.dashboard(DateRangePreset::Last30Days).await.unwrap();
    let second = service.dashboard(DateRangePreset::Last30Days).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(seed.repository.query_count(), 1);

    service.dashboard(DateRangePreset::Today).await.unwrap();
    assert_eq!(seed.repository.query_count(), 2);

    let filters = ReportFilters { stage: Some(LeadStatus::Confirmed), ..ReportFilters::default() };
    service.set_filters(filters.clone()).await;
    assert_eq!(service.current_filters().await, filters);

    let filtered = service.dashboard(DateRangePreset::Last30Days).await.unwrap();
    assert_eq!(seed.repository.query_count(), 3);
    assert_eq!(filtered.total_leads, 2);
}

#[tokio::test]
async fn disabled_cache_always_queries() {
    let seed = seed();
    let service = service(&seed.repository).with_cache(false);

    service.dashboard(DateRangePreset::MonthToDate).await.unwrap();
    service.dashboard(DateRangePreset::MonthToDate).await.unwrap();

    assert_eq!(seed.repository.query_count(), 2);
}
