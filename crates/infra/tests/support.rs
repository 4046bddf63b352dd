#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tempfile::TempDir;
use tripdesk_common::MockClock;
use tripdesk_domain::{
    Invoice, Lead, LeadStatus, Platform, Priority, Role, ServiceStatuses, User,
};
use tripdesk_infra::database::{DbManager, SqliteBillingRepository, SqliteLeadRepository, SqliteUserRepository};
use tripdesk_core::LeadRepository;
use uuid::Uuid;

/// Temporary migrated database that lives as long as the value.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    pub dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir should be created");
        let manager = DbManager::new(dir.path().join("tripdesk.db"), 4)
            .expect("db manager should be created");
        manager.run_migrations().expect("migrations should apply");

        Self { manager: Arc::new(manager), dir }
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }

    pub fn users(&self) -> SqliteUserRepository {
        SqliteUserRepository::new(self.manager.clone())
    }

    pub fn leads(&self) -> SqliteLeadRepository {
        SqliteLeadRepository::new(self.manager.clone())
    }

    pub fn billing(&self) -> SqliteBillingRepository {
        SqliteBillingRepository::new(self.manager.clone())
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn clock_on(y: i32, m: u32, d: u32) -> Arc<MockClock> {
    Arc::new(MockClock::new(
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).single().expect("valid timestamp"),
    ))
}

pub async fn seed_user(db: &TestDatabase, name: &str, role: Role, is_manager: bool) -> User {
    let mut user = User::new(name, format!("{}@example.com", name.to_lowercase()), role);
    user.is_manager = is_manager;
    db.users().save(&user).await.expect("user should be saved");
    user
}

pub fn lead(created_by: Uuid, reference: &str, status: LeadStatus, created_on: NaiveDate) -> Lead {
    let created_at = created_on.and_hms_opt(9, 30, 0).expect("valid time").and_utc();
    Lead {
        id: Uuid::new_v4(),
        reference: reference.to_string(),
        customer_name: "Farhana Akter".to_string(),
        contact_method: "phone".to_string(),
        contact_value: "+8801711000000".to_string(),
        platform: Some(Platform::Facebook),
        destination: Some("Kathmandu".to_string()),
        travel_start: None,
        travel_end: None,
        adults: 2,
        children: 0,
        infants: 0,
        status: status.into(),
        priority: Priority::Medium,
        services: ServiceStatuses::default(),
        assigned_to: None,
        assigned_operator: None,
        created_by,
        created_at,
        updated_at: created_at,
        deleted_at: None,
    }
}

pub async fn seed_lead(db: &TestDatabase, lead: Lead) -> Lead {
    db.leads().insert(&lead).await.expect("lead should be inserted");
    lead
}

pub async fn seed_invoice(
    db: &TestDatabase,
    lead_id: Uuid,
    number: &str,
    invoice_date: NaiveDate,
    total: Decimal,
) -> Invoice {
    let invoice = Invoice::new(lead_id, number, invoice_date, total);
    db.billing().insert_invoice(&invoice).await.expect("invoice should be inserted");
    invoice
}
