//! Fixture builders and service wiring shared by the integration tests.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use tripdesk_common::MockClock;
use tripdesk_core::{LeadService, NotificationDispatcher, NotificationPlanner};
use tripdesk_domain::{
    Lead, LeadStatus, Leave, LeaveStatus, LeaveType, Platform, Priority, Role,
    ServiceStatuses, User,
};
use uuid::Uuid;

use super::repositories::{
    MemoryAttachmentStore, MockAttachmentRepository, MockLeadRepository, MockNotificationStore,
    MockUserDirectory,
};

pub const APP_URL: &str = "https://desk.example.com/admin";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn clock_on(y: i32, m: u32, d: u32) -> MockClock {
    MockClock::new(Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).single().expect("valid timestamp"))
}

pub fn user(name: &str, role: Role) -> User {
    User::new(name, format!("{}@example.com", name.to_lowercase()), role)
}

pub fn manager(name: &str, role: Role) -> User {
    user(name, role).manager()
}

pub fn leave(
    user_id: Uuid,
    leave_type: LeaveType,
    status: LeaveStatus,
    start: NaiveDate,
    end: NaiveDate,
) -> Leave {
    let now = Utc::now();
    Leave {
        id: Uuid::new_v4(),
        user_id,
        leave_type,
        status,
        start_date: start,
        end_date: end,
        reason: None,
        rejection_reason: None,
        approved_by: None,
        approved_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn lead(created_by: Uuid, status: LeadStatus, created_on: NaiveDate) -> Lead {
    let created_at = created_on.and_hms_opt(9, 30, 0).expect("valid time").and_utc();
    Lead {
        id: Uuid::new_v4(),
        reference: format!("LD-{}-{}", created_on.format("%Y%m%d"), &Uuid::new_v4().simple().to_string()[..4]),
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

/// A `LeadService` wired to in-memory ports, with handles for assertions.
pub struct LeadHarness {
    pub service: LeadService,
    pub leads: MockLeadRepository,
    pub notifications: MockNotificationStore,
    pub attachments: MockAttachmentRepository,
    pub store: MemoryAttachmentStore,
    pub clock: MockClock,
}

impl LeadHarness {
    pub fn new(users: Vec<User>) -> Self {
        Self::with_store(users, MockNotificationStore::default())
    }

    pub fn with_store(users: Vec<User>, notifications: MockNotificationStore) -> Self {
        Self::with_parts(MockUserDirectory::new(users), notifications)
    }

    pub fn with_directory(directory: MockUserDirectory) -> Self {
        Self::with_parts(directory, MockNotificationStore::default())
    }

    fn with_parts(directory: MockUserDirectory, notifications: MockNotificationStore) -> Self {
        let directory = Arc::new(directory);
        let leads = MockLeadRepository::default();
        let attachments = MockAttachmentRepository::default();
        let store = MemoryAttachmentStore::default();
        let clock = clock_on(2024, 5, 20);

        let planner = Arc::new(NotificationPlanner::new(directory, APP_URL));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::new(notifications.clone()),
            Arc::new(clock.clone()),
        ));
        let service = LeadService::new(
            Arc::new(leads.clone()),
            Arc::new(attachments.clone()),
            Arc::new(store.clone()),
            planner,
            dispatcher,
            Arc::new(clock.clone()),
        );

        Self { service, leads, notifications, attachments, store, clock }
    }
}
