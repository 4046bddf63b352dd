//! Lead records
//!
//! A lead is a customer inquiry moving through the sales and operations
//! pipeline. The main status and the four service trackers are independent
//! fields; any update may set any value.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vocabulary::{LeadStatus, Platform, Priority, Recorded, ServiceKind, ServiceStatus};

/// Per-service fulfillment statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatuses {
    pub air_ticket: Recorded<ServiceStatus>,
    pub hotel: Recorded<ServiceStatus>,
    pub visa: Recorded<ServiceStatus>,
    pub land_package: Recorded<ServiceStatus>,
}

impl Default for ServiceStatuses {
    fn default() -> Self {
        Self {
            air_ticket: ServiceStatus::Pending.into(),
            hotel: ServiceStatus::Pending.into(),
            visa: ServiceStatus::Pending.into(),
            land_package: ServiceStatus::Pending.into(),
        }
    }
}

impl ServiceStatuses {
    pub fn get(&self, kind: ServiceKind) -> &Recorded<ServiceStatus> {
        match kind {
            ServiceKind::AirTicket => &self.air_ticket,
            ServiceKind::Hotel => &self.hotel,
            ServiceKind::Visa => &self.visa,
            ServiceKind::LandPackage => &self.land_package,
        }
    }

    pub fn set(&mut self, kind: ServiceKind, status: Recorded<ServiceStatus>) {
        match kind {
            ServiceKind::AirTicket => self.air_ticket = status,
            ServiceKind::Hotel => self.hotel = status,
            ServiceKind::Visa => self.visa = status,
            ServiceKind::LandPackage => self.land_package = status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    /// Human-facing reference, e.g. `LD-20240105-7F3A`.
    pub reference: String,
    pub customer_name: String,
    pub contact_method: String,
    pub contact_value: String,
    pub platform: Option<Platform>,
    pub destination: Option<String>,
    pub travel_start: Option<NaiveDate>,
    pub travel_end: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub status: Recorded<LeadStatus>,
    pub priority: Priority,
    pub services: ServiceStatuses,
    /// Sales user.
    pub assigned_to: Option<Uuid>,
    /// Operations user.
    pub assigned_operator: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Lead {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn total_pax(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

/// Input for creating a lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadDraft {
    pub customer_name: String,
    pub contact_method: String,
    pub contact_value: String,
    pub platform: Option<Platform>,
    pub destination: Option<String>,
    pub travel_start: Option<NaiveDate>,
    pub travel_end: Option<NaiveDate>,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub priority: Priority,
    pub assigned_to: Option<Uuid>,
    pub assigned_operator: Option<Uuid>,
}

impl LeadDraft {
    pub fn new(customer_name: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            contact_method: "phone".to_string(),
            contact_value: String::new(),
            platform: None,
            destination: None,
            travel_start: None,
            travel_end: None,
            adults: 1,
            children: 0,
            infants: 0,
            priority: Priority::Medium,
            assigned_to: None,
            assigned_operator: None,
        }
    }
}

/// Field-level patch applied by an update.
///
/// `None` leaves a field untouched. Assignment fields use a nested option so
/// an update can clear them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadChanges {
    pub customer_name: Option<String>,
    pub contact_method: Option<String>,
    pub contact_value: Option<String>,
    pub platform: Option<Option<Platform>>,
    pub destination: Option<Option<String>>,
    pub travel_start: Option<Option<NaiveDate>>,
    pub travel_end: Option<Option<NaiveDate>>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub infants: Option<u32>,
    pub status: Option<Recorded<LeadStatus>>,
    pub priority: Option<Priority>,
    pub services: Vec<(ServiceKind, ServiceStatus)>,
    pub assigned_to: Option<Option<Uuid>>,
    pub assigned_operator: Option<Option<Uuid>>,
}

impl LeadChanges {
    pub fn status(status: LeadStatus) -> Self {
        Self { status: Some(status.into()), ..Self::default() }
    }

    pub fn assign_sales(user: Option<Uuid>) -> Self {
        Self { assigned_to: Some(user), ..Self::default() }
    }

    pub fn assign_operator(user: Option<Uuid>) -> Self {
        Self { assigned_operator: Some(user), ..Self::default() }
    }

    pub fn service(kind: ServiceKind, status: ServiceStatus) -> Self {
        Self { services: vec![(kind, status)], ..Self::default() }
    }

    /// Apply the patch, returning the updated copy.
    pub fn apply_to(&self, lead: &Lead, now: DateTime<Utc>) -> Lead {
        let mut next = lead.clone();
        if let Some(value) = &self.customer_name {
            next.customer_name.clone_from(value);
        }
        if let Some(value) = &self.contact_method {
            next.contact_method.clone_from(value);
        }
        if let Some(value) = &self.contact_value {
            next.contact_value.clone_from(value);
        }
        if let Some(value) = self.platform {
            next.platform = value;
        }
        if let Some(value) = &self.destination {
            next.destination.clone_from(value);
        }
        if let Some(value) = self.travel_start {
            next.travel_start = value;
        }
        if let Some(value) = self.travel_end {
            next.travel_end = value;
        }
        if let Some(value) = self.adults {
            next.adults = value;
        }
        if let Some(value) = self.children {
            next.children = value;
        }
        if let Some(value) = self.infants {
            next.infants = value;
        }
        if let Some(value) = &self.status {
            next.status = value.clone();
        }
        if let Some(value) = self.priority {
            next.priority = value;
        }
        for (kind, status) in &self.services {
            next.services.set(*kind, (*status).into());
        }
        if let Some(value) = self.assigned_to {
            next.assigned_to = value;
        }
        if let Some(value) = self.assigned_operator {
            next.assigned_operator = value;
        }
        next.updated_at = now;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lead() -> Lead {
        let now = Utc::now();
        Lead {
            id: Uuid::new_v4(),
            reference: "LD-20240105-0001".to_string(),
            customer_name: "Nadia Rahman".to_string(),
            contact_method: "phone".to_string(),
            contact_value: "+8801700000000".to_string(),
            platform: Some(Platform::Facebook),
            destination: Some("Bali".to_string()),
            travel_start: None,
            travel_end: None,
            adults: 2,
            children: 1,
            infants: 0,
            status: LeadStatus::New.into(),
            priority: Priority::Medium,
            services: ServiceStatuses::default(),
            assigned_to: None,
            assigned_operator: None,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn patch_touches_only_named_fields() {
        let lead = sample_lead();
        let sales = Uuid::new_v4();
        let changes = LeadChanges {
            status: Some(LeadStatus::AssignedToSales.into()),
            assigned_to: Some(Some(sales)),
            ..LeadChanges::default()
        };

        let next = changes.apply_to(&lead, Utc::now());
        assert!(next.status.is(LeadStatus::AssignedToSales));
        assert_eq!(next.assigned_to, Some(sales));
        assert_eq!(next.customer_name, lead.customer_name);
        assert_eq!(next.total_pax(), 3);
    }

    #[test]
    fn patch_can_clear_an_assignment() {
        let mut lead = sample_lead();
        lead.assigned_operator = Some(Uuid::new_v4());
        let next = LeadChanges::assign_operator(None).apply_to(&lead, Utc::now());
        assert_eq!(next.assigned_operator, None);
    }

    #[test]
    fn service_statuses_are_independent() {
        let lead = sample_lead();
        let next = LeadChanges::service(ServiceKind::Visa, ServiceStatus::Done)
            .apply_to(&lead, Utc::now());
        assert!(next.services.get(ServiceKind::Visa).is(ServiceStatus::Done));
        assert!(next.services.get(ServiceKind::Hotel).is(ServiceStatus::Pending));
        assert!(next.status.is(LeadStatus::New));
    }
}
