//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core ports, enabling deterministic tests
//! without database dependencies. Every mock is cheaply cloneable and clones
//! share state, so a test can keep a handle for assertions.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tripdesk_core::{
    AttachmentRepository, AttachmentStore, BillingRepository, CallCenterRepository,
    LeadRepository, LeaveRepository, NotificationStore, PermissionRepository,
    ReportingRepository, UserDirectory,
};
use tripdesk_domain::{
    Attachment, AttachmentStorage, CallCenterCall, CallStatus, CustomerPayment, DateSpan,
    Invoice, InvoiceStatus, Lead, Leave, LeaveStatus, Notification, NotificationType, Permission,
    PermissionGrant, PermissionGroup, ReportFilters, Result as DomainResult, Role, TripDeskError,
    User, VendorBill,
};
use uuid::Uuid;

fn locked<T>(mutex: &Arc<Mutex<T>>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ============================================================================
// Users
// ============================================================================

#[derive(Default, Clone)]
pub struct MockUserDirectory {
    users: Arc<Vec<User>>,
    failing_role: Option<Role>,
    manager_lookup_fails: bool,
}

impl MockUserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users: Arc::new(users), ..Self::default() }
    }

    /// Every `resolve_manager` call fails as if the database were locked.
    pub fn with_failing_manager_lookup(mut self) -> Self {
        self.manager_lookup_fails = true;
        self
    }

    /// `list_by_role(role)` fails for this role only.
    pub fn with_failing_role(mut self, role: Role) -> Self {
        self.failing_role = Some(role);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        Arc::make_mut(&mut self.users).push(user);
        self
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn find_user(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.users.iter().find(|user| user.id == id).cloned())
    }

    async fn list_by_role(&self, role: Role) -> DomainResult<Vec<User>> {
        if self.failing_role == Some(role) {
            return Err(TripDeskError::Database("database is locked".into()));
        }
        Ok(self.users.iter().filter(|user| user.role == role && user.is_active).cloned().collect())
    }

    async fn resolve_manager(&self, user: &User) -> DomainResult<Option<User>> {
        if self.manager_lookup_fails {
            return Err(TripDeskError::Database("database is locked".into()));
        }
        let peers = self.list_by_role(user.role).await?;
        Ok(peers.into_iter().find(|peer| peer.manages(user)))
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        Ok(self.users.to_vec())
    }
}

// ============================================================================
// Leaves
// ============================================================================

#[derive(Default, Clone)]
pub struct MockLeaveRepository {
    leaves: Arc<Mutex<Vec<Leave>>>,
}

impl MockLeaveRepository {
    pub fn new(leaves: Vec<Leave>) -> Self {
        Self { leaves: Arc::new(Mutex::new(leaves)) }
    }

    pub fn all(&self) -> Vec<Leave> {
        locked(&self.leaves).clone()
    }
}

#[async_trait]
impl LeaveRepository for MockLeaveRepository {
    async fn insert(&self, leave: &Leave) -> DomainResult<()> {
        locked(&self.leaves).push(leave.clone());
        Ok(())
    }

    async fn update(&self, leave: &Leave) -> DomainResult<()> {
        let mut leaves = locked(&self.leaves);
        let slot = leaves
            .iter_mut()
            .find(|existing| existing.id == leave.id)
            .ok_or_else(|| TripDeskError::not_found("leave", leave.id))?;
        *slot = leave.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Leave>> {
        Ok(locked(&self.leaves).iter().find(|leave| leave.id == id).cloned())
    }

    async fn find_overlapping(
        &self,
        user_id: Uuid,
        statuses: &[LeaveStatus],
        span: DateSpan,
    ) -> DomainResult<Vec<Leave>> {
        Ok(locked(&self.leaves)
            .iter()
            .filter(|leave| {
                leave.user_id == user_id
                    && statuses.contains(&leave.status)
                    && leave.start_date <= span.end
                    && leave.end_date >= span.start
            })
            .cloned()
            .collect())
    }
}

// ============================================================================
// Leads and attachments
// ============================================================================

#[derive(Default, Clone)]
pub struct MockLeadRepository {
    leads: Arc<Mutex<HashMap<Uuid, Lead>>>,
}

impl MockLeadRepository {
    pub fn get(&self, id: Uuid) -> Option<Lead> {
        locked(&self.leads).get(&id).cloned()
    }
}

#[async_trait]
impl LeadRepository for MockLeadRepository {
    async fn insert(&self, lead: &Lead) -> DomainResult<()> {
        locked(&self.leads).insert(lead.id, lead.clone());
        Ok(())
    }

    async fn update(&self, lead: &Lead) -> DomainResult<()> {
        locked(&self.leads).insert(lead.id, lead.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Lead>> {
        Ok(locked(&self.leads).get(&id).filter(|lead| !lead.is_deleted()).cloned())
    }

    async fn reference_exists(&self, reference: &str) -> DomainResult<bool> {
        Ok(locked(&self.leads).values().any(|lead| lead.reference == reference))
    }

    async fn soft_delete(&self, id: Uuid, deleted_at: DateTime<Utc>) -> DomainResult<bool> {
        let mut leads = locked(&self.leads);
        match leads.get_mut(&id) {
            Some(lead) if !lead.is_deleted() => {
                lead.deleted_at = Some(deleted_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Default, Clone)]
pub struct MockAttachmentRepository {
    rows: Arc<Mutex<Vec<Attachment>>>,
}

#[async_trait]
impl AttachmentRepository for MockAttachmentRepository {
    async fn insert(&self, attachment: &Attachment) -> DomainResult<()> {
        locked(&self.rows).push(attachment.clone());
        Ok(())
    }

    async fn list_for_lead(&self, lead_id: Uuid) -> DomainResult<Vec<Attachment>> {
        Ok(locked(&self.rows).iter().filter(|row| row.lead_id == lead_id).cloned().collect())
    }

    async fn list_by_storage(&self, storage: AttachmentStorage) -> DomainResult<Vec<Attachment>> {
        Ok(locked(&self.rows).iter().filter(|row| row.storage == storage).cloned().collect())
    }

    async fn set_storage(
        &self,
        id: Uuid,
        storage: AttachmentStorage,
        path: &str,
    ) -> DomainResult<()> {
        if let Some(row) = locked(&self.rows).iter_mut().find(|row| row.id == id) {
            row.storage = storage;
            row.path = path.to_string();
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MemoryAttachmentStore {
    objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryAttachmentStore {
    pub fn keys(&self) -> Vec<String> {
        locked(&self.objects).keys().cloned().collect()
    }
}

#[async_trait]
impl AttachmentStore for MemoryAttachmentStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> DomainResult<u64> {
        let size = bytes.len() as u64;
        locked(&self.objects).insert(key.to_string(), bytes);
        Ok(size)
    }

    async fn get(&self, key: &str) -> DomainResult<Vec<u8>> {
        locked(&self.objects)
            .get(key)
            .cloned()
            .ok_or_else(|| TripDeskError::not_found("attachment", key))
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        Ok(locked(&self.objects).contains_key(key))
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Inbox mock; recipients listed in `failing_for` make `store` fail.
#[derive(Default, Clone)]
pub struct MockNotificationStore {
    stored: Arc<Mutex<Vec<Notification>>>,
    failing_for: Arc<BTreeSet<Uuid>>,
}

impl MockNotificationStore {
    pub fn failing_for(recipients: impl IntoIterator<Item = Uuid>) -> Self {
        Self { stored: Arc::default(), failing_for: Arc::new(recipients.into_iter().collect()) }
    }

    pub fn all(&self) -> Vec<Notification> {
        locked(&self.stored).clone()
    }

    pub fn for_user(&self, user_id: Uuid) -> Vec<Notification> {
        locked(&self.stored).iter().filter(|n| n.user_id == user_id).cloned().collect()
    }

    pub fn clear(&self) {
        locked(&self.stored).clear();
    }
}

#[async_trait]
impl NotificationStore for MockNotificationStore {
    async fn store(&self, notification: &Notification) -> DomainResult<()> {
        if self.failing_for.contains(&notification.user_id) {
            return Err(TripDeskError::Notification("inbox unavailable".to_string()));
        }
        locked(&self.stored).push(notification.clone());
        Ok(())
    }

    async fn list_for(&self, user_id: Uuid, unread_only: bool) -> DomainResult<Vec<Notification>> {
        let mut list: Vec<Notification> = locked(&self.stored)
            .iter()
            .filter(|n| n.user_id == user_id && (!unread_only || n.is_unread()))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn mark_read(&self, notification_id: Uuid, read_at: DateTime<Utc>) -> DomainResult<bool> {
        let mut stored = locked(&self.stored);
        match stored.iter_mut().find(|n| n.id == notification_id && n.is_unread()) {
            Some(notification) => {
                notification.read_at = Some(read_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: Uuid, read_at: DateTime<Utc>) -> DomainResult<usize> {
        let mut changed = 0;
        for notification in locked(&self.stored).iter_mut() {
            if notification.user_id == user_id && notification.is_unread() {
                notification.read_at = Some(read_at);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn unread_counts(&self, user_id: Uuid) -> DomainResult<BTreeMap<NotificationType, u64>> {
        let mut counts = BTreeMap::new();
        for notification in locked(&self.stored).iter() {
            if notification.user_id == user_id && notification.is_unread() {
                *counts.entry(notification.notification_type).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

// ============================================================================
// Reporting
// ============================================================================

/// Computes aggregates from seeded leads, invoices and calls, and counts
/// how often it was queried so cache behaviour can be asserted.
#[derive(Default, Clone)]
pub struct MockReportingRepository {
    leads: Arc<Vec<Lead>>,
    invoices: Arc<Vec<Invoice>>,
    calls: Arc<Vec<CallCenterCall>>,
    queries: Arc<Mutex<usize>>,
}

impl MockReportingRepository {
    pub fn new(leads: Vec<Lead>, invoices: Vec<Invoice>, calls: Vec<CallCenterCall>) -> Self {
        Self {
            leads: Arc::new(leads),
            invoices: Arc::new(invoices),
            calls: Arc::new(calls),
            queries: Arc::default(),
        }
    }

    pub fn query_count(&self) -> usize {
        *locked(&self.queries)
    }

    fn matching_leads<'a>(
        &'a self,
        range: DateSpan,
        filters: &'a ReportFilters,
    ) -> impl Iterator<Item = &'a Lead> + 'a {
        self.leads.iter().filter(move |lead| {
            let created = lead.created_at.date_naive();
            !lead.is_deleted()
                && created >= range.start
                && created <= range.end
                && filters.sales_user.map_or(true, |id| lead.assigned_to == Some(id))
                && filters.operation_user.map_or(true, |id| lead.assigned_operator == Some(id))
                && filters.source.map_or(true, |source| lead.platform == Some(source))
                && filters.stage.map_or(true, |stage| lead.status.is(stage))
        })
    }

    fn lead_matches_filters(&self, lead_id: Uuid, filters: &ReportFilters) -> bool {
        self.leads.iter().any(|lead| {
            lead.id == lead_id
                && !lead.is_deleted()
                && filters.sales_user.map_or(true, |id| lead.assigned_to == Some(id))
                && filters.operation_user.map_or(true, |id| lead.assigned_operator == Some(id))
                && filters.source.map_or(true, |source| lead.platform == Some(source))
                && filters.stage.map_or(true, |stage| lead.status.is(stage))
        })
    }
}

#[async_trait]
impl ReportingRepository for MockReportingRepository {
    async fn lead_status_counts(
        &self,
        range: DateSpan,
        filters: &ReportFilters,
    ) -> DomainResult<BTreeMap<String, u64>> {
        *locked(&self.queries) += 1;
        let mut counts = BTreeMap::new();
        for lead in self.matching_leads(range, filters) {
            *counts.entry(lead.status.as_str().to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn paid_revenue(&self, range: DateSpan, filters: &ReportFilters) -> DomainResult<Decimal> {
        Ok(self
            .invoices
            .iter()
            .filter(|invoice| {
                invoice.status.is(InvoiceStatus::Paid)
                    && invoice.invoice_date >= range.start
                    && invoice.invoice_date <= range.end
                    && self.lead_matches_filters(invoice.lead_id, filters)
            })
            .map(|invoice| invoice.total_amount)
            .sum())
    }

    async fn call_status_counts(
        &self,
        range: DateSpan,
        filters: &ReportFilters,
    ) -> DomainResult<BTreeMap<CallStatus, u64>> {
        let mut counts = BTreeMap::new();
        for call in self.calls.iter() {
            let created = call.created_at.date_naive();
            if created >= range.start
                && created <= range.end
                && self.lead_matches_filters(call.lead_id, filters)
            {
                *counts.entry(call.status).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

// ============================================================================
// Permissions
// ============================================================================

#[derive(Default, Clone)]
pub struct MockPermissionRepository {
    groups: Arc<Vec<PermissionGroup>>,
    memberships: Arc<Mutex<HashMap<Uuid, Vec<Uuid>>>>,
    direct: Arc<Mutex<HashMap<Uuid, Vec<PermissionGrant>>>>,
}

impl MockPermissionRepository {
    pub fn new(groups: Vec<PermissionGroup>) -> Self {
        Self { groups: Arc::new(groups), ..Self::default() }
    }

    pub fn grants_of(&self, user_id: Uuid) -> Vec<PermissionGrant> {
        locked(&self.direct).get(&user_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl PermissionRepository for MockPermissionRepository {
    async fn find_groups(&self, ids: &[Uuid]) -> DomainResult<Vec<PermissionGroup>> {
        Ok(self.groups.iter().filter(|group| ids.contains(&group.id)).cloned().collect())
    }

    async fn user_groups(&self, user_id: Uuid) -> DomainResult<Vec<Uuid>> {
        Ok(locked(&self.memberships).get(&user_id).cloned().unwrap_or_default())
    }

    async fn sync_user_groups(
        &self,
        user_id: Uuid,
        group_ids: &[Uuid],
        grants: &[PermissionGrant],
    ) -> DomainResult<()> {
        locked(&self.memberships).insert(user_id, group_ids.to_vec());
        locked(&self.direct).insert(user_id, grants.to_vec());
        Ok(())
    }

    async fn direct_permissions(&self, user_id: Uuid) -> DomainResult<Vec<PermissionGrant>> {
        Ok(self.grants_of(user_id))
    }

    async fn replace_direct_permissions(
        &self,
        user_id: Uuid,
        grants: &[PermissionGrant],
    ) -> DomainResult<()> {
        locked(&self.direct).insert(user_id, grants.to_vec());
        Ok(())
    }

    async fn grant(&self, user_id: Uuid, grant: &PermissionGrant) -> DomainResult<()> {
        let mut direct = locked(&self.direct);
        let grants = direct.entry(user_id).or_default();
        grants.retain(|existing| existing.permission != grant.permission);
        grants.push(grant.clone());
        Ok(())
    }

    async fn revoke(&self, user_id: Uuid, permission: &Permission) -> DomainResult<bool> {
        let mut direct = locked(&self.direct);
        let Some(grants) = direct.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = grants.len();
        grants.retain(|existing| &existing.permission != permission);
        Ok(grants.len() != before)
    }
}

// ============================================================================
// Billing and call center
// ============================================================================

#[derive(Default, Clone)]
pub struct MockBillingRepository {
    invoices: Arc<Mutex<HashMap<Uuid, Invoice>>>,
    payments: Arc<Mutex<Vec<CustomerPayment>>>,
    bills: Arc<Mutex<HashMap<Uuid, VendorBill>>>,
}

impl MockBillingRepository {
    pub fn with_invoice(self, invoice: Invoice) -> Self {
        locked(&self.invoices).insert(invoice.id, invoice);
        self
    }

    pub fn with_bill(self, bill: VendorBill) -> Self {
        locked(&self.bills).insert(bill.id, bill);
        self
    }

    pub fn invoice(&self, id: Uuid) -> Option<Invoice> {
        locked(&self.invoices).get(&id).cloned()
    }

    pub fn bill(&self, id: Uuid) -> Option<VendorBill> {
        locked(&self.bills).get(&id).cloned()
    }

    pub fn payment_count(&self) -> usize {
        locked(&self.payments).len()
    }
}

#[async_trait]
impl BillingRepository for MockBillingRepository {
    async fn find_invoice(&self, id: Uuid) -> DomainResult<Option<Invoice>> {
        Ok(self.invoice(id))
    }

    async fn payments_for(&self, invoice_id: Uuid) -> DomainResult<Vec<CustomerPayment>> {
        Ok(locked(&self.payments).iter().filter(|p| p.invoice_id == invoice_id).cloned().collect())
    }

    async fn record_payment(
        &self,
        payment: &CustomerPayment,
        invoice: &Invoice,
    ) -> DomainResult<()> {
        locked(&self.payments).push(payment.clone());
        locked(&self.invoices).insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn vendor_bills(&self, ids: &[Uuid]) -> DomainResult<Vec<VendorBill>> {
        let bills = locked(&self.bills);
        Ok(ids.iter().filter_map(|id| bills.get(id).cloned()).collect())
    }

    async fn update_vendor_bill(&self, bill: &VendorBill) -> DomainResult<()> {
        locked(&self.bills).insert(bill.id, bill.clone());
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MockCallCenterRepository {
    calls: Arc<Mutex<HashMap<Uuid, CallCenterCall>>>,
}

#[async_trait]
impl CallCenterRepository for MockCallCenterRepository {
    async fn insert(&self, call: &CallCenterCall) -> DomainResult<()> {
        locked(&self.calls).insert(call.id, call.clone());
        Ok(())
    }

    async fn update(&self, call: &CallCenterCall) -> DomainResult<()> {
        locked(&self.calls).insert(call.id, call.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<CallCenterCall>> {
        Ok(locked(&self.calls).get(&id).cloned())
    }

    async fn list_for_lead(&self, lead_id: Uuid) -> DomainResult<Vec<CallCenterCall>> {
        Ok(locked(&self.calls).values().filter(|call| call.lead_id == lead_id).cloned().collect())
    }
}
