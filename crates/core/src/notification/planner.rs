//! Recipient computation for lead mutations
//!
//! Four change categories are inspected independently: sales assignment,
//! operator assignment, main status and each service status. Within one
//! category a user receives at most one notification.
//!
//! User lookups are best-effort: a failed lookup is logged and only the
//! recipients that depend on it are left out.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::error;
use tripdesk_domain::constants::{
    ICON_ASSIGNMENT, ICON_NEW_LEAD, ICON_OPERATIONS_READY, ICON_SERVICE_STATUS, ICON_STATUS_CHANGE,
};
use tripdesk_domain::{
    BadgeColor, Lead, LeadStatus, NotificationIntent, NotificationType, Recorded, Role,
    ServiceKind, ServiceStatus, User,
};
use uuid::Uuid;

use crate::user::ports::UserDirectory;

/// Computes who hears about a lead change and what they are told.
pub struct NotificationPlanner {
    directory: Arc<dyn UserDirectory>,
    app_url: String,
}

impl NotificationPlanner {
    pub fn new(directory: Arc<dyn UserDirectory>, app_url: impl Into<String>) -> Self {
        let app_url = app_url.into().trim_end_matches('/').to_string();
        Self { directory, app_url }
    }

    /// "View lead" link carried by every notification about `lead`.
    pub fn action_url(&self, lead: &Lead) -> String {
        format!("{}/leads/{}", self.app_url, lead.id)
    }

    /// Intents for a lead that was created (`old` is `None`) or updated.
    pub async fn on_lead_mutated(
        &self,
        old: Option<&Lead>,
        new: &Lead,
    ) -> Vec<NotificationIntent> {
        let mut intents = Vec::new();

        match old {
            None => {
                if new.assigned_to.is_some() {
                    intents.extend(self.sales_assignment(None, new).await);
                }
                if new.assigned_operator.is_some() {
                    intents.extend(self.operator_assignment(None, new).await);
                }
                intents.extend(self.new_lead(new).await);
            }
            Some(old) => {
                if old.assigned_to != new.assigned_to {
                    intents.extend(self.sales_assignment(old.assigned_to, new).await);
                }
                if old.assigned_operator != new.assigned_operator {
                    intents.extend(self.operator_assignment(old.assigned_operator, new).await);
                }
                if old.status != new.status {
                    intents.extend(self.status_change(&old.status, new).await);
                }
                for kind in ServiceKind::ALL {
                    let before = old.services.get(*kind);
                    let after = new.services.get(*kind);
                    if before != after {
                        intents.extend(self.service_change(*kind, before, after, new));
                    }
                }
            }
        }

        intents
    }

    async fn sales_assignment(
        &self,
        previous: Option<Uuid>,
        lead: &Lead,
    ) -> Vec<NotificationIntent> {
        let mut out = Fanout::new(lead, self.action_url(lead));
        let assignee = self.lookup(lead.assigned_to).await;
        let assignee_name = display_name(assignee.as_ref(), lead.assigned_to);

        if let Some(id) = lead.assigned_to {
            out.push(
                id,
                NotificationType::LeadAssignment,
                "Lead assigned to you",
                format!(
                    "Lead {} ({}) has been assigned to you.",
                    lead.reference, lead.customer_name
                ),
                BadgeColor::Info,
                ICON_ASSIGNMENT,
            );
        }

        if let Some(previous) = previous {
            out.push(
                previous,
                NotificationType::LeadAssignment,
                "Lead reassigned",
                format!("Lead {} has been reassigned to {}.", lead.reference, assignee_name),
                BadgeColor::Warning,
                ICON_ASSIGNMENT,
            );
        }

        out.push(
            lead.created_by,
            NotificationType::LeadAssignment,
            "Lead assignment updated",
            format!("Lead {} you created is now assigned to {}.", lead.reference, assignee_name),
            BadgeColor::Info,
            ICON_ASSIGNMENT,
        );

        if let Some(assignee) = &assignee {
            if let Some(manager) = self.manager_of(assignee).await {
                out.push(
                    manager.id,
                    NotificationType::LeadAssignment,
                    "Team member assigned a lead",
                    format!("{} has been assigned lead {}.", assignee.name, lead.reference),
                    BadgeColor::Info,
                    ICON_ASSIGNMENT,
                );
            }
        }

        out.finish()
    }

    async fn operator_assignment(
        &self,
        previous: Option<Uuid>,
        lead: &Lead,
    ) -> Vec<NotificationIntent> {
        let mut out = Fanout::new(lead, self.action_url(lead));
        let operator = self.lookup(lead.assigned_operator).await;
        let operator_name = display_name(operator.as_ref(), lead.assigned_operator);

        if let Some(id) = lead.assigned_operator {
            out.push(
                id,
                NotificationType::LeadAssignment,
                "Lead assigned to you for operations",
                format!(
                    "Lead {} ({}) has been assigned to you for operations.",
                    lead.reference, lead.customer_name
                ),
                BadgeColor::Info,
                ICON_ASSIGNMENT,
            );
        }

        if let Some(previous) = previous {
            out.push(
                previous,
                NotificationType::LeadAssignment,
                "Operations reassigned",
                format!(
                    "Operations for lead {} have been reassigned to {}.",
                    lead.reference, operator_name
                ),
                BadgeColor::Warning,
                ICON_ASSIGNMENT,
            );
        }

        if let (Some(sales), Some(_)) = (lead.assigned_to, lead.assigned_operator) {
            out.push(
                sales,
                NotificationType::LeadAssignment,
                "Operator assigned",
                format!(
                    "{} is now handling operations for lead {}.",
                    operator_name, lead.reference
                ),
                BadgeColor::Info,
                ICON_ASSIGNMENT,
            );
        }

        out.push(
            lead.created_by,
            NotificationType::LeadAssignment,
            "Operator assignment updated",
            format!(
                "Operations for lead {} you created are now handled by {}.",
                lead.reference, operator_name
            ),
            BadgeColor::Info,
            ICON_ASSIGNMENT,
        );

        if let Some(operator) = &operator {
            if let Some(manager) = self.manager_of(operator).await {
                out.push(
                    manager.id,
                    NotificationType::LeadAssignment,
                    "Team member assigned a lead",
                    format!(
                        "{} has been assigned operations for lead {}.",
                        operator.name, lead.reference
                    ),
                    BadgeColor::Info,
                    ICON_ASSIGNMENT,
                );
            }
        }

        out.finish()
    }

    async fn status_change(
        &self,
        previous: &Recorded<LeadStatus>,
        lead: &Lead,
    ) -> Vec<NotificationIntent> {
        let mut out = Fanout::new(lead, self.action_url(lead));

        // Every operations user hears about leads ready for them, assigned or not.
        if lead.status.is(LeadStatus::InfoGatherComplete) {
            for user in self.users_with_role(Role::Operation).await {
                out.push(
                    user.id,
                    NotificationType::LeadStatusChange,
                    "Lead ready for operations",
                    format!(
                        "Lead {} ({}) has completed info gathering and is ready for operations.",
                        lead.reference, lead.customer_name
                    ),
                    BadgeColor::Primary,
                    ICON_OPERATIONS_READY,
                );
            }
        }

        let involved: Vec<Uuid> = [lead.assigned_to, lead.assigned_operator, Some(lead.created_by)]
            .into_iter()
            .flatten()
            .collect();

        let mut recipients = involved.clone();
        for id in involved {
            if let Some(user) = self.lookup(Some(id)).await {
                if let Some(manager) = self.manager_of(&user).await {
                    recipients.push(manager.id);
                }
            }
        }

        let body = format!(
            "Lead {} moved from {} to {}.",
            lead.reference,
            previous.label(),
            lead.status.label()
        );
        for recipient in recipients {
            out.push(
                recipient,
                NotificationType::LeadStatusChange,
                "Lead status changed",
                body.clone(),
                lead.status.color(),
                ICON_STATUS_CHANGE,
            );
        }

        out.finish()
    }

    fn service_change(
        &self,
        kind: ServiceKind,
        before: &Recorded<ServiceStatus>,
        after: &Recorded<ServiceStatus>,
        lead: &Lead,
    ) -> Vec<NotificationIntent> {
        let mut out = Fanout::new(lead, self.action_url(lead));
        let body = format!(
            "{} for lead {} changed from {} to {}.",
            kind.label(),
            lead.reference,
            before.label(),
            after.label()
        );

        for recipient in [lead.assigned_to, lead.assigned_operator].into_iter().flatten() {
            out.push(
                recipient,
                NotificationType::ServiceStatusChange,
                &format!("{} status updated", kind.label()),
                body.clone(),
                after.color(),
                ICON_SERVICE_STATUS,
            );
        }

        out.finish()
    }

    async fn new_lead(&self, lead: &Lead) -> Vec<NotificationIntent> {
        let mut out = Fanout::new(lead, self.action_url(lead));
        let managers = self.users_with_role(Role::Sales).await;

        if let Some(manager) = managers.into_iter().find(|user| user.is_manager) {
            if manager.id != lead.created_by {
                let creator = self.lookup(Some(lead.created_by)).await;
                out.push(
                    manager.id,
                    NotificationType::NewLead,
                    "New lead created",
                    format!(
                        "{} created lead {} for {}.",
                        display_name(creator.as_ref(), Some(lead.created_by)),
                        lead.reference,
                        lead.customer_name
                    ),
                    BadgeColor::Success,
                    ICON_NEW_LEAD,
                );
            }
        }

        out.finish()
    }

    async fn lookup(&self, id: Option<Uuid>) -> Option<User> {
        let id = id?;
        self.directory.find_user(id).await.unwrap_or_else(|err| {
            error!(error = %err, user_id = %id, "User lookup failed while planning notifications");
            None
        })
    }

    async fn manager_of(&self, user: &User) -> Option<User> {
        self.directory.resolve_manager(user).await.unwrap_or_else(|err| {
            error!(error = %err, user_id = %user.id, "Manager lookup failed while planning notifications");
            None
        })
    }

    async fn users_with_role(&self, role: Role) -> Vec<User> {
        self.directory.list_by_role(role).await.unwrap_or_else(|err| {
            error!(error = %err, role = role.as_str(), "Role lookup failed while planning notifications");
            Vec::new()
        })
    }
}

fn display_name(user: Option<&User>, id: Option<Uuid>) -> String {
    match (user, id) {
        (Some(user), _) => user.name.clone(),
        (None, Some(_)) => "a team member".to_string(),
        (None, None) => "nobody".to_string(),
    }
}

/// Intents for one change category, deduplicated by recipient.
struct Fanout<'a> {
    lead: &'a Lead,
    action_url: String,
    seen: HashSet<Uuid>,
    intents: Vec<NotificationIntent>,
}

impl<'a> Fanout<'a> {
    fn new(lead: &'a Lead, action_url: String) -> Self {
        Self { lead, action_url, seen: HashSet::new(), intents: Vec::new() }
    }

    fn push(
        &mut self,
        recipient_id: Uuid,
        notification_type: NotificationType,
        title: &str,
        body: String,
        color: BadgeColor,
        icon: &str,
    ) {
        if !self.seen.insert(recipient_id) {
            return;
        }
        self.intents.push(NotificationIntent {
            recipient_id,
            notification_type,
            title: title.to_string(),
            body,
            color,
            icon: icon.to_string(),
            lead_id: Some(self.lead.id),
            action_url: Some(self.action_url.clone()),
        });
    }

    fn finish(self) -> Vec<NotificationIntent> {
        self.intents
    }
}
