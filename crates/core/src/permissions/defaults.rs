//! Role default permissions used when backfilling granular permissions

use tripdesk_domain::{Permission, Role};

const SALES: &[&str] = &[
    "leads.view",
    "leads.create",
    "leads.update",
    "leads.attach_files",
    "invoices.view",
    "notifications.view",
];

const OPERATION: &[&str] = &[
    "leads.view",
    "leads.update",
    "leads.attach_files",
    "leads.mark_document_upload_complete",
    "vendor_bills.view",
    "notifications.view",
];

const MARKETING: &[&str] = &["leads.view", "leads.create", "reports.view", "notifications.view"];

const ACCOUNT: &[&str] = &[
    "invoices.view",
    "invoices.update",
    "customer_payments.create",
    "vendor_bills.view",
    "vendor_bills.update",
    "reports.view",
];

const HR: &[&str] = &[
    "leaves.view",
    "leaves.create",
    "leaves.approve",
    "leaves.reject",
    "users.view",
    "users.update",
];

const CALL_CENTER: &[&str] = &[
    "leads.view",
    "call_center_calls.view",
    "call_center_calls.update",
    "notifications.view",
];

/// Permissions a user of `role` starts with. Admins get none because they
/// pass every check.
pub fn default_permissions_for(role: Role) -> Vec<Permission> {
    let names: &[&str] = match role {
        Role::Admin => &[],
        Role::Hr => HR,
        Role::Sales => SALES,
        Role::Operation => OPERATION,
        Role::Marketing => MARKETING,
        Role::Account => ACCOUNT,
        Role::CallCenter => CALL_CENTER,
    };
    // Everyone may request leave.
    let mut permissions: Vec<Permission> = names.iter().map(|name| Permission::new(*name)).collect();
    if !names.contains(&"leaves.create") && role != Role::Admin {
        permissions.push(Permission::new("leaves.create"));
    }
    permissions
}
