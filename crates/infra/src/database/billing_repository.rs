//! SQLite-backed invoices, customer payments and vendor bills.
//!
//! Money columns hold the decimal's canonical string so no precision is lost
//! to SQLite's REAL affinity.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use tripdesk_core::BillingRepository;
use tripdesk_domain::{
    CustomerPayment, Invoice, Result as DomainResult, TripDeskError, VendorBill,
};
use uuid::Uuid;

use super::codec;
use super::manager::DbManager;
use crate::errors::to_domain;

const INVOICE_COLUMNS: &str = "id, lead_id, invoice_number, invoice_date, status, total_amount, \
     customer_balance_amount, customer_payment_status, created_at";

const PAYMENT_COLUMNS: &str = "id, invoice_id, amount, receipt_number, payment_date, created_at";

const VENDOR_BILL_COLUMNS: &str =
    "id, invoice_id, vendor_name, service, amount, payment_status, payment_date";

/// One row of the pre-invoice cost sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyCostRow {
    pub lead_reference: String,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub selling_price: Decimal,
    pub vendor_name: Option<String>,
    /// Raw service key; may be outside the service vocabulary.
    pub service: Option<String>,
    pub cost_amount: Option<Decimal>,
    pub vendor_paid: bool,
}

/// Flat payment recorded directly on an invoice row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyPayment {
    pub invoice_id: Uuid,
    pub amount: Decimal,
    pub receipt_number: Option<String>,
}

pub struct SqliteBillingRepository {
    db: Arc<DbManager>,
}

impl SqliteBillingRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    pub async fn insert_invoice(&self, invoice: &Invoice) -> DomainResult<()> {
        let invoice = invoice.clone();
        self.db
            .with_connection(move |conn| {
                insert_invoice_row(conn, &invoice).map_err(to_domain)?;
                Ok(())
            })
            .await
    }

    /// Insert an invoice and its vendor bills atomically.
    pub async fn insert_invoice_with_bills(
        &self,
        invoice: &Invoice,
        bills: &[VendorBill],
    ) -> DomainResult<()> {
        let invoice = invoice.clone();
        let bills = bills.to_vec();
        self.db
            .with_transaction(move |tx| {
                insert_invoice_row(tx, &invoice).map_err(to_domain)?;
                for bill in &bills {
                    insert_vendor_bill_row(tx, bill).map_err(to_domain)?;
                }
                Ok(())
            })
            .await
    }

    pub async fn find_invoice_by_number(&self, number: &str) -> DomainResult<Option<Invoice>> {
        let number = number.to_string();
        self.db
            .with_connection(move |conn| {
                conn.query_optional(
                    &format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_number = ?1"),
                    params![number],
                    map_invoice,
                )
                .map_err(to_domain)
            })
            .await
    }

    pub async fn insert_vendor_bill(&self, bill: &VendorBill) -> DomainResult<()> {
        let bill = bill.clone();
        self.db
            .with_connection(move |conn| {
                insert_vendor_bill_row(conn, &bill).map_err(to_domain)?;
                Ok(())
            })
            .await
    }

    pub async fn vendor_bills_for_invoice(&self, invoice_id: Uuid) -> DomainResult<Vec<VendorBill>> {
        self.db
            .with_connection(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {VENDOR_BILL_COLUMNS} FROM vendor_bills
                         WHERE invoice_id = ?1 ORDER BY vendor_name, id"
                    ))
                    .map_err(to_domain)?;
                stmt.query_map(params![invoice_id.to_string()], map_vendor_bill).map_err(to_domain)
            })
            .await
    }

    pub async fn receipt_exists(&self, receipt_number: &str) -> DomainResult<bool> {
        let receipt_number = receipt_number.to_string();
        self.db
            .with_connection(move |conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM customer_payments WHERE receipt_number = ?1)",
                    params![receipt_number],
                    |row| codec::bool_flag(row, 0),
                )
                .map_err(to_domain)
            })
            .await
    }

    /// Cost sheet rows in insertion order.
    pub async fn legacy_costs(&self) -> DomainResult<Vec<LegacyCostRow>> {
        self.db
            .with_connection(|conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT lead_reference, invoice_number, invoice_date, selling_price,
                                vendor_name, service, cost_amount, vendor_paid
                         FROM legacy_costs ORDER BY id",
                    )
                    .map_err(to_domain)?;
                stmt.query_map(params![], |row| {
                    let cost: Option<String> = row.get(6)?;
                    Ok(LegacyCostRow {
                        lead_reference: row.get(0)?,
                        invoice_number: row.get(1)?,
                        invoice_date: codec::date(row, 2)?,
                        selling_price: codec::decimal(row, 3)?,
                        vendor_name: row.get(4)?,
                        service: row.get(5)?,
                        cost_amount: cost.and_then(|raw| Decimal::from_str(&raw).ok()),
                        vendor_paid: codec::bool_flag(row, 7)?,
                    })
                })
                .map_err(to_domain)
            })
            .await
    }

    pub async fn insert_legacy_cost(&self, row: &LegacyCostRow) -> DomainResult<()> {
        let row = row.clone();
        self.db
            .with_connection(move |conn| {
                conn.execute(
                    "INSERT INTO legacy_costs (lead_reference, invoice_number, invoice_date,
                        selling_price, vendor_name, service, cost_amount, vendor_paid)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        row.lead_reference,
                        row.invoice_number,
                        codec::date_text(row.invoice_date),
                        row.selling_price.to_string(),
                        row.vendor_name,
                        row.service,
                        row.cost_amount.map(|amount| amount.to_string()),
                        row.vendor_paid,
                    ],
                )
                .map_err(to_domain)?;
                Ok(())
            })
            .await
    }

    /// Invoices that still carry a positive flat payment amount.
    pub async fn legacy_payments(&self) -> DomainResult<Vec<LegacyPayment>> {
        let rows: Vec<(Uuid, String, Option<String>)> = self
            .db
            .with_connection(|conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, legacy_paid_amount, legacy_receipt_number FROM invoices
                         WHERE legacy_paid_amount IS NOT NULL
                         ORDER BY invoice_date, invoice_number",
                    )
                    .map_err(to_domain)?;
                stmt.query_map(params![], |row| Ok((codec::uuid(row, 0)?, row.get(1)?, row.get(2)?)))
                    .map_err(to_domain)
            })
            .await?;

        rows.into_iter()
            .filter_map(|(invoice_id, raw, receipt_number)| match Decimal::from_str(&raw) {
                Ok(amount) if amount > Decimal::ZERO => {
                    Some(Ok(LegacyPayment { invoice_id, amount, receipt_number }))
                }
                Ok(_) => None,
                Err(err) => Some(Err(TripDeskError::Database(format!(
                    "invoice {invoice_id} has an invalid legacy_paid_amount: {err}"
                )))),
            })
            .collect()
    }

    pub async fn set_legacy_payment(
        &self,
        invoice_id: Uuid,
        amount: Decimal,
        receipt_number: Option<&str>,
    ) -> DomainResult<()> {
        let receipt_number = receipt_number.map(str::to_string);
        self.db
            .with_connection(move |conn| {
                let changed = conn
                    .execute(
                        "UPDATE invoices SET legacy_paid_amount = ?2, legacy_receipt_number = ?3
                         WHERE id = ?1",
                        params![invoice_id.to_string(), amount.to_string(), receipt_number],
                    )
                    .map_err(to_domain)?;
                if changed == 0 {
                    return Err(TripDeskError::not_found("invoice", invoice_id));
                }
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl BillingRepository for SqliteBillingRepository {
    async fn find_invoice(&self, id: Uuid) -> DomainResult<Option<Invoice>> {
        self.db
            .with_connection(move |conn| {
                conn.query_optional(
                    &format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1"),
                    params![id.to_string()],
                    map_invoice,
                )
                .map_err(to_domain)
            })
            .await
    }

    async fn payments_for(&self, invoice_id: Uuid) -> DomainResult<Vec<CustomerPayment>> {
        self.db
            .with_connection(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {PAYMENT_COLUMNS} FROM customer_payments
                         WHERE invoice_id = ?1 ORDER BY payment_date, created_at"
                    ))
                    .map_err(to_domain)?;
                stmt.query_map(params![invoice_id.to_string()], map_payment).map_err(to_domain)
            })
            .await
    }

    async fn record_payment(&self, payment: &CustomerPayment, invoice: &Invoice) -> DomainResult<()> {
        let payment = payment.clone();
        let invoice = invoice.clone();
        self.db
            .with_transaction(move |tx| {
                tx.execute(
                    &format!(
                        "INSERT INTO customer_payments ({PAYMENT_COLUMNS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
                    ),
                    params![
                        payment.id.to_string(),
                        payment.invoice_id.to_string(),
                        payment.amount.to_string(),
                        payment.receipt_number,
                        codec::date_text(payment.payment_date),
                        codec::timestamp_text(payment.created_at),
                    ],
                )
                .map_err(to_domain)?;

                let changed = tx
                    .execute(
                        "UPDATE invoices
                         SET customer_balance_amount = ?2, customer_payment_status = ?3
                         WHERE id = ?1",
                        params![
                            invoice.id.to_string(),
                            invoice.customer_balance_amount.to_string(),
                            invoice.customer_payment_status.as_str(),
                        ],
                    )
                    .map_err(to_domain)?;
                if changed == 0 {
                    return Err(TripDeskError::not_found("invoice", invoice.id));
                }
                Ok(())
            })
            .await
    }

    async fn vendor_bills(&self, ids: &[Uuid]) -> DomainResult<Vec<VendorBill>> {
        let ids = ids.to_vec();
        self.db
            .with_connection(move |conn| {
                let mut bills = Vec::with_capacity(ids.len());
                for id in ids {
                    let bill = conn
                        .query_optional(
                            &format!("SELECT {VENDOR_BILL_COLUMNS} FROM vendor_bills WHERE id = ?1"),
                            params![id.to_string()],
                            map_vendor_bill,
                        )
                        .map_err(to_domain)?;
                    bills.extend(bill);
                }
                Ok(bills)
            })
            .await
    }

    async fn update_vendor_bill(&self, bill: &VendorBill) -> DomainResult<()> {
        let bill = bill.clone();
        self.db
            .with_connection(move |conn| {
                let changed = conn
                    .execute(
                        "UPDATE vendor_bills SET
                            vendor_name = ?2, service = ?3, amount = ?4,
                            payment_status = ?5, payment_date = ?6
                         WHERE id = ?1",
                        params![
                            bill.id.to_string(),
                            bill.vendor_name,
                            bill.service.map(|service| service.as_str()),
                            bill.amount.to_string(),
                            bill.payment_status.as_str(),
                            bill.payment_date.map(codec::date_text),
                        ],
                    )
                    .map_err(to_domain)?;
                if changed == 0 {
                    return Err(TripDeskError::not_found("vendor bill", bill.id));
                }
                Ok(())
            })
            .await
    }
}

fn insert_invoice_row(conn: &Connection, invoice: &Invoice) -> rusqlite::Result<usize> {
    conn.execute(
        &format!(
            "INSERT INTO invoices ({INVOICE_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            invoice.id.to_string(),
            invoice.lead_id.to_string(),
            invoice.invoice_number,
            codec::date_text(invoice.invoice_date),
            invoice.status.as_str(),
            invoice.total_amount.to_string(),
            invoice.customer_balance_amount.to_string(),
            invoice.customer_payment_status.as_str(),
            codec::timestamp_text(invoice.created_at),
        ],
    )
}

fn insert_vendor_bill_row(conn: &Connection, bill: &VendorBill) -> rusqlite::Result<usize> {
    conn.execute(
        &format!(
            "INSERT INTO vendor_bills ({VENDOR_BILL_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ),
        params![
            bill.id.to_string(),
            bill.invoice_id.to_string(),
            bill.vendor_name,
            bill.service.map(|service| service.as_str()),
            bill.amount.to_string(),
            bill.payment_status.as_str(),
            bill.payment_date.map(codec::date_text),
        ],
    )
}

fn map_invoice(row: &Row<'_>) -> rusqlite::Result<Invoice> {
    Ok(Invoice {
        id: codec::uuid(row, 0)?,
        lead_id: codec::uuid(row, 1)?,
        invoice_number: row.get(2)?,
        invoice_date: codec::date(row, 3)?,
        status: codec::recorded(row, 4)?,
        total_amount: codec::decimal(row, 5)?,
        customer_balance_amount: codec::decimal(row, 6)?,
        customer_payment_status: codec::known(row, 7)?,
        created_at: codec::timestamp(row, 8)?,
    })
}

fn map_payment(row: &Row<'_>) -> rusqlite::Result<CustomerPayment> {
    Ok(CustomerPayment {
        id: codec::uuid(row, 0)?,
        invoice_id: codec::uuid(row, 1)?,
        amount: codec::decimal(row, 2)?,
        receipt_number: row.get(3)?,
        payment_date: codec::date(row, 4)?,
        created_at: codec::timestamp(row, 5)?,
    })
}

fn map_vendor_bill(row: &Row<'_>) -> rusqlite::Result<VendorBill> {
    Ok(VendorBill {
        id: codec::uuid(row, 0)?,
        invoice_id: codec::uuid(row, 1)?,
        vendor_name: row.get(2)?,
        service: codec::opt_known(row, 3)?,
        amount: codec::decimal(row, 4)?,
        payment_status: codec::known(row, 5)?,
        payment_date: codec::opt_date(row, 6)?,
    })
}
