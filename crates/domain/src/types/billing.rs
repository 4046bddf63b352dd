//! Invoices, customer payments and vendor bills

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::vocabulary::{
    CustomerPaymentStatus, InvoiceStatus, Recorded, ServiceKind, VendorPaymentStatus,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub status: Recorded<InvoiceStatus>,
    pub total_amount: Decimal,
    /// `total_amount` minus every recorded customer payment.
    pub customer_balance_amount: Decimal,
    pub customer_payment_status: CustomerPaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(
        lead_id: Uuid,
        invoice_number: impl Into<String>,
        invoice_date: NaiveDate,
        total_amount: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            lead_id,
            invoice_number: invoice_number.into(),
            invoice_date,
            status: InvoiceStatus::Pending.into(),
            total_amount,
            customer_balance_amount: total_amount,
            customer_payment_status: payment_status_for(total_amount, total_amount),
            created_at: Utc::now(),
        }
    }

    /// Recompute the derived balance and payment status from the payments.
    pub fn apply_payments(&mut self, payments: &[CustomerPayment]) {
        let paid: Decimal = payments.iter().map(|p| p.amount).sum();
        self.customer_balance_amount = self.total_amount - paid;
        self.customer_payment_status =
            payment_status_for(self.total_amount, self.customer_balance_amount);
    }
}

/// Payment status derived from the remaining balance.
pub fn payment_status_for(total: Decimal, balance: Decimal) -> CustomerPaymentStatus {
    if balance <= Decimal::ZERO {
        CustomerPaymentStatus::Paid
    } else if balance < total {
        CustomerPaymentStatus::Partial
    } else {
        CustomerPaymentStatus::Unpaid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPayment {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub amount: Decimal,
    pub receipt_number: Option<String>,
    pub payment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorBill {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub vendor_name: String,
    pub service: Option<ServiceKind>,
    pub amount: Decimal,
    pub payment_status: VendorPaymentStatus,
    pub payment_date: Option<NaiveDate>,
}

impl VendorBill {
    pub fn mark_paid(&mut self, date: NaiveDate) {
        self.payment_status = VendorPaymentStatus::Paid;
        self.payment_date = Some(date);
    }

    pub fn mark_pending(&mut self) {
        self.payment_status = VendorPaymentStatus::Pending;
        self.payment_date = None;
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn payment(invoice_id: Uuid, amount: Decimal) -> CustomerPayment {
        CustomerPayment {
            id: Uuid::new_v4(),
            invoice_id,
            amount,
            receipt_number: None,
            payment_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn balance_and_status_follow_payments() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut invoice = Invoice::new(Uuid::new_v4(), "INV-1", date, dec!(1000.00));
        assert_eq!(invoice.customer_payment_status, CustomerPaymentStatus::Unpaid);

        invoice.apply_payments(&[payment(invoice.id, dec!(400.00))]);
        assert_eq!(invoice.customer_balance_amount, dec!(600.00));
        assert_eq!(invoice.customer_payment_status, CustomerPaymentStatus::Partial);

        invoice.apply_payments(&[payment(invoice.id, dec!(400.00)), payment(invoice.id, dec!(600))]);
        assert_eq!(invoice.customer_balance_amount, Decimal::ZERO);
        assert_eq!(invoice.customer_payment_status, CustomerPaymentStatus::Paid);
    }

    #[test]
    fn vendor_bill_toggle_sets_and_clears_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let mut bill = VendorBill {
            id: Uuid::new_v4(),
            invoice_id: Uuid::new_v4(),
            vendor_name: "Skyline Air".to_string(),
            service: Some(ServiceKind::AirTicket),
            amount: dec!(250),
            payment_status: VendorPaymentStatus::Pending,
            payment_date: None,
        };

        bill.mark_paid(date);
        assert_eq!(bill.payment_status, VendorPaymentStatus::Paid);
        assert_eq!(bill.payment_date, Some(date));

        bill.mark_pending();
        assert_eq!(bill.payment_status, VendorPaymentStatus::Pending);
        assert_eq!(bill.payment_date, None);
    }
}
