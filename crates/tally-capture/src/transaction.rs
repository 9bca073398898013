//! # Captured Transaction
//!
//! The immutable record produced by a completed wizard.
//!
//! Fields are private and only readable: once built, a transaction is handed
//! to the persistence collaborator as-is. A transaction can only be built
//! from values that already passed step validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{Decimal, DerivedFigures, Money, PaymentStatus, StockItem, TransactionKind, UnitType};
use ts_rs::TS;
use uuid::Uuid;

use crate::reward::BusinessAction;

/// Flow-specific values of a captured transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum TransactionDetails {
    #[serde(rename_all = "camelCase")]
    ProductSale {
        customer_name: String,
        item_id: String,
        item_name: String,
        unit_type: UnitType,
        unit_label: String,
        #[ts(type = "string")]
        quantity: Decimal,
        price_per_unit: Money,
        standard_price: Money,
        unit_cost: Money,
        total_cost: Money,
    },
    #[serde(rename_all = "camelCase")]
    ServiceSale {
        customer_name: String,
        service_name: String,
        price: Money,
    },
    #[serde(rename_all = "camelCase")]
    Expense {
        expense_name: String,
    },
}

/// A sale or expense recorded by the capture engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CapturedTransaction {
    id: String,
    kind: TransactionKind,
    details: TransactionDetails,
    total_amount: Money,
    /// Sales only.
    total_profit: Option<Money>,
    /// Sales only.
    payment: Option<PaymentStatus>,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl CapturedTransaction {
    /// A product sale from the item and the figures shown at confirmation.
    pub fn product_sale(
        customer_name: impl Into<String>,
        item: &StockItem,
        figures: &DerivedFigures,
        payment: PaymentStatus,
    ) -> Self {
        Self::build(
            TransactionKind::SaleProduct,
            TransactionDetails::ProductSale {
                customer_name: customer_name.into(),
                item_id: item.id.clone(),
                item_name: item.name.clone(),
                unit_type: figures.unit_type.clone(),
                unit_label: figures.unit_label.clone(),
                quantity: figures.quantity,
                price_per_unit: figures.price_per_unit,
                standard_price: figures.standard_price,
                unit_cost: figures.unit_cost,
                total_cost: figures.total_cost,
            },
            figures.total_amount,
            Some(figures.total_profit),
            Some(payment),
        )
    }

    /// A service sale. Services carry no cost basis, so profit equals the
    /// price.
    pub fn service_sale(
        customer_name: impl Into<String>,
        service_name: impl Into<String>,
        price: Money,
        payment: PaymentStatus,
    ) -> Self {
        Self::build(
            TransactionKind::SaleService,
            TransactionDetails::ServiceSale {
                customer_name: customer_name.into(),
                service_name: service_name.into(),
                price,
            },
            price,
            Some(price),
            Some(payment),
        )
    }

    pub fn expense(expense_name: impl Into<String>, amount: Money) -> Self {
        Self::build(
            TransactionKind::Expense,
            TransactionDetails::Expense {
                expense_name: expense_name.into(),
            },
            amount,
            None,
            None,
        )
    }

    fn build(
        kind: TransactionKind,
        details: TransactionDetails,
        total_amount: Money,
        total_profit: Option<Money>,
        payment: Option<PaymentStatus>,
    ) -> Self {
        CapturedTransaction {
            id: Uuid::new_v4().to_string(),
            kind,
            details,
            total_amount,
            total_profit,
            payment,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn details(&self) -> &TransactionDetails {
        &self.details
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn total_profit(&self) -> Option<Money> {
        self.total_profit
    }

    pub fn payment(&self) -> Option<PaymentStatus> {
        self.payment
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The reward action this transaction qualifies for.
    pub fn reward_action(&self) -> BusinessAction {
        match self.kind {
            TransactionKind::SaleProduct => BusinessAction::SaleRecorded,
            TransactionKind::SaleService => BusinessAction::ServiceRecorded,
            TransactionKind::Expense => BusinessAction::ExpenseRecorded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_profit_equals_price() {
        let tx = CapturedTransaction::service_sale("Ada", "Braiding", Money::from_major(5_000), PaymentStatus::Unpaid);
        assert_eq!(tx.kind(), TransactionKind::SaleService);
        assert_eq!(tx.total_amount(), Money::from_major(5_000));
        assert_eq!(tx.total_profit(), Some(Money::from_major(5_000)));
        assert_eq!(tx.payment(), Some(PaymentStatus::Unpaid));
        assert_eq!(tx.reward_action(), BusinessAction::ServiceRecorded);
    }

    #[test]
    fn test_expense_has_no_profit_or_payment() {
        let tx = CapturedTransaction::expense("Diesel", Money::from_major(12_000));
        assert_eq!(tx.total_profit(), None);
        assert_eq!(tx.payment(), None);
        assert_eq!(tx.reward_action(), BusinessAction::ExpenseRecorded);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = CapturedTransaction::expense("Diesel", Money::from_major(1));
        let b = CapturedTransaction::expense("Diesel", Money::from_major(1));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_serialized_shape() {
        let tx = CapturedTransaction::expense("Diesel", Money::from_major(100));
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["kind"], "expense");
        assert_eq!(json["details"]["type"], "expense");
        assert_eq!(json["details"]["expenseName"], "Diesel");
        assert_eq!(json["totalAmount"], 10_000);
        assert!(json["totalProfit"].is_null());
    }
}
