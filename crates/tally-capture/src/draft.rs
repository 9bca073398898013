//! # Capture Draft
//!
//! The in-progress record of one capture session.
//!
//! Drafts are values: every input produces a new `CaptureDraft` and the
//! wizard swaps it in. Moving the cursor never touches field values, so a
//! draft taken before `retreat()` and one taken after the matching
//! `advance()` compare equal.
//!
//! ```text
//! draft₀ ──with_customer_name("Ada")──► draft₁ ──with_step_index(1)──► draft₂
//!   │                                     │
//!   └── still valid, unchanged            └── still valid, unchanged
//! ```

use serde::{Deserialize, Serialize};
use tally_core::{Decimal, FlowKind, Money, PaymentStatus, UnitType};

use crate::steps::{steps_for, Step};

/// Field values collected so far plus the step cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureDraft {
    flow_kind: FlowKind,
    step_index: usize,
    customer_name: Option<String>,
    service_name: Option<String>,
    expense_name: Option<String>,
    unit_type: Option<UnitType>,
    quantity: Option<Decimal>,
    price: Option<Money>,
    amount: Option<Money>,
    payment: Option<PaymentStatus>,
}

impl CaptureDraft {
    /// An empty draft positioned on the first step of `flow_kind`.
    pub fn new(flow_kind: FlowKind) -> Self {
        CaptureDraft {
            flow_kind,
            step_index: 0,
            customer_name: None,
            service_name: None,
            expense_name: None,
            unit_type: None,
            quantity: None,
            price: None,
            amount: None,
            payment: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn flow_kind(&self) -> FlowKind {
        self.flow_kind
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// The step the cursor points at.
    pub fn current_step(&self) -> Step {
        let steps = steps_for(self.flow_kind);
        steps[self.step_index.min(steps.len() - 1)]
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    pub fn expense_name(&self) -> Option<&str> {
        self.expense_name.as_deref()
    }

    pub fn unit_type(&self) -> Option<&UnitType> {
        self.unit_type.as_ref()
    }

    pub fn quantity(&self) -> Option<Decimal> {
        self.quantity
    }

    /// Price per unit (product sale) or service price.
    pub fn price(&self) -> Option<Money> {
        self.price
    }

    /// Expense amount.
    pub fn amount(&self) -> Option<Money> {
        self.amount
    }

    pub fn payment(&self) -> Option<PaymentStatus> {
        self.payment
    }

    // =========================================================================
    // Immutable Updates
    // =========================================================================

    /// Moves the cursor, clamped to the flow's step list.
    pub fn with_step_index(&self, step_index: usize) -> Self {
        let last = steps_for(self.flow_kind).len() - 1;
        CaptureDraft {
            step_index: step_index.min(last),
            ..self.clone()
        }
    }

    pub fn with_customer_name(&self, name: impl Into<String>) -> Self {
        CaptureDraft {
            customer_name: Some(name.into()),
            ..self.clone()
        }
    }

    pub fn with_service_name(&self, name: impl Into<String>) -> Self {
        CaptureDraft {
            service_name: Some(name.into()),
            ..self.clone()
        }
    }

    pub fn with_expense_name(&self, name: impl Into<String>) -> Self {
        CaptureDraft {
            expense_name: Some(name.into()),
            ..self.clone()
        }
    }

    pub fn with_unit_type(&self, unit_type: UnitType) -> Self {
        CaptureDraft {
            unit_type: Some(unit_type),
            ..self.clone()
        }
    }

    pub fn with_quantity(&self, quantity: Decimal) -> Self {
        CaptureDraft {
            quantity: Some(quantity),
            ..self.clone()
        }
    }

    pub fn with_price(&self, price: Money) -> Self {
        CaptureDraft {
            price: Some(price),
            ..self.clone()
        }
    }

    pub fn with_amount(&self, amount: Money) -> Self {
        CaptureDraft {
            amount: Some(amount),
            ..self.clone()
        }
    }

    pub fn with_payment(&self, payment: PaymentStatus) -> Self {
        CaptureDraft {
            payment: Some(payment),
            ..self.clone()
        }
    }

    /// Clears whatever `step` collects. Used when a field is emptied.
    pub fn without_value(&self, step: Step) -> Self {
        let mut next = self.clone();
        match step {
            Step::Customer => next.customer_name = None,
            Step::UnitType => next.unit_type = None,
            Step::Quantity => next.quantity = None,
            Step::Price => next.price = None,
            Step::Payment => next.payment = None,
            Step::ServiceName => next.service_name = None,
            Step::ExpenseName => next.expense_name = None,
            Step::Amount => next.amount = None,
            Step::Confirm => {}
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_starts_at_first_step() {
        let draft = CaptureDraft::new(FlowKind::Expense);
        assert_eq!(draft.step_index(), 0);
        assert_eq!(draft.current_step(), Step::ExpenseName);
        assert!(draft.expense_name().is_none());
    }

    #[test]
    fn test_updates_leave_original_untouched() {
        let original = CaptureDraft::new(FlowKind::ServiceSale);
        let named = original.with_customer_name("Ada");

        assert!(original.customer_name().is_none());
        assert_eq!(named.customer_name(), Some("Ada"));
    }

    #[test]
    fn test_cursor_moves_keep_values() {
        let draft = CaptureDraft::new(FlowKind::ProductSale)
            .with_customer_name("Ada")
            .with_step_index(2)
            .with_quantity(Decimal::from(10));

        let back = draft.with_step_index(1);
        assert_eq!(back.current_step(), Step::UnitType);
        assert_eq!(back.quantity(), Some(Decimal::from(10)));

        let forward = back.with_step_index(2);
        assert_eq!(forward, draft);
    }

    #[test]
    fn test_without_value_clears_one_field() {
        let draft = CaptureDraft::new(FlowKind::Expense)
            .with_expense_name("Rent")
            .with_amount(Money::from_major(10));

        let cleared = draft.without_value(Step::Amount);
        assert_eq!(cleared.amount(), None);
        assert_eq!(cleared.expense_name(), Some("Rent"));
        assert_eq!(draft.without_value(Step::Confirm), draft);
    }

    #[test]
    fn test_step_index_is_clamped() {
        let draft = CaptureDraft::new(FlowKind::Expense).with_step_index(99);
        assert_eq!(draft.step_index(), 2);
        assert_eq!(draft.current_step(), Step::Confirm);
    }
}
