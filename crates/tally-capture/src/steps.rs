//! # Capture Steps
//!
//! The ordered step list for each flow.
//!
//! ```text
//! ProductSale : customer → unit_type → quantity → price → payment → confirm
//! ServiceSale : customer → service_name → price → payment → confirm
//! Expense     : expense_name → amount → confirm
//! ```
//!
//! Every list ends at `confirm`. Advancing from `confirm` submits.

use serde::{Deserialize, Serialize};
use std::fmt;
use tally_core::FlowKind;
use ts_rs::TS;

/// One screen of a capture wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Step {
    Customer,
    UnitType,
    Quantity,
    Price,
    Payment,
    ServiceName,
    ExpenseName,
    Amount,
    Confirm,
}

const PRODUCT_SALE_STEPS: [Step; 6] = [
    Step::Customer,
    Step::UnitType,
    Step::Quantity,
    Step::Price,
    Step::Payment,
    Step::Confirm,
];

const SERVICE_SALE_STEPS: [Step; 5] = [
    Step::Customer,
    Step::ServiceName,
    Step::Price,
    Step::Payment,
    Step::Confirm,
];

const EXPENSE_STEPS: [Step; 3] = [Step::ExpenseName, Step::Amount, Step::Confirm];

/// The ordered steps for `kind`.
pub fn steps_for(kind: FlowKind) -> &'static [Step] {
    match kind {
        FlowKind::ProductSale => &PRODUCT_SALE_STEPS,
        FlowKind::ServiceSale => &SERVICE_SALE_STEPS,
        FlowKind::Expense => &EXPENSE_STEPS,
    }
}

impl Step {
    /// The field name used in validation messages for this step.
    pub fn field_label(&self) -> &'static str {
        match self {
            Step::Customer => "customer name",
            Step::UnitType => "unit type",
            Step::Quantity => "quantity",
            Step::Price => "price",
            Step::Payment => "payment status",
            Step::ServiceName => "service name",
            Step::ExpenseName => "expense name",
            Step::Amount => "amount",
            Step::Confirm => "confirmation",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Confirm)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Customer => "customer",
            Step::UnitType => "unit_type",
            Step::Quantity => "quantity",
            Step::Price => "price",
            Step::Payment => "payment",
            Step::ServiceName => "service_name",
            Step::ExpenseName => "expense_name",
            Step::Amount => "amount",
            Step::Confirm => "confirm",
        };
        write!(f, "{}", name)
    }
}
