//! # Capture Wizard
//!
//! The step-by-step state machine that records one sale or expense.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Capture Wizard Transitions                        │
//! │                                                                         │
//! │  input(field)             validated for format only; stays on step      │
//! │                                                                         │
//! │  advance()                step validator passes ──► step + 1            │
//! │                           step validator fails  ──► stay, report error  │
//! │                           on confirm            ──► submit              │
//! │                                                                         │
//! │  select_unit_and_advance  unit_type step only: writes the standard      │
//! │                           price as the default, then step + 1           │
//! │                                                                         │
//! │  retreat()                step - 1, no validation, values kept          │
//! │                           on first step         ──► cancelled           │
//! │                                                                         │
//! │  submit                   CapturedTransaction ──► RewardEmitter (once)  │
//! │                           draft discarded, wizard closed                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Session Model
//! One wizard is one capture session. After submission or cancellation the
//! wizard is closed and rejects everything with `CaptureError::Closed`; a new
//! capture starts with a new wizard.
//!
//! Every failure here is recoverable. A failed input or advance leaves the
//! draft exactly as it was.

use serde::{Deserialize, Serialize};
use tally_core::units::resolve_unit_price;
use tally_core::validation::{
    parse_amount, parse_quantity, validate_amount, validate_name, validate_quantity,
};
use tally_core::{DerivedFigures, Money, PaymentStatus, StockItem, ValidationError};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::config::CaptureConfig;
use crate::draft::CaptureDraft;
use crate::error::{CaptureError, CaptureResult};
use crate::reward::{RewardEmitter, RewardEvent, RewardSink};
use crate::router::CaptureFlow;
use crate::steps::{steps_for, Step};
use crate::transaction::CapturedTransaction;

// =============================================================================
// Inputs and Outcomes
// =============================================================================

/// Raw input for one field, as sent by a form control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldInput {
    CustomerName(String),
    ServiceName(String),
    ExpenseName(String),
    Quantity(String),
    Price(String),
    Amount(String),
    Payment(PaymentStatus),
}

impl FieldInput {
    /// The step this field belongs to.
    pub fn step(&self) -> Step {
        match self {
            FieldInput::CustomerName(_) => Step::Customer,
            FieldInput::ServiceName(_) => Step::ServiceName,
            FieldInput::ExpenseName(_) => Step::ExpenseName,
            FieldInput::Quantity(_) => Step::Quantity,
            FieldInput::Price(_) => Step::Price,
            FieldInput::Amount(_) => Step::Amount,
            FieldInput::Payment(_) => Step::Payment,
        }
    }
}

/// What the shell receives after a completed capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub transaction: CapturedTransaction,
    pub reward: RewardEvent,
}

/// Result of a successful `advance()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Moved { from: Step, to: Step },
    Submitted(Box<Submission>),
}

/// Result of a successful `retreat()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    Moved { from: Step, to: Step },
    /// Retreated from the first step. The wizard is closed.
    Cancelled,
}

/// One row of the confirmation screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SummaryLine {
    pub label: String,
    pub value: String,
}

impl SummaryLine {
    fn new(label: &str, value: impl Into<String>) -> Self {
        SummaryLine {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

// =============================================================================
// Capture Wizard
// =============================================================================

/// Drives one capture session from the first step to submission.
///
/// ## Example
/// ```rust
/// use tally_capture::reward::RecordingSink;
/// use tally_capture::router::CaptureFlow;
/// use tally_capture::steps::Step;
/// use tally_capture::wizard::{Advance, CaptureWizard};
///
/// let mut wizard = CaptureWizard::new(CaptureFlow::Expense, RecordingSink::new()).unwrap();
/// wizard.set_expense_name("Diesel").unwrap();
/// wizard.advance().unwrap();
/// wizard.set_amount("12,000").unwrap();
/// wizard.advance().unwrap();
/// assert_eq!(wizard.current_step(), Some(Step::Confirm));
///
/// let outcome = wizard.advance().unwrap();
/// assert!(matches!(outcome, Advance::Submitted(_)));
/// assert!(!wizard.is_open());
/// assert_eq!(wizard.sink().len(), 1);
/// ```
#[derive(Debug)]
pub struct CaptureWizard<S: RewardSink> {
    flow: CaptureFlow,
    /// `None` once submitted or cancelled.
    draft: Option<CaptureDraft>,
    config: CaptureConfig,
    emitter: RewardEmitter<S>,
}

impl<S: RewardSink> CaptureWizard<S> {
    /// Opens a wizard on the first step of `flow` with default limits.
    pub fn new(flow: CaptureFlow, sink: S) -> CaptureResult<Self> {
        Self::with_config(flow, CaptureConfig::default(), sink)
    }

    /// Opens a wizard with host-supplied limits and currency display.
    ///
    /// ## Errors
    /// - `InvalidConfig` when `config` fails validation
    /// - `Core(InvalidStockItem)` when a product sale's item has negative
    ///   prices, cost or stock, or a non-positive unit ratio
    pub fn with_config(flow: CaptureFlow, config: CaptureConfig, sink: S) -> CaptureResult<Self> {
        config.validate()?;
        if let Some(item) = flow.item() {
            item.validate()?;
        }

        let draft = CaptureDraft::new(flow.kind());
        info!(flow = %flow.kind(), first_step = %draft.current_step(), "Capture wizard opened");

        Ok(CaptureWizard {
            flow,
            draft: Some(draft),
            config,
            emitter: RewardEmitter::new(sink),
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn flow(&self) -> &CaptureFlow {
        &self.flow
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    /// The current draft, `None` once closed.
    pub fn draft(&self) -> Option<&CaptureDraft> {
        self.draft.as_ref()
    }

    pub fn current_step(&self) -> Option<Step> {
        self.draft.as_ref().map(CaptureDraft::current_step)
    }

    /// `(position, total)` with a 1-based position, for a step indicator.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.draft
            .as_ref()
            .map(|d| (d.step_index() + 1, steps_for(d.flow_kind()).len()))
    }

    /// Live figures for a product sale, once unit, quantity and price are
    /// all present.
    ///
    /// Recomputed on every call; safe to poll after each keystroke.
    ///
    /// ## Errors
    /// `Core(InvalidInput)` when a present value is negative.
    pub fn derived_figures(&self) -> CaptureResult<Option<DerivedFigures>> {
        let draft = self.open_draft()?;
        self.figures_for(draft)
    }

    /// The amount that would be recorded right now.
    pub fn running_total(&self) -> CaptureResult<Option<Money>> {
        let draft = self.open_draft()?;
        self.total_for(draft)
    }

    /// Human-readable lines for everything entered so far.
    pub fn summary(&self) -> CaptureResult<Vec<SummaryLine>> {
        let draft = self.open_draft()?;
        let money = |m: Money| self.config.format_money(m);
        let mut lines = Vec::new();

        if let Some(item) = self.flow.item() {
            lines.push(SummaryLine::new("Item", item.name.as_str()));
        }
        if let Some(name) = draft.customer_name() {
            lines.push(SummaryLine::new("Customer", name.trim()));
        }
        if let Some(name) = draft.service_name() {
            lines.push(SummaryLine::new("Service", name.trim()));
        }
        if let Some(name) = draft.expense_name() {
            lines.push(SummaryLine::new("Expense", name.trim()));
        }
        if let (Some(item), Some(unit_type)) = (self.flow.item(), draft.unit_type()) {
            lines.push(SummaryLine::new("Unit", resolve_unit_price(item, unit_type)?.label));
        }
        if let Some(quantity) = draft.quantity() {
            lines.push(SummaryLine::new("Quantity", quantity.normalize().to_string()));
        }
        if let Some(price) = draft.price() {
            lines.push(SummaryLine::new("Price", money(price)));
        }
        if let Some(amount) = draft.amount() {
            lines.push(SummaryLine::new("Amount", money(amount)));
        }
        if let Some(payment) = draft.payment() {
            let value = if payment.is_paid() { "Paid" } else { "Unpaid" };
            lines.push(SummaryLine::new("Payment", value));
        }

        if let Some(figures) = self.figures_for(draft)? {
            lines.push(SummaryLine::new("Total", money(figures.total_amount)));
            lines.push(SummaryLine::new("Profit", money(figures.total_profit)));
        } else if let Some(total) = self.total_for(draft)? {
            lines.push(SummaryLine::new("Total", money(total)));
        }

        Ok(lines)
    }

    /// Number of reward events emitted by this wizard (0 or 1).
    pub fn rewards_emitted(&self) -> u64 {
        self.emitter.emitted()
    }

    pub fn sink(&self) -> &S {
        self.emitter.sink()
    }

    pub fn into_sink(self) -> S {
        self.emitter.into_sink()
    }

    // =========================================================================
    // Field Input
    // =========================================================================

    /// Stores raw input for the active step.
    ///
    /// Only the format is checked here (a number must parse). Emptying a
    /// numeric field clears it. Range checks run on `advance()`.
    ///
    /// ## Errors
    /// - `WrongStep` if the field belongs to another step
    /// - `Validation(InvalidFormat)` for unparseable numbers
    pub fn input(&mut self, field: FieldInput) -> CaptureResult<()> {
        let draft = self.open_draft()?;
        let current = draft.current_step();
        let target = field.step();

        if target != current {
            return Err(CaptureError::WrongStep {
                expected: current,
                actual: target,
            });
        }

        let label = current.field_label();
        let next = match field {
            FieldInput::CustomerName(name) => draft.with_customer_name(name),
            FieldInput::ServiceName(name) => draft.with_service_name(name),
            FieldInput::ExpenseName(name) => draft.with_expense_name(name),
            FieldInput::Quantity(raw) if raw.trim().is_empty() => draft.without_value(current),
            FieldInput::Quantity(raw) => draft.with_quantity(parse_quantity(label, &raw)?),
            FieldInput::Price(raw) if raw.trim().is_empty() => draft.without_value(current),
            FieldInput::Price(raw) => draft.with_price(parse_amount(label, &raw)?),
            FieldInput::Amount(raw) if raw.trim().is_empty() => draft.without_value(current),
            FieldInput::Amount(raw) => draft.with_amount(parse_amount(label, &raw)?),
            FieldInput::Payment(status) => draft.with_payment(status),
        };

        debug!(step = %current, "Field input accepted");
        self.draft = Some(next);
        Ok(())
    }

    pub fn set_customer_name(&mut self, name: &str) -> CaptureResult<()> {
        self.input(FieldInput::CustomerName(name.to_string()))
    }

    pub fn set_service_name(&mut self, name: &str) -> CaptureResult<()> {
        self.input(FieldInput::ServiceName(name.to_string()))
    }

    pub fn set_expense_name(&mut self, name: &str) -> CaptureResult<()> {
        self.input(FieldInput::ExpenseName(name.to_string()))
    }

    pub fn set_quantity(&mut self, raw: &str) -> CaptureResult<()> {
        self.input(FieldInput::Quantity(raw.to_string()))
    }

    pub fn set_price(&mut self, raw: &str) -> CaptureResult<()> {
        self.input(FieldInput::Price(raw.to_string()))
    }

    pub fn set_amount(&mut self, raw: &str) -> CaptureResult<()> {
        self.input(FieldInput::Amount(raw.to_string()))
    }

    pub fn set_payment(&mut self, status: PaymentStatus) -> CaptureResult<()> {
        self.input(FieldInput::Payment(status))
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Selects a unit type, defaults the price to that unit's standard
    /// price and moves to the next step.
    ///
    /// A previously entered quantity is kept; a previously entered price is
    /// replaced.
    ///
    /// ## Errors
    /// - `NotOnStep` unless the active step is `unit_type`
    /// - `Core(UnknownUnit)` if the item has no such unit
    pub fn select_unit_and_advance(&mut self, raw_unit: &str) -> CaptureResult<Advance> {
        let draft = self.open_draft()?;
        let current = draft.current_step();

        if current != Step::UnitType {
            return Err(CaptureError::NotOnStep {
                required: Step::UnitType,
                current,
            });
        }

        let item = self.item()?;
        let unit_type = item.unit_type(raw_unit)?;
        let resolved = resolve_unit_price(item, &unit_type)?;

        let next = draft
            .with_unit_type(unit_type)
            .with_price(resolved.standard_price)
            .with_step_index(draft.step_index() + 1);
        let to = next.current_step();

        debug!(
            unit = %resolved.label,
            standard_price = %resolved.standard_price,
            "Unit selected, price defaulted"
        );
        self.draft = Some(next);
        Ok(Advance::Moved { from: current, to })
    }

    /// Validates the active step and moves forward, or submits from
    /// `confirm`.
    ///
    /// ## Errors
    /// The step's `Validation` error, e.g. "quantity must be > 0". The
    /// wizard stays where it is.
    pub fn advance(&mut self) -> CaptureResult<Advance> {
        let draft = self.open_draft()?;
        let current = draft.current_step();

        if let Err(e) = self.validate_step(current, draft) {
            debug!(step = %current, error = %e, "Step validation failed");
            return Err(e);
        }

        if current.is_terminal() {
            return self.submit();
        }

        if current == Step::Price {
            self.warn_on_figures(draft)?;
        }

        let next = draft.with_step_index(draft.step_index() + 1);
        let to = next.current_step();

        debug!(from = %current, to = %to, "Step advanced");
        self.draft = Some(next);
        Ok(Advance::Moved { from: current, to })
    }

    /// Moves back one step without validating or clearing anything.
    /// From the first step this cancels the capture.
    pub fn retreat(&mut self) -> CaptureResult<Retreat> {
        let draft = self.open_draft()?;
        let current = draft.current_step();

        if draft.step_index() == 0 {
            self.close_cancelled();
            return Ok(Retreat::Cancelled);
        }

        let next = draft.with_step_index(draft.step_index() - 1);
        let to = next.current_step();

        debug!(from = %current, to = %to, "Step retreated");
        self.draft = Some(next);
        Ok(Retreat::Moved { from: current, to })
    }

    /// Abandons the capture from any step. No reward is emitted.
    pub fn cancel(&mut self) -> CaptureResult<()> {
        self.open_draft()?;
        self.close_cancelled();
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn open_draft(&self) -> CaptureResult<&CaptureDraft> {
        self.draft.as_ref().ok_or(CaptureError::Closed)
    }

    fn item(&self) -> CaptureResult<&StockItem> {
        self.flow.item().ok_or(CaptureError::ItemRequired)
    }

    fn close_cancelled(&mut self) {
        if let Some(draft) = self.draft.take() {
            info!(flow = %draft.flow_kind(), step = %draft.current_step(), "Capture cancelled");
        }
    }

    fn validate_step(&self, step: Step, draft: &CaptureDraft) -> CaptureResult<()> {
        let limits = &self.config.limits;
        let field = step.field_label();

        match step {
            Step::Customer => {
                self.checked_name(step, draft.customer_name())?;
            }
            Step::ServiceName => {
                self.checked_name(step, draft.service_name())?;
            }
            Step::ExpenseName => {
                self.checked_name(step, draft.expense_name())?;
            }
            Step::UnitType => {
                let unit_type = require(draft.unit_type(), step)?;
                resolve_unit_price(self.item()?, unit_type)?;
            }
            Step::Quantity => {
                validate_quantity(field, require(draft.quantity(), step)?, limits.max_quantity)?;
            }
            Step::Price => {
                validate_amount(field, require(draft.price(), step)?, limits.max_amount)?;
            }
            Step::Amount => {
                validate_amount(field, require(draft.amount(), step)?, limits.max_amount)?;
            }
            Step::Payment => {
                require(draft.payment(), step)?;
            }
            Step::Confirm => {
                for earlier in steps_for(draft.flow_kind()).iter().filter(|s| !s.is_terminal()) {
                    self.validate_step(*earlier, draft)?;
                }
            }
        }

        Ok(())
    }

    fn checked_name(&self, step: Step, raw: Option<&str>) -> CaptureResult<String> {
        let name = validate_name(
            step.field_label(),
            raw.unwrap_or(""),
            self.config.limits.max_name_length,
        )?;
        Ok(name)
    }

    fn figures_for(&self, draft: &CaptureDraft) -> CaptureResult<Option<DerivedFigures>> {
        let item = match self.flow.item() {
            Some(item) => item,
            None => return Ok(None),
        };

        match (draft.unit_type(), draft.quantity(), draft.price()) {
            (Some(unit_type), Some(quantity), Some(price)) => {
                Ok(Some(DerivedFigures::derive(item, unit_type, quantity, price)?))
            }
            _ => Ok(None),
        }
    }

    fn total_for(&self, draft: &CaptureDraft) -> CaptureResult<Option<Money>> {
        match self.flow {
            CaptureFlow::ProductSale { .. } => {
                Ok(self.figures_for(draft)?.map(|f| f.total_amount))
            }
            CaptureFlow::ServiceSale => Ok(draft.price()),
            CaptureFlow::Expense => Ok(draft.amount()),
        }
    }

    fn warn_on_figures(&self, draft: &CaptureDraft) -> CaptureResult<()> {
        if let Some(figures) = self.figures_for(draft)? {
            if figures.is_loss {
                warn!(
                    total_profit = %figures.total_profit,
                    price = %figures.price_per_unit,
                    unit_cost = %figures.unit_cost,
                    "Selling below cost"
                );
            }
            if figures.exceeds_stock {
                warn!(bulk_quantity = %figures.bulk_quantity, "Quantity exceeds stock on hand");
            }
        }
        Ok(())
    }

    fn build_transaction(&self, draft: &CaptureDraft) -> CaptureResult<CapturedTransaction> {
        match &self.flow {
            CaptureFlow::ProductSale { item } => {
                let customer = self.checked_name(Step::Customer, draft.customer_name())?;
                let unit_type = require(draft.unit_type(), Step::UnitType)?;
                let quantity = require(draft.quantity(), Step::Quantity)?;
                let price = require(draft.price(), Step::Price)?;
                let payment = require(draft.payment(), Step::Payment)?;
                let figures = DerivedFigures::derive(item, unit_type, quantity, price)?;

                Ok(CapturedTransaction::product_sale(customer, item, &figures, payment))
            }
            CaptureFlow::ServiceSale => {
                let customer = self.checked_name(Step::Customer, draft.customer_name())?;
                let service = self.checked_name(Step::ServiceName, draft.service_name())?;
                let price = require(draft.price(), Step::Price)?;
                let payment = require(draft.payment(), Step::Payment)?;

                Ok(CapturedTransaction::service_sale(customer, service, price, payment))
            }
            CaptureFlow::Expense => {
                let name = self.checked_name(Step::ExpenseName, draft.expense_name())?;
                let amount = require(draft.amount(), Step::Amount)?;

                Ok(CapturedTransaction::expense(name, amount))
            }
        }
    }

    fn submit(&mut self) -> CaptureResult<Advance> {
        let transaction = self.build_transaction(self.open_draft()?)?;
        let reward = self.emitter.emit_for(&transaction);
        self.draft = None;

        info!(
            transaction_id = %transaction.id(),
            kind = ?transaction.kind(),
            total = %transaction.total_amount(),
            "Transaction submitted"
        );

        Ok(Advance::Submitted(Box::new(Submission {
            transaction,
            reward,
        })))
    }
}

fn require<T>(value: Option<T>, step: Step) -> CaptureResult<T> {
    value.ok_or_else(|| {
        ValidationError::Required {
            field: step.field_label().to_string(),
        }
        .into()
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
