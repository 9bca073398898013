//! # Reward Emitter
//!
//! The typed notification boundary between capture and the gamification
//! ledger.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CaptureWizard ──submit──► RewardEmitter::emit_for(tx)                  │
//! │                                 │                                       │
//! │                                 ├──► RewardEvent returned to the shell  │
//! │                                 │                                       │
//! │                                 └──► RewardSink::deliver(&event)        │
//! │                                      (injected; points, levels and      │
//! │                                       idempotency live behind it)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The emitter keeps no ledger state. The wizard guarantees one emit per
//! successful submission and none on cancellation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tally_core::Money;
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::transaction::CapturedTransaction;

// =============================================================================
// Business Action
// =============================================================================

/// A qualifying business action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum BusinessAction {
    SaleRecorded,
    ExpenseRecorded,
    ServiceRecorded,
}

impl fmt::Display for BusinessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessAction::SaleRecorded => write!(f, "sale_recorded"),
            BusinessAction::ExpenseRecorded => write!(f, "expense_recorded"),
            BusinessAction::ServiceRecorded => write!(f, "service_recorded"),
        }
    }
}

// =============================================================================
// Reward Event
// =============================================================================

/// Fire-and-forget notice that a business action happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RewardEvent {
    /// Unique per event.
    pub id: String,

    pub action: BusinessAction,

    /// Id of the transaction that triggered the event. The ledger uses it
    /// as the idempotency key.
    pub source_transaction_id: Option<String>,

    /// Transaction total, when known.
    pub amount: Option<Money>,

    #[ts(as = "String")]
    pub occurred_at: DateTime<Utc>,
}

impl RewardEvent {
    pub fn new(action: BusinessAction) -> Self {
        RewardEvent {
            id: Uuid::new_v4().to_string(),
            action,
            source_transaction_id: None,
            amount: None,
            occurred_at: Utc::now(),
        }
    }

    /// The event for a captured transaction.
    pub fn for_transaction(transaction: &CapturedTransaction) -> Self {
        RewardEvent {
            source_transaction_id: Some(transaction.id().to_string()),
            amount: Some(transaction.total_amount()),
            ..RewardEvent::new(transaction.reward_action())
        }
    }
}

// =============================================================================
// Reward Sink
// =============================================================================

/// Where reward events go. Implemented by the gamification ledger adapter.
pub trait RewardSink {
    fn deliver(&mut self, event: &RewardEvent);
}

impl<S: RewardSink + ?Sized> RewardSink for &mut S {
    fn deliver(&mut self, event: &RewardEvent) {
        (**self).deliver(event);
    }
}

impl<S: RewardSink + ?Sized> RewardSink for Box<S> {
    fn deliver(&mut self, event: &RewardEvent) {
        (**self).deliver(event);
    }
}

/// Keeps every delivered event in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<RewardEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RewardEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl RewardSink for RecordingSink {
    fn deliver(&mut self, event: &RewardEvent) {
        self.events.push(event.clone());
    }
}

/// Adapts a closure into a sink.
pub struct CallbackSink<F>(pub F);

impl<F> RewardSink for CallbackSink<F>
where
    F: FnMut(&RewardEvent),
{
    fn deliver(&mut self, event: &RewardEvent) {
        (self.0)(event);
    }
}

impl<F> fmt::Debug for CallbackSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallbackSink")
    }
}

// =============================================================================
// Reward Emitter
// =============================================================================

/// Builds reward events and hands them to the injected sink.
#[derive(Debug)]
pub struct RewardEmitter<S> {
    sink: S,
    emitted: u64,
}

impl<S: RewardSink> RewardEmitter<S> {
    pub fn new(sink: S) -> Self {
        RewardEmitter { sink, emitted: 0 }
    }

    /// Emits a bare event for `action`.
    pub fn emit(&mut self, action: BusinessAction) -> RewardEvent {
        self.dispatch(RewardEvent::new(action))
    }

    /// Emits the event for a captured transaction.
    pub fn emit_for(&mut self, transaction: &CapturedTransaction) -> RewardEvent {
        self.dispatch(RewardEvent::for_transaction(transaction))
    }

    /// Number of events emitted through this emitter.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn dispatch(&mut self, event: RewardEvent) -> RewardEvent {
        info!(
            event_id = %event.id,
            action = %event.action,
            transaction_id = event.source_transaction_id.as_deref().unwrap_or("-"),
            "Reward event emitted"
        );
        self.sink.deliver(&event);
        self.emitted += 1;
        event
    }
}
