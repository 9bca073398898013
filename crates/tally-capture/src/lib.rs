//! # tally-capture: Guided Transaction Capture for Tally
//!
//! This crate drives the step-by-step screens that record a product sale,
//! a service sale or an expense, and announces each recorded transaction
//! to the rewards ledger.
//!
//! ## Capture Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Capture Session                                  │
//! │                                                                         │
//! │  FlowChoice ("in"/"out", "product"/"service")                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  FlowRouter::start ──(product)──► ItemSelector (catalog browser)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CaptureWizard ◄── input / advance / retreat / select_unit_and_advance  │
//! │       │     │                                                           │
//! │       │     └──► DerivedFigures, running total, summary (live, pure)    │
//! │       │                                                                 │
//! │       ▼ advance() on confirm                                            │
//! │  CapturedTransaction ──► RewardEmitter ──► RewardSink (injected)        │
//! │       │                                                                 │
//! │       └──► returned to the shell for persistence                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`router`] - Top-level flow selection
//! - [`steps`] - Ordered step list per flow
//! - [`draft`] - Immutable in-progress record
//! - [`wizard`] - The capture state machine
//! - [`transaction`] - The record produced on submission
//! - [`reward`] - Reward events and the sink capability
//! - [`config`] - Currency display and field limits
//! - [`telemetry`] - Tracing subscriber setup
//! - [`error`] - Capture error types
//!
//! ## Threading
//!
//! Everything is synchronous. One wizard belongs to one session and is
//! driven by one UI event at a time; there is no shared state to lock.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod draft;
pub mod error;
pub mod reward;
pub mod router;
pub mod steps;
pub mod telemetry;
pub mod transaction;
pub mod wizard;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::CaptureConfig;
pub use draft::CaptureDraft;
pub use error::{CaptureError, CaptureResult};
pub use reward::{BusinessAction, CallbackSink, RecordingSink, RewardEmitter, RewardEvent, RewardSink};
pub use router::{CaptureFlow, Direction, FlowChoice, FlowRouter, ItemSelector, SaleKind};
pub use steps::{steps_for, Step};
pub use transaction::{CapturedTransaction, TransactionDetails};
pub use wizard::{Advance, CaptureWizard, FieldInput, Retreat, Submission, SummaryLine};
