//! # tally-core: Pure Bookkeeping Logic for Tally
//!
//! This crate holds the figures behind transaction capture as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 App shell (external)                            │   │
//! │  │    Money in / out ──► Catalog browser ──► Capture screens       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 tally-capture                                   │   │
//! │  │    FlowRouter ──► CaptureWizard ──► RewardEmitter               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────────────────┐  │   │
//! │  │   │  money  │  │  units  │  │ pricing │  │ ledger           │  │   │
//! │  │   │  Money  │  │ convert │  │classify │  │ compute, figures │  │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO LOGGING • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (StockItem, UnitType, FlowKind, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`units`] - Bulk / retail unit conversion and unit prices
//! - [`pricing`] - Price deviation against the standard price
//! - [`ledger`] - Amount, cost and profit figures
//! - [`validation`] - Raw input parsing and field rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, safe to call per keystroke
//! 2. **Integer Money**: amounts are minor units (kobo) in an i64
//! 3. **Exact Quantities**: entered as decimals, converted as exact fractions
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::ledger::compute;
//! use tally_core::pricing::{classify, DeviationStatus};
//! use tally_core::Money;
//! use rust_decimal::Decimal;
//!
//! // 10 cups of rice at ₦200, each cup cost ₦160
//! let totals = compute(Decimal::from(10), Money::from_major(160), Money::from_major(200)).unwrap();
//! assert_eq!(totals.total_profit, Money::from_major(400));
//!
//! // Selling at ₦150 instead of the ₦200 standard
//! let deviation = classify(Money::from_major(150), Money::from_major(200));
//! assert_eq!(deviation.status, DeviationStatus::Below);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod pricing;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{DerivedFigures, SaleTotals};
pub use money::Money;
pub use pricing::{DeviationStatus, PriceDeviation};
pub use types::*;
pub use units::{ExactQuantity, ResolvedUnit};

// Quantities are rust_decimal values; re-exported so callers need not
// depend on the crate directly.
pub use rust_decimal::Decimal;
