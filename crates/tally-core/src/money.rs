//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A cup priced ₦200.00 compared against a standard price that went      │
//! │  through float math can come back as 199.99999999999997 and the        │
//! │  "at standard" check silently fails.                                   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units (kobo)                               │
//! │    ₦200.00 = 20000 kobo, compared with plain integer equality          │
//! │    Fractional quantities (2.5 cups) are Decimal, and every             │
//! │    Money × quantity product is rounded back to whole kobo once          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let cup = Money::from_minor(20_000); // ₦200.00
//!
//! let ten_cups = cup * 10;
//! assert_eq!(ten_cups.minor(), 200_000);
//!
//! let two_and_a_half = cup.checked_mul_quantity(Decimal::new(25, 1)).unwrap();
//! assert_eq!(two_and_a_half.minor(), 50_000);
//! ```

use num_rational::Ratio;
use num_traits::{CheckedMul, CheckedSub};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Minor units per major unit (kobo per naira, cents per dollar).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (kobo for NGN).
///
/// ## Design Decisions
/// - **i64 (signed)**: profit and price deviation can be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  StockItem.standard_bulk_price ──► resolve_unit_price ──► draft price   │
/// │                                                                         │
/// │  draft price × quantity ──► total_amount ─┐                             │
/// │  unit cost   × quantity ──► total_cost  ──┴──► total_profit             │
/// │                                                                         │
/// │  entered price vs standard price ──► PriceDeviation.delta               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (kobo).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_minor(3_500_000); // ₦35,000.00
    /// assert_eq!(price.minor(), 3_500_000);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units (naira and kobo).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -₦5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Creates a Money value from whole major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (naira) portion, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the amount as a Decimal number of minor units.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Multiplies by a (possibly fractional) quantity.
    ///
    /// The exact product is rounded to whole minor units with Bankers
    /// Rounding (round half to even). Returns `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// // 1.5 × 1 kobo = 1.5 → 2 (nearest even)
    /// let m = Money::from_minor(1).checked_mul_quantity(Decimal::new(15, 1));
    /// assert_eq!(m, Some(Money::from_minor(2)));
    ///
    /// // 2.5 × 1 kobo = 2.5 → 2 (nearest even)
    /// let m = Money::from_minor(1).checked_mul_quantity(Decimal::new(25, 1));
    /// assert_eq!(m, Some(Money::from_minor(2)));
    /// ```
    pub fn checked_mul_quantity(&self, quantity: Decimal) -> Option<Money> {
        let product = self.to_decimal().checked_mul(quantity)?;
        Self::round_to_minor(product)
    }

    /// Divides by a (possibly fractional) divisor, rounding to whole minor
    /// units with Bankers Rounding. Returns `None` for a zero divisor or on
    /// overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// // ₦32,000 bag split into 200 cups = ₦160 per cup
    /// let bag = Money::from_major(32_000);
    /// let cup = bag.checked_div_quantity(Decimal::from(200)).unwrap();
    /// assert_eq!(cup, Money::from_major(160));
    /// ```
    pub fn checked_div_quantity(&self, divisor: Decimal) -> Option<Money> {
        if divisor.is_zero() {
            return None;
        }
        let quotient = self.to_decimal().checked_div(divisor)?;
        Self::round_to_minor(quotient)
    }

    /// Multiplies by an exact fraction and rounds once, half to even.
    ///
    /// Used for cost figures such as `cost per bulk × quantity ÷ units per
    /// bulk`, where rounding the per-unit cost first would let the error
    /// grow with the quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    /// use num_rational::Ratio;
    ///
    /// // 200 of 200 units from a bag costing ₦32,001.00
    /// let bag = Money::from_minor(3_200_100);
    /// assert_eq!(bag.checked_mul_ratio(&Ratio::new(200, 200)), Some(bag));
    ///
    /// // 1 kobo × 5/2 = 2.5 → 2 (nearest even)
    /// let m = Money::from_minor(1).checked_mul_ratio(&Ratio::new(5, 2));
    /// assert_eq!(m, Some(Money::from_minor(2)));
    /// ```
    pub fn checked_mul_ratio(&self, factor: &Ratio<i128>) -> Option<Money> {
        let exact = factor.checked_mul(&Ratio::from_integer(i128::from(self.0)))?;
        let floor = exact.floor();
        let remainder = exact.checked_sub(&floor)?;
        let half = Ratio::new(1, 2);

        let mut whole = floor.to_integer();
        if remainder > half || (remainder == half && whole % 2 != 0) {
            whole = whole.checked_add(1)?;
        }
        i64::try_from(whole).ok().map(Money)
    }

    /// Checked subtraction, `None` on overflow.
    #[inline]
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    fn round_to_minor(value: Decimal) -> Option<Money> {
        value
            .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            .to_i64()
            .map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain `major.minor` rendering without a currency symbol.
///
/// Use `CaptureConfig::format_money` for symbol and digit grouping.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a whole quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
