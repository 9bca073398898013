//! # Sale Ledger Calculator
//!
//! Turns raw entry fields into the live figures shown while a sale is being
//! captured.
//!
//! ## Figure Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StockItem + unit type ──► resolve_unit_price ──► standard price        │
//! │                       └──► unit_cost          ──► unit cost (display)   │
//! │                                                                         │
//! │  DerivedFigures::derive(item, unit type, quantity, price per unit)      │
//! │     total_amount = round(quantity × price per unit)                     │
//! │     total_cost   = round(cost per bulk × quantity ÷ units per bulk)     │
//! │     total_profit = total_amount − total_cost                            │
//! │     is_loss      = total_profit < 0        (a warning, never an error)  │
//! │                                                                         │
//! │  classify(price per unit, standard price) ──► price deviation           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `DerivedFigures` is a read-only projection: it is recomputed from the
//! draft and the stock item on every keystroke and never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{classify, PriceDeviation};
use crate::types::{StockItem, UnitType};
use crate::units::{
    convert_quantity, display_quantity, exact_quantity, resolve_unit_price, total_cost, unit_cost,
};

// =============================================================================
// Sale Totals
// =============================================================================

/// Output of [`compute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleTotals {
    pub total_amount: Money,
    pub total_cost: Money,
    pub total_profit: Money,
    pub is_loss: bool,
}

/// Computes amount, cost and profit for a sale line.
///
/// `quantity` may be fractional (2.5 cups). Each total is rounded to whole
/// minor units once; profit is taken from the rounded totals so
/// `total_profit == total_amount - total_cost` always holds exactly.
///
/// ## Errors
/// `InvalidInput` when any input is negative or a total overflows. This is
/// the only validation performed here.
///
/// ## Example
/// ```rust
/// use tally_core::ledger::compute;
/// use tally_core::money::Money;
/// use rust_decimal::Decimal;
///
/// let t = compute(Decimal::from(10), Money::from_major(160), Money::from_major(120)).unwrap();
/// assert_eq!(t.total_amount, Money::from_major(1_200));
/// assert_eq!(t.total_cost, Money::from_major(1_600));
/// assert_eq!(t.total_profit, Money::from_major(-400));
/// assert!(t.is_loss);
/// ```
pub fn compute(quantity: Decimal, unit_cost: Money, unit_price: Money) -> CoreResult<SaleTotals> {
    check_inputs(quantity, unit_cost, unit_price)?;

    let total_amount = line_amount(quantity, unit_price)?;
    let total_cost = unit_cost
        .checked_mul_quantity(quantity)
        .ok_or_else(|| CoreError::invalid_input("total cost", "too large"))?;
    settle(total_amount, total_cost)
}

fn check_inputs(quantity: Decimal, unit_cost: Money, unit_price: Money) -> CoreResult<()> {
    if quantity < Decimal::ZERO {
        return Err(CoreError::invalid_input("quantity", "must not be negative"));
    }
    if unit_cost.is_negative() {
        return Err(CoreError::invalid_input("unit cost", "must not be negative"));
    }
    if unit_price.is_negative() {
        return Err(CoreError::invalid_input("unit price", "must not be negative"));
    }
    Ok(())
}

fn line_amount(quantity: Decimal, unit_price: Money) -> CoreResult<Money> {
    unit_price
        .checked_mul_quantity(quantity)
        .ok_or_else(|| CoreError::invalid_input("total amount", "too large"))
}

fn settle(total_amount: Money, total_cost: Money) -> CoreResult<SaleTotals> {
    let total_profit = total_amount
        .checked_sub(total_cost)
        .ok_or_else(|| CoreError::invalid_input("total profit", "too large"))?;

    Ok(SaleTotals {
        total_amount,
        total_cost,
        total_profit,
        is_loss: total_profit.is_negative(),
    })
}

// =============================================================================
// Derived Figures
// =============================================================================

/// Everything the product-sale screens display live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DerivedFigures {
    pub unit_type: UnitType,

    /// "50kg bag" or "cup".
    pub unit_label: String,

    #[ts(type = "string")]
    pub quantity: Decimal,

    pub price_per_unit: Money,

    /// Catalog price for the selected unit.
    pub standard_price: Money,

    pub unit_cost: Money,
    pub total_amount: Money,
    pub total_cost: Money,
    pub total_profit: Money,

    /// Selling below cost. Shown as a warning; submission is still allowed.
    pub is_loss: bool,

    pub price_deviation: PriceDeviation,

    /// The entered quantity expressed in bulk units.
    #[ts(type = "string")]
    pub bulk_quantity: Decimal,

    /// More is being sold than the catalog has on hand. Warning only.
    pub exceeds_stock: bool,
}

impl DerivedFigures {
    /// Recomputes every figure from the item and the three raw inputs.
    ///
    /// Total cost is taken from the bulk cost in one rounding, so it can
    /// differ from `quantity × unit_cost` when the per-unit cost has a
    /// fractional kobo.
    ///
    /// ## Example
    /// ```rust
    /// # use tally_core::types::{StockItem, RetailUnit, UnitType};
    /// # use tally_core::money::Money;
    /// # use tally_core::ledger::DerivedFigures;
    /// # use rust_decimal::Decimal;
    /// # let rice = StockItem {
    /// #     id: "rice".into(), name: "Rice".into(), category: "Grains".into(),
    /// #     bulk_unit: "50kg bag".into(),
    /// #     retail_units: vec![RetailUnit::new("cup", Decimal::from(200), Money::from_major(200))],
    /// #     cost_price_per_bulk: Money::from_major(32_000),
    /// #     standard_bulk_price: Money::from_major(35_000),
    /// #     quantity_on_hand: Decimal::from(4),
    /// # };
    /// let cup = UnitType::Retail("cup".into());
    /// let f = DerivedFigures::derive(&rice, &cup, Decimal::from(10), Money::from_major(200)).unwrap();
    /// assert_eq!(f.total_amount, Money::from_major(2_000));
    /// assert_eq!(f.unit_cost, Money::from_major(160));
    /// assert_eq!(f.total_profit, Money::from_major(400));
    /// assert!(!f.is_loss);
    /// ```
    pub fn derive(
        item: &StockItem,
        unit_type: &UnitType,
        quantity: Decimal,
        price_per_unit: Money,
    ) -> CoreResult<DerivedFigures> {
        let resolved = resolve_unit_price(item, unit_type)?;
        let cost = unit_cost(item, unit_type)?;
        check_inputs(quantity, cost, price_per_unit)?;

        let totals = settle(
            line_amount(quantity, price_per_unit)?,
            total_cost(item, unit_type, quantity)?,
        )?;
        let bulk = convert_quantity(item, unit_type, &UnitType::Bulk, exact_quantity(quantity))?;

        Ok(DerivedFigures {
            unit_type: resolved.unit_type,
            unit_label: resolved.label,
            quantity,
            price_per_unit,
            standard_price: resolved.standard_price,
            unit_cost: cost,
            total_amount: totals.total_amount,
            total_cost: totals.total_cost,
            total_profit: totals.total_profit,
            is_loss: totals.is_loss,
            price_deviation: classify(price_per_unit, resolved.standard_price),
            bulk_quantity: display_quantity(&bulk)?,
            exceeds_stock: bulk > exact_quantity(item.quantity_on_hand),
        })
    }

    /// The totals part of the figures.
    pub fn totals(&self) -> SaleTotals {
        SaleTotals {
            total_amount: self.total_amount,
            total_cost: self.total_cost,
            total_profit: self.total_profit,
            is_loss: self.is_loss,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::DeviationStatus;
    use crate::types::RetailUnit;

    fn rice() -> StockItem {
        StockItem {
            id: "rice".to_string(),
            name: "Rice".to_string(),
            category: "Grains".to_string(),
            bulk_unit: "50kg bag".to_string(),
            retail_units: vec![RetailUnit::new("cup", Decimal::from(200), Money::from_major(200))],
            cost_price_per_bulk: Money::from_major(32_000),
            standard_bulk_price: Money::from_major(35_000),
            quantity_on_hand: Decimal::from(2),
        }
    }

    fn cup() -> UnitType {
        UnitType::Retail("cup".to_string())
    }

    #[test]
    fn test_compute_profit() {
        let t = compute(Decimal::from(10), Money::from_major(160), Money::from_major(200)).unwrap();
        assert_eq!(t.total_amount, Money::from_major(2_000));
        assert_eq!(t.total_cost, Money::from_major(1_600));
        assert_eq!(t.total_profit, Money::from_major(400));
        assert!(!t.is_loss);
    }

    #[test]
    fn test_compute_fractional_quantity() {
        let t = compute(Decimal::new(25, 1), Money::from_major(160), Money::from_major(200)).unwrap();
        assert_eq!(t.total_amount, Money::from_major(500));
        assert_eq!(t.total_cost, Money::from_major(400));
    }

    #[test]
    fn test_compute_zero_quantity_is_valid() {
        let t = compute(Decimal::ZERO, Money::from_major(160), Money::from_major(200)).unwrap();
        assert!(t.total_amount.is_zero());
        assert!(!t.is_loss);
    }

    #[test]
    fn test_compute_rejects_negative_inputs() {
        let neg = Decimal::from(-1);
        assert!(matches!(
            compute(neg, Money::zero(), Money::zero()),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(compute(Decimal::ONE, Money::from_minor(-1), Money::zero()).is_err());
        assert!(compute(Decimal::ONE, Money::zero(), Money::from_minor(-1)).is_err());
    }

    #[test]
    fn test_derive_retail_at_standard() {
        let f = DerivedFigures::derive(&rice(), &cup(), Decimal::from(10), Money::from_major(200)).unwrap();
        assert_eq!(f.unit_label, "cup");
        assert_eq!(f.standard_price, Money::from_major(200));
        assert!(f.price_deviation.is_standard());
        assert_eq!(f.bulk_quantity, Decimal::new(5, 2));
        assert!(!f.exceeds_stock);
    }

    #[test]
    fn test_derive_below_cost_is_flagged_not_rejected() {
        let f = DerivedFigures::derive(&rice(), &cup(), Decimal::from(10), Money::from_major(120)).unwrap();
        assert_eq!(f.total_profit, Money::from_major(-400));
        assert!(f.is_loss);
        assert_eq!(f.price_deviation.status, DeviationStatus::Below);
        assert_eq!(f.price_deviation.delta, Money::from_major(80));
    }

    #[test]
    fn test_derive_bulk_over_stock() {
        let f = DerivedFigures::derive(&rice(), &UnitType::Bulk, Decimal::from(3), Money::from_major(35_000)).unwrap();
        assert_eq!(f.unit_label, "50kg bag");
        assert_eq!(f.unit_cost, Money::from_major(32_000));
        assert_eq!(f.total_profit, Money::from_major(9_000));
        assert!(f.exceeds_stock);
    }

    #[test]
    fn test_derive_rounds_total_cost_once() {
        let mut item = rice();
        item.cost_price_per_bulk = Money::from_minor(3_200_100);

        let f = DerivedFigures::derive(&item, &cup(), Decimal::from(200), Money::from_minor(16_000)).unwrap();
        assert_eq!(f.unit_cost, Money::from_minor(16_000));
        assert_eq!(f.total_amount, Money::from_minor(3_200_000));
        assert_eq!(f.total_cost, Money::from_minor(3_200_100));
        assert_eq!(f.total_profit, Money::from_minor(-100));
        assert!(f.is_loss);
    }

    #[test]
    fn test_derive_dozen_stays_within_stock() {
        let mut item = rice();
        item.retail_units.push(RetailUnit::new("piece", Decimal::from(12), Money::from_major(50)));
        item.quantity_on_hand = Decimal::ONE;
        let piece = UnitType::Retail("piece".to_string());

        let f = DerivedFigures::derive(&item, &piece, Decimal::from(12), Money::from_major(50)).unwrap();
        assert_eq!(f.bulk_quantity, Decimal::ONE);
        assert!(!f.exceeds_stock);
        assert!(DerivedFigures::derive(&item, &piece, Decimal::from(13), Money::from_major(50))
            .unwrap()
            .exceeds_stock);
    }

    #[test]
    fn test_derive_rejects_negative_quantity() {
        assert!(matches!(
            DerivedFigures::derive(&rice(), &cup(), Decimal::from(-1), Money::from_major(200)),
            Err(CoreError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_derive_unknown_unit() {
        let tin = UnitType::Retail("tin".to_string());
        assert!(matches!(
            DerivedFigures::derive(&rice(), &tin, Decimal::ONE, Money::zero()),
            Err(CoreError::UnknownUnit { .. })
        ));
    }
}
