//! # Unit Conversion
//!
//! Converts between a stock item's bulk unit and its retail sub-units, and
//! resolves the standard price and unit cost for a chosen unit type.
//!
//! ## Conversion Ratio
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rice: 1 × "50kg bag"  ==  200 × "cup"  ==  40 × "mudu"                 │
//! │                                                                         │
//! │  bulk → retail   : qty × units_per_bulk          (3 bags → 600 cups)    │
//! │  retail → bulk   : qty ÷ units_per_bulk          (50 cups → 0.25 bag)   │
//! │  retail → retail : qty × to_ratio ÷ from_ratio   (20 cups → 4 mudu)     │
//! │                                                                         │
//! │  The bulk unit itself has an implicit ratio of 1.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Conversions run on exact fractions (`ExactQuantity`) so that a ratio
//! such as 12 per crate converts there and back without drift. Decimal is
//! used only at the edges, for entered and displayed quantities.
//!
//! All functions here are pure.

use num_rational::Ratio;
use num_traits::{CheckedDiv, CheckedMul};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{StockItem, UnitType};

/// A quantity held as an exact fraction.
pub type ExactQuantity = Ratio<i128>;

/// The exact value of a decimal quantity (`mantissa / 10^scale`).
///
/// ## Example
/// ```rust
/// use tally_core::units::exact_quantity;
/// use num_rational::Ratio;
/// use rust_decimal::Decimal;
///
/// assert_eq!(exact_quantity(Decimal::new(25, 2)), Ratio::new(1, 4));
/// ```
pub fn exact_quantity(quantity: Decimal) -> ExactQuantity {
    Ratio::new(quantity.mantissa(), 10i128.pow(quantity.scale()))
}

/// Renders an exact quantity as a Decimal for display.
///
/// Fractions without a terminating decimal form are rounded at Decimal's
/// 28-digit precision.
pub fn display_quantity(quantity: &ExactQuantity) -> CoreResult<Decimal> {
    let too_large = || CoreError::invalid_input("quantity", "too large to display");
    let numer = Decimal::try_from_i128_with_scale(*quantity.numer(), 0).map_err(|_| too_large())?;
    let denom = Decimal::try_from_i128_with_scale(*quantity.denom(), 0).map_err(|_| too_large())?;
    numer.checked_div(denom).ok_or_else(too_large)
}

/// The price facts for one unit type of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ResolvedUnit {
    /// The unit that was resolved.
    pub unit_type: UnitType,

    /// Human label: the bulk unit name or the retail unit name.
    pub label: String,

    /// Catalog price for one of this unit.
    pub standard_price: Money,

    /// How many of this unit make one bulk unit (1 for bulk).
    #[ts(type = "string")]
    pub units_per_bulk: Decimal,
}

/// Resolves the label and standard price for `unit_type` on `item`.
///
/// ## Errors
/// - `UnknownUnit` when the retail unit is not declared on the item
/// - `InvalidStockItem` when the declared ratio is not positive
///
/// ## Example
/// ```rust
/// # use tally_core::types::{StockItem, RetailUnit, UnitType};
/// # use tally_core::money::Money;
/// # use tally_core::units::resolve_unit_price;
/// # use rust_decimal::Decimal;
/// # let rice = StockItem {
/// #     id: "rice".into(), name: "Rice".into(), category: "Grains".into(),
/// #     bulk_unit: "50kg bag".into(),
/// #     retail_units: vec![RetailUnit::new("cup", Decimal::from(200), Money::from_major(200))],
/// #     cost_price_per_bulk: Money::from_major(32_000),
/// #     standard_bulk_price: Money::from_major(35_000),
/// #     quantity_on_hand: Decimal::from(4),
/// # };
/// let cup = resolve_unit_price(&rice, &UnitType::Retail("cup".into())).unwrap();
/// assert_eq!(cup.label, "cup");
/// assert_eq!(cup.standard_price, Money::from_major(200));
///
/// let bag = resolve_unit_price(&rice, &UnitType::Bulk).unwrap();
/// assert_eq!(bag.label, "50kg bag");
/// assert_eq!(bag.standard_price, Money::from_major(35_000));
/// ```
pub fn resolve_unit_price(item: &StockItem, unit_type: &UnitType) -> CoreResult<ResolvedUnit> {
    match unit_type {
        UnitType::Bulk => Ok(ResolvedUnit {
            unit_type: UnitType::Bulk,
            label: item.bulk_unit.clone(),
            standard_price: item.standard_bulk_price,
            units_per_bulk: Decimal::ONE,
        }),
        UnitType::Retail(name) => {
            let unit = item.retail_unit(name).ok_or_else(|| unknown_unit(item, name))?;
            ensure_positive_ratio(item, &unit.unit_name, unit.units_per_bulk)?;
            Ok(ResolvedUnit {
                unit_type: UnitType::Retail(unit.unit_name.clone()),
                label: unit.unit_name.clone(),
                standard_price: unit.standard_retail_price,
                units_per_bulk: unit.units_per_bulk,
            })
        }
    }
}

/// Returns how many of `unit_type` make one bulk unit.
pub fn units_per_bulk(item: &StockItem, unit_type: &UnitType) -> CoreResult<Decimal> {
    match unit_type {
        UnitType::Bulk => Ok(Decimal::ONE),
        UnitType::Retail(name) => {
            let unit = item.retail_unit(name).ok_or_else(|| unknown_unit(item, name))?;
            ensure_positive_ratio(item, &unit.unit_name, unit.units_per_bulk)?;
            Ok(unit.units_per_bulk)
        }
    }
}

/// Converts `quantity` counted in `from` units into `to` units.
///
/// The arithmetic is exact, so converting back always returns the original
/// quantity, whatever the ratios are.
///
/// ## Example
/// ```rust
/// # use tally_core::types::{StockItem, RetailUnit, UnitType};
/// # use tally_core::money::Money;
/// # use tally_core::units::{convert_quantity, exact_quantity};
/// # use num_rational::Ratio;
/// # use rust_decimal::Decimal;
/// # let eggs = StockItem {
/// #     id: "eggs".into(), name: "Eggs".into(), category: "Poultry".into(),
/// #     bulk_unit: "crate".into(),
/// #     retail_units: vec![RetailUnit::new("piece", Decimal::from(12), Money::from_major(250))],
/// #     cost_price_per_bulk: Money::from_major(2_400),
/// #     standard_bulk_price: Money::from_major(2_800),
/// #     quantity_on_hand: Decimal::from(4),
/// # };
/// let piece = UnitType::Retail("piece".into());
/// let pieces = convert_quantity(&eggs, &UnitType::Bulk, &piece, exact_quantity(Decimal::from(3))).unwrap();
/// assert_eq!(pieces, Ratio::from_integer(36));
///
/// let crates = convert_quantity(&eggs, &piece, &UnitType::Bulk, Ratio::from_integer(1)).unwrap();
/// assert_eq!(crates, Ratio::new(1, 12));
/// let back = convert_quantity(&eggs, &UnitType::Bulk, &piece, crates).unwrap();
/// assert_eq!(back, Ratio::from_integer(1));
/// ```
pub fn convert_quantity(
    item: &StockItem,
    from: &UnitType,
    to: &UnitType,
    quantity: ExactQuantity,
) -> CoreResult<ExactQuantity> {
    let from_ratio = units_per_bulk(item, from)?;
    let to_ratio = units_per_bulk(item, to)?;

    if from_ratio == to_ratio {
        return Ok(quantity);
    }

    quantity
        .checked_mul(&exact_quantity(to_ratio))
        .and_then(|scaled| scaled.checked_div(&exact_quantity(from_ratio)))
        .ok_or_else(|| CoreError::invalid_input("quantity", "too large to convert"))
}

/// Cost of one `unit_type` of `item`.
///
/// Bulk: `cost_price_per_bulk`. Retail: `cost_price_per_bulk / units_per_bulk`,
/// rounded to the nearest minor unit (half to even). This is the displayed
/// per-unit figure; totals use [`total_cost`] instead.
pub fn unit_cost(item: &StockItem, unit_type: &UnitType) -> CoreResult<Money> {
    let ratio = units_per_bulk(item, unit_type)?;
    if ratio == Decimal::ONE {
        return Ok(item.cost_price_per_bulk);
    }

    item.cost_price_per_bulk
        .checked_div_quantity(ratio)
        .ok_or_else(|| CoreError::invalid_input("unit cost", "cannot be represented"))
}

/// Cost of `quantity` of `unit_type`: `cost_price_per_bulk × quantity ÷
/// units_per_bulk`, rounded once to the nearest minor unit (half to even).
///
/// ## Errors
/// `InvalidInput` when the quantity is negative or the total overflows.
///
/// ## Example
/// ```rust
/// # use tally_core::types::{StockItem, RetailUnit, UnitType};
/// # use tally_core::money::Money;
/// # use tally_core::units::{total_cost, unit_cost};
/// # use rust_decimal::Decimal;
/// # let oil = StockItem {
/// #     id: "oil".into(), name: "Oil".into(), category: "Cooking".into(),
/// #     bulk_unit: "drum".into(),
/// #     retail_units: vec![RetailUnit::new("cup", Decimal::from(200), Money::from_major(160))],
/// #     cost_price_per_bulk: Money::from_minor(3_200_100),
/// #     standard_bulk_price: Money::from_major(35_000),
/// #     quantity_on_hand: Decimal::from(1),
/// # };
/// let cup = UnitType::Retail("cup".into());
/// assert_eq!(unit_cost(&oil, &cup).unwrap(), Money::from_minor(16_000));
/// assert_eq!(total_cost(&oil, &cup, Decimal::from(200)).unwrap(), Money::from_minor(3_200_100));
/// ```
pub fn total_cost(item: &StockItem, unit_type: &UnitType, quantity: Decimal) -> CoreResult<Money> {
    if quantity < Decimal::ZERO {
        return Err(CoreError::invalid_input("quantity", "must not be negative"));
    }
    let bulk = convert_quantity(item, unit_type, &UnitType::Bulk, exact_quantity(quantity))?;
    item.cost_price_per_bulk
        .checked_mul_ratio(&bulk)
        .ok_or_else(|| CoreError::invalid_input("total cost", "too large"))
}

fn unknown_unit(item: &StockItem, unit: &str) -> CoreError {
    CoreError::UnknownUnit {
        item: item.name.clone(),
        unit: unit.to_string(),
    }
}

fn ensure_positive_ratio(item: &StockItem, unit: &str, ratio: Decimal) -> CoreResult<()> {
    if ratio <= Decimal::ZERO {
        return Err(CoreError::InvalidStockItem {
            item: item.name.clone(),
            reason: format!("units per bulk for '{}' must be > 0", unit),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RetailUnit;

    fn rice() -> StockItem {
        StockItem {
            id: "rice".to_string(),
            name: "Rice".to_string(),
            category: "Grains".to_string(),
            bulk_unit: "50kg bag".to_string(),
            retail_units: vec![
                RetailUnit::new("cup", Decimal::from(200), Money::from_major(200)),
                RetailUnit::new("mudu", Decimal::from(40), Money::from_major(950)),
            ],
            cost_price_per_bulk: Money::from_major(32_000),
            standard_bulk_price: Money::from_major(35_000),
            quantity_on_hand: Decimal::from(3),
        }
    }

    fn cup() -> UnitType {
        UnitType::Retail("cup".to_string())
    }

    #[test]
    fn test_resolve_bulk_and_retail() {
        let item = rice();
        let bag = resolve_unit_price(&item, &UnitType::Bulk).unwrap();
        assert_eq!(bag.label, "50kg bag");
        assert_eq!(bag.units_per_bulk, Decimal::ONE);

        let mudu = resolve_unit_price(&item, &UnitType::Retail("MUDU".to_string())).unwrap();
        assert_eq!(mudu.label, "mudu");
        assert_eq!(mudu.standard_price, Money::from_major(950));
        assert_eq!(mudu.unit_type, UnitType::Retail("mudu".to_string()));
    }

    #[test]
    fn test_resolve_unknown_unit() {
        let err = resolve_unit_price(&rice(), &UnitType::Retail("tin".to_string())).unwrap_err();
        assert!(matches!(err, CoreError::UnknownUnit { .. }));
    }

    #[test]
    fn test_convert_between_retail_units() {
        let item = rice();
        let mudu = UnitType::Retail("mudu".to_string());
        let result = convert_quantity(&item, &cup(), &mudu, Ratio::from_integer(20)).unwrap();
        assert_eq!(result, Ratio::from_integer(4));
    }

    #[test]
    fn test_convert_same_unit_is_identity() {
        let item = rice();
        let q = exact_quantity(Decimal::new(25, 1));
        assert_eq!(convert_quantity(&item, &cup(), &cup(), q).unwrap(), q);
    }

    #[test]
    fn test_convert_unknown_unit_fails() {
        let item = rice();
        let tin = UnitType::Retail("tin".to_string());
        assert!(convert_quantity(&item, &tin, &UnitType::Bulk, Ratio::from_integer(1)).is_err());
    }

    #[test]
    fn test_dozen_ratio_round_trips_exactly() {
        let mut item = rice();
        item.retail_units.push(RetailUnit::new("piece", Decimal::from(12), Money::from_major(50)));
        let piece = UnitType::Retail("piece".to_string());

        let one = Ratio::from_integer(1);
        let crates = convert_quantity(&item, &piece, &UnitType::Bulk, one).unwrap();
        assert_eq!(crates, Ratio::new(1, 12));
        assert_eq!(convert_quantity(&item, &UnitType::Bulk, &piece, crates).unwrap(), one);

        let cups = convert_quantity(&item, &piece, &cup(), one).unwrap();
        assert_eq!(cups, Ratio::new(50, 3));
        assert_eq!(convert_quantity(&item, &cup(), &piece, cups).unwrap(), one);
    }

    #[test]
    fn test_exact_and_display_quantity() {
        assert_eq!(exact_quantity(Decimal::new(-15, 1)), Ratio::new(-3, 2));
        assert_eq!(display_quantity(&Ratio::new(1, 4)).unwrap(), Decimal::new(25, 2));
        assert_eq!(display_quantity(&Ratio::from_integer(600)).unwrap(), Decimal::from(600));
    }

    #[test]
    fn test_unit_cost() {
        let item = rice();
        assert_eq!(unit_cost(&item, &UnitType::Bulk).unwrap(), Money::from_major(32_000));
        assert_eq!(unit_cost(&item, &cup()).unwrap(), Money::from_major(160));
    }

    #[test]
    fn test_total_cost_rounds_once() {
        let mut item = rice();
        item.cost_price_per_bulk = Money::from_minor(3_200_100);

        // the per-cup figure alone rounds 16,000.5 kobo down to 16,000
        assert_eq!(unit_cost(&item, &cup()).unwrap(), Money::from_minor(16_000));
        assert_eq!(total_cost(&item, &cup(), Decimal::from(200)).unwrap(), Money::from_minor(3_200_100));
        assert_eq!(total_cost(&item, &cup(), Decimal::ONE).unwrap(), Money::from_minor(16_000));
        assert_eq!(total_cost(&item, &cup(), Decimal::from(3)).unwrap(), Money::from_minor(48_002));
        assert!(matches!(
            total_cost(&item, &cup(), Decimal::from(-1)),
            Err(CoreError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_zero_ratio_is_rejected() {
        let mut item = rice();
        item.retail_units[0].units_per_bulk = Decimal::ZERO;
        assert!(matches!(
            unit_cost(&item, &cup()),
            Err(CoreError::InvalidStockItem { .. })
        ));
    }
}
