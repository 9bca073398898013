//! # Domain Types
//!
//! Core domain types shared by the capture engine and the app shell.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐      ┌─────────────────────┐                  │
//! │  │     StockItem       │ 1..n │     RetailUnit      │                  │
//! │  │  ─────────────────  │─────►│  ─────────────────  │                  │
//! │  │  id, name, category │      │  unit_name ("cup")  │                  │
//! │  │  bulk_unit ("bag")  │      │  units_per_bulk     │                  │
//! │  │  cost / std price   │      │  standard_price     │                  │
//! │  │  quantity_on_hand   │      └─────────────────────┘                  │
//! │  └─────────────────────┘                                               │
//! │                                                                         │
//! │  ┌───────────────┐  ┌─────────────────┐  ┌───────────────────┐         │
//! │  │   UnitType    │  │    FlowKind     │  │  PaymentStatus    │         │
//! │  │  Bulk         │  │  ProductSale    │  │  Paid             │         │
//! │  │  Retail(name) │  │  ServiceSale    │  │  Unpaid (credit)  │         │
//! │  └───────────────┘  │  Expense        │  └───────────────────┘         │
//! │                     └─────────────────┘                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `StockItem` belongs to the external catalog and is read-only here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// The reserved unit-type name that always means "the bulk unit".
pub const BULK_UNIT_KEY: &str = "bulk";

// =============================================================================
// Retail Unit
// =============================================================================

/// A sub-division of a bulk unit that is sold on its own (e.g. a cup of rice).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RetailUnit {
    /// Display name, also the key used to select this unit ("cup").
    pub unit_name: String,

    /// How many of this unit make one bulk unit. Always > 0.
    #[ts(type = "string")]
    pub units_per_bulk: Decimal,

    /// Catalog price for one of this unit.
    pub standard_retail_price: Money,
}

impl RetailUnit {
    pub fn new(unit_name: impl Into<String>, units_per_bulk: Decimal, standard_retail_price: Money) -> Self {
        RetailUnit {
            unit_name: unit_name.into(),
            units_per_bulk,
            standard_retail_price,
        }
    }
}

// =============================================================================
// Stock Item
// =============================================================================

/// A catalog item that can be sold in bulk or in retail units.
///
/// ## Invariants
/// - `units_per_bulk > 0` for every retail unit
/// - amounts and `quantity_on_hand` are non-negative
/// - `cost_price_per_bulk <= standard_bulk_price` is NOT required; selling
///   below cost is a valid, flagged state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockItem {
    /// Stable catalog identifier.
    pub id: String,

    /// Display name ("Rice").
    pub name: String,

    /// Catalog category ("Grains").
    pub category: String,

    /// Name of the whole-unit container ("50kg bag").
    pub bulk_unit: String,

    /// Retail sub-units in catalog order.
    pub retail_units: Vec<RetailUnit>,

    /// What one bulk unit cost the business.
    pub cost_price_per_bulk: Money,

    /// Catalog selling price for one bulk unit.
    pub standard_bulk_price: Money,

    /// Stock level, in bulk units.
    #[ts(type = "string")]
    pub quantity_on_hand: Decimal,
}

impl StockItem {
    /// Looks up a retail unit by name (trimmed, case-insensitive).
    pub fn retail_unit(&self, unit_name: &str) -> Option<&RetailUnit> {
        let wanted = unit_name.trim();
        self.retail_units
            .iter()
            .find(|u| u.unit_name.eq_ignore_ascii_case(wanted))
    }

    /// Resolves a raw unit selection into a [`UnitType`].
    ///
    /// `"bulk"` and the item's own bulk unit name both select the bulk unit;
    /// any declared retail unit name selects that unit.
    ///
    /// ## Example
    /// ```rust
    /// # use tally_core::types::{StockItem, RetailUnit, UnitType};
    /// # use tally_core::money::Money;
    /// # use rust_decimal::Decimal;
    /// let rice = StockItem {
    ///     id: "rice".into(),
    ///     name: "Rice".into(),
    ///     category: "Grains".into(),
    ///     bulk_unit: "50kg bag".into(),
    ///     retail_units: vec![RetailUnit::new("cup", Decimal::from(200), Money::from_major(200))],
    ///     cost_price_per_bulk: Money::from_major(32_000),
    ///     standard_bulk_price: Money::from_major(35_000),
    ///     quantity_on_hand: Decimal::from(4),
    /// };
    /// assert_eq!(rice.unit_type("bulk").unwrap(), UnitType::Bulk);
    /// assert_eq!(rice.unit_type("50kg bag").unwrap(), UnitType::Bulk);
    /// assert_eq!(rice.unit_type("cup").unwrap(), UnitType::Retail("cup".into()));
    /// assert!(rice.unit_type("tin").is_err());
    /// ```
    pub fn unit_type(&self, raw: &str) -> CoreResult<UnitType> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(BULK_UNIT_KEY) || raw.eq_ignore_ascii_case(self.bulk_unit.trim()) {
            return Ok(UnitType::Bulk);
        }

        self.retail_unit(raw)
            .map(|u| UnitType::Retail(u.unit_name.clone()))
            .ok_or_else(|| CoreError::UnknownUnit {
                item: self.name.clone(),
                unit: raw.to_string(),
            })
    }

    /// Every selectable unit type, bulk first, then retail units in order.
    pub fn unit_types(&self) -> Vec<UnitType> {
        std::iter::once(UnitType::Bulk)
            .chain(
                self.retail_units
                    .iter()
                    .map(|u| UnitType::Retail(u.unit_name.clone())),
            )
            .collect()
    }

    /// Checks the catalog invariants.
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: String| CoreError::InvalidStockItem {
            item: self.name.clone(),
            reason,
        };

        if self.cost_price_per_bulk.is_negative() {
            return Err(invalid("cost price must not be negative".to_string()));
        }
        if self.standard_bulk_price.is_negative() {
            return Err(invalid("bulk price must not be negative".to_string()));
        }
        if self.quantity_on_hand < Decimal::ZERO {
            return Err(invalid("quantity on hand must not be negative".to_string()));
        }

        for unit in &self.retail_units {
            if unit.units_per_bulk <= Decimal::ZERO {
                return Err(invalid(format!(
                    "units per bulk for '{}' must be > 0",
                    unit.unit_name
                )));
            }
            if unit.standard_retail_price.is_negative() {
                return Err(invalid(format!(
                    "price for '{}' must not be negative",
                    unit.unit_name
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Unit Type
// =============================================================================

/// Which unit a product sale is counted in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", tag = "kind", content = "unit")]
#[ts(export)]
pub enum UnitType {
    /// The whole container ("50kg bag").
    Bulk,
    /// A named retail unit ("cup").
    Retail(String),
}

impl UnitType {
    pub fn is_bulk(&self) -> bool {
        matches!(self, UnitType::Bulk)
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitType::Bulk => write!(f, "{}", BULK_UNIT_KEY),
            UnitType::Retail(name) => write!(f, "{}", name),
        }
    }
}

// =============================================================================
// Flow Kind
// =============================================================================

/// The three capture flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FlowKind {
    /// Money in: a stock item sold in bulk or retail units.
    ProductSale,
    /// Money in: a service rendered.
    ServiceSale,
    /// Money out.
    Expense,
}

impl FlowKind {
    /// The kind of transaction this flow records.
    pub fn transaction_kind(&self) -> TransactionKind {
        match self {
            FlowKind::ProductSale => TransactionKind::SaleProduct,
            FlowKind::ServiceSale => TransactionKind::SaleService,
            FlowKind::Expense => TransactionKind::Expense,
        }
    }

    /// True for the two money-in flows.
    pub fn is_sale(&self) -> bool {
        !matches!(self, FlowKind::Expense)
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::ProductSale => write!(f, "product_sale"),
            FlowKind::ServiceSale => write!(f, "service_sale"),
            FlowKind::Expense => write!(f, "expense"),
        }
    }
}

// =============================================================================
// Transaction Kind
// =============================================================================

/// The kind tag stored on a captured transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum TransactionKind {
    SaleProduct,
    SaleService,
    Expense,
}

// =============================================================================
// Payment Status
// =============================================================================

/// Whether the customer settled a sale at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentStatus {
    /// Settled in full.
    Paid,
    /// Sold on credit; shows up as a debt owed by the customer.
    Unpaid,
}

impl PaymentStatus {
    pub fn from_paid(paid: bool) -> Self {
        if paid {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Unpaid
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_unit_type_resolution() {
        let item = rice();
        assert_eq!(item.unit_type("BULK").unwrap(), UnitType::Bulk);
        assert_eq!(item.unit_type(" 50kg bag ").unwrap(), UnitType::Bulk);
        assert_eq!(item.unit_type("Cup").unwrap(), UnitType::Retail("cup".to_string()));
    }

    #[test]
    fn test_unknown_unit() {
        let err = rice().unit_type("tin").unwrap_err();
        assert_eq!(
            err,
            CoreError::UnknownUnit {
                item: "Rice".to_string(),
                unit: "tin".to_string()
            }
        );
    }

    #[test]
    fn test_unit_types_lists_bulk_first() {
        let types = rice().unit_types();
        assert_eq!(types.len(), 3);
        assert_eq!(types[0], UnitType::Bulk);
        assert_eq!(types[2], UnitType::Retail("mudu".to_string()));
    }

    #[test]
    fn test_validate_rejects_zero_ratio() {
        let mut item = rice();
        assert!(item.validate().is_ok());

        item.retail_units[0].units_per_bulk = Decimal::ZERO;
        assert!(matches!(
            item.validate(),
            Err(CoreError::InvalidStockItem { .. })
        ));
    }

    #[test]
    fn test_below_cost_catalog_is_valid() {
        let mut item = rice();
        item.standard_bulk_price = Money::from_major(30_000);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_flow_kind_mapping() {
        assert_eq!(FlowKind::ProductSale.transaction_kind(), TransactionKind::SaleProduct);
        assert!(FlowKind::ServiceSale.is_sale());
        assert!(!FlowKind::Expense.is_sale());
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&TransactionKind::SaleProduct).unwrap();
        assert_eq!(json, "\"sale-product\"");

        let json = serde_json::to_string(&UnitType::Retail("cup".to_string())).unwrap();
        assert_eq!(json, r#"{"kind":"retail","unit":"cup"}"#);

        let json = serde_json::to_string(&UnitType::Bulk).unwrap();
        assert_eq!(json, r#"{"kind":"bulk"}"#);
    }
}
