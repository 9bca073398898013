//! # Flow Router
//!
//! Maps the top-level "money in / money out" choice to a capture flow.
//!
//! ```text
//! "out" ───────────────────────────────► Expense
//! "in"  ──► "service" ─────────────────► ServiceSale
//!       └─► "product" ──► ItemSelector ─► ProductSale { item }
//!                          (catalog browser)
//! ```
//!
//! Routing is a pure decision. The router keeps nothing between calls; the
//! only collaborator is the item selector, consulted for product sales.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tally_core::{FlowKind, StockItem, ValidationError};
use tracing::{debug, info};

use crate::error::{CaptureError, CaptureResult};

// =============================================================================
// Choices
// =============================================================================

/// Which way the money moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    MoneyIn,
    MoneyOut,
}

impl FromStr for Direction {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "money_in" | "sale" => Ok(Direction::MoneyIn),
            "out" | "money_out" | "expense" => Ok(Direction::MoneyOut),
            _ => Err(CaptureError::UnknownChoice {
                what: "direction".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::MoneyIn => write!(f, "in"),
            Direction::MoneyOut => write!(f, "out"),
        }
    }
}

/// What is being sold when money comes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleKind {
    Product,
    Service,
}

impl FromStr for SaleKind {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "product" => Ok(SaleKind::Product),
            "service" => Ok(SaleKind::Service),
            _ => Err(CaptureError::UnknownChoice {
                what: "sale kind".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// The user's answer to the flow-selection screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowChoice {
    pub direction: Direction,
    /// Only meaningful for `MoneyIn`.
    pub sale_kind: Option<SaleKind>,
}

impl FlowChoice {
    pub fn money_out() -> Self {
        FlowChoice {
            direction: Direction::MoneyOut,
            sale_kind: None,
        }
    }

    pub fn money_in(sale_kind: SaleKind) -> Self {
        FlowChoice {
            direction: Direction::MoneyIn,
            sale_kind: Some(sale_kind),
        }
    }

    /// Parses the raw strings sent by the selection screens.
    ///
    /// ## Example
    /// ```rust
    /// use tally_capture::router::{FlowChoice, route};
    /// use tally_core::FlowKind;
    ///
    /// let choice = FlowChoice::parse("in", Some("service")).unwrap();
    /// assert_eq!(route(&choice).unwrap(), FlowKind::ServiceSale);
    /// ```
    pub fn parse(direction: &str, sale_kind: Option<&str>) -> CaptureResult<Self> {
        let direction: Direction = direction.parse()?;
        let sale_kind = match (direction, sale_kind) {
            (Direction::MoneyIn, Some(raw)) => Some(raw.parse::<SaleKind>()?),
            _ => None,
        };
        Ok(FlowChoice {
            direction,
            sale_kind,
        })
    }
}

/// Resolves a choice to its flow kind.
///
/// ## Errors
/// `Validation(Required)` when money comes in but no sale kind was chosen.
pub fn route(choice: &FlowChoice) -> CaptureResult<FlowKind> {
    match (choice.direction, choice.sale_kind) {
        (Direction::MoneyOut, _) => Ok(FlowKind::Expense),
        (Direction::MoneyIn, Some(SaleKind::Product)) => Ok(FlowKind::ProductSale),
        (Direction::MoneyIn, Some(SaleKind::Service)) => Ok(FlowKind::ServiceSale),
        (Direction::MoneyIn, None) => Err(ValidationError::Required {
            field: "sale kind".to_string(),
        }
        .into()),
    }
}

// =============================================================================
// Capture Flow
// =============================================================================

/// A routed flow, ready to back a wizard.
///
/// A product sale always carries the stock item it sells; the unit,
/// quantity and price steps read from it. The item is checked both by
/// [`CaptureFlow::product_sale`] and again when a wizard opens on the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureFlow {
    ProductSale { item: StockItem },
    ServiceSale,
    Expense,
}

impl CaptureFlow {
    /// A product-sale flow for `item`, after checking its catalog data.
    pub fn product_sale(item: StockItem) -> CaptureResult<Self> {
        item.validate()?;
        Ok(CaptureFlow::ProductSale { item })
    }

    pub fn kind(&self) -> FlowKind {
        match self {
            CaptureFlow::ProductSale { .. } => FlowKind::ProductSale,
            CaptureFlow::ServiceSale => FlowKind::ServiceSale,
            CaptureFlow::Expense => FlowKind::Expense,
        }
    }

    /// The stock item being sold, for product sales.
    pub fn item(&self) -> Option<&StockItem> {
        match self {
            CaptureFlow::ProductSale { item } => Some(item),
            _ => None,
        }
    }
}

// =============================================================================
// Flow Router
// =============================================================================

/// The catalog browser. Yields the chosen item, or `None` if the user backed
/// out of the catalog.
pub trait ItemSelector {
    fn select_item(&mut self) -> Option<StockItem>;
}

impl<F> ItemSelector for F
where
    F: FnMut() -> Option<StockItem>,
{
    fn select_item(&mut self) -> Option<StockItem> {
        self()
    }
}

/// Stateless entry point that turns a choice into a [`CaptureFlow`].
pub struct FlowRouter;

impl FlowRouter {
    /// Routes `choice`; for product sales, asks `selector` for the item.
    ///
    /// The selector is only consulted on the product path.
    ///
    /// ## Errors
    /// - `ItemRequired` if the selector yields nothing
    /// - `Core(InvalidStockItem)` if the item breaks a catalog invariant
    pub fn start<I: ItemSelector + ?Sized>(
        choice: &FlowChoice,
        selector: &mut I,
    ) -> CaptureResult<CaptureFlow> {
        let kind = route(choice)?;
        debug!(direction = %choice.direction, flow = %kind, "Flow routed");

        let flow = match kind {
            FlowKind::Expense => CaptureFlow::Expense,
            FlowKind::ServiceSale => CaptureFlow::ServiceSale,
            FlowKind::ProductSale => {
                let item = selector.select_item().ok_or(CaptureError::ItemRequired)?;
                CaptureFlow::product_sale(item)?
            }
        };

        info!(
            flow = %flow.kind(),
            item = flow.item().map(|i| i.id.as_str()).unwrap_or("-"),
            "Capture flow started"
        );
        Ok(flow)
    }
}
