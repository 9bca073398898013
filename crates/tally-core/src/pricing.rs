//! # Price Deviation
//!
//! Compares the price the user typed against the catalog's standard price
//! for the selected unit.
//!
//! ```text
//! entered ₦150 vs standard ₦200  ──►  { status: below,    delta: ₦50 }
//! entered ₦200 vs standard ₦200  ──►  { status: standard, delta: ₦0  }
//! entered ₦250 vs standard ₦200  ──►  { status: above,    delta: ₦50 }
//! ```
//!
//! Amounts are integer minor units, so "standard" is exact equality with no
//! tolerance band.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use ts_rs::TS;

use crate::money::Money;

/// Where an entered price sits relative to the standard price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DeviationStatus {
    Below,
    Standard,
    Above,
}

/// Result of [`classify`]: the direction and the unsigned size of the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceDeviation {
    pub status: DeviationStatus,

    /// `|entered - standard|`; the sign lives in `status`.
    pub delta: Money,
}

impl PriceDeviation {
    /// The signed difference `entered - standard`.
    pub fn signed_delta(&self) -> Money {
        match self.status {
            DeviationStatus::Below => -self.delta,
            DeviationStatus::Standard | DeviationStatus::Above => self.delta,
        }
    }

    pub fn is_standard(&self) -> bool {
        self.status == DeviationStatus::Standard
    }
}

/// Classifies `entered` against `standard`.
///
/// Total over all inputs; never fails.
///
/// ## Example
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::pricing::{classify, DeviationStatus};
///
/// let d = classify(Money::from_major(150), Money::from_major(200));
/// assert_eq!(d.status, DeviationStatus::Below);
/// assert_eq!(d.delta, Money::from_major(50));
/// ```
pub fn classify(entered: Money, standard: Money) -> PriceDeviation {
    let status = match entered.cmp(&standard) {
        Ordering::Less => DeviationStatus::Below,
        Ordering::Equal => DeviationStatus::Standard,
        Ordering::Greater => DeviationStatus::Above,
    };

    PriceDeviation {
        status,
        delta: (entered - standard).abs(),
    }
}
