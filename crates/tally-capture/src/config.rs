//! # Capture Configuration
//!
//! Currency display and field limits for the capture engine.
//!
//! ## Where Configuration Comes From
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App shell (owns settings storage)                                      │
//! │       │  TOML text                                                      │
//! │       ▼                                                                 │
//! │  CaptureConfig::from_toml_str ──► validate                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CaptureWizard::with_config(flow, config, sink)                         │
//! │                                                                         │
//! │  Missing sections and keys fall back to defaults:                       │
//! │     NGN / ₦, 120-char names, 100k quantity cap                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine reads no files and no environment variables; the config is a
//! plain value handed in by the host.
//!
//! ## TOML Format
//! ```toml
//! [currency]
//! code = "NGN"
//! symbol = "₦"
//! decimals = 2
//!
//! [limits]
//! max_name_length = 120
//! max_quantity = "100000"
//! max_amount = 100000000000  # minor units (kobo)
//! ```

use serde::{Deserialize, Serialize};
use tally_core::money::MINOR_PER_MAJOR;
use tally_core::{Decimal, Money};
use tracing::debug;

use crate::error::{CaptureError, CaptureResult};

// =============================================================================
// Currency Settings
// =============================================================================

/// How amounts are shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// ISO 4217 code.
    #[serde(default = "default_currency_code")]
    pub code: String,

    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    /// Digits shown after the decimal point. 2 shows kobo, 0 shows whole
    /// naira only.
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_currency_code() -> String {
    "NGN".to_string()
}

fn default_currency_symbol() -> String {
    "₦".to_string()
}

fn default_decimals() -> u8 {
    2
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            code: default_currency_code(),
            symbol: default_currency_symbol(),
            decimals: default_decimals(),
        }
    }
}

// =============================================================================
// Capture Limits
// =============================================================================

/// Upper bounds applied by the step validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureLimits {
    /// Longest accepted customer, service or expense name (characters).
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,

    /// Largest quantity accepted on a single sale line.
    #[serde(default = "default_max_quantity")]
    pub max_quantity: Decimal,

    /// Largest accepted price or expense amount.
    #[serde(default = "default_max_amount")]
    pub max_amount: Money,
}

fn default_max_name_length() -> usize {
    120
}

fn default_max_quantity() -> Decimal {
    Decimal::from(100_000)
}

fn default_max_amount() -> Money {
    Money::from_major(1_000_000_000)
}

impl Default for CaptureLimits {
    fn default() -> Self {
        CaptureLimits {
            max_name_length: default_max_name_length(),
            max_quantity: default_max_quantity(),
            max_amount: default_max_amount(),
        }
    }
}

// =============================================================================
// Capture Configuration
// =============================================================================

/// Complete capture configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub limits: CaptureLimits,
}

impl CaptureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses TOML text supplied by the host and validates it.
    ///
    /// Keys that are absent take their defaults.
    ///
    /// ## Example
    /// ```rust
    /// use tally_capture::config::CaptureConfig;
    ///
    /// let config = CaptureConfig::from_toml_str("[currency]\ncode = \"GHS\"\nsymbol = \"GH₵\"\n").unwrap();
    /// assert_eq!(config.currency.code, "GHS");
    /// assert_eq!(config.limits.max_name_length, 120);
    /// ```
    pub fn from_toml_str(contents: &str) -> CaptureResult<Self> {
        let config: CaptureConfig = toml::from_str(contents)?;
        config.validate()?;
        debug!(currency = %config.currency.code, "Capture config parsed");
        Ok(config)
    }

    /// Renders the config as TOML for the host to store.
    pub fn to_toml_string(&self) -> CaptureResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CaptureResult<()> {
        if self.currency.code.trim().is_empty() {
            return Err(CaptureError::InvalidConfig(
                "currency code must not be empty".into(),
            ));
        }

        // Money is stored in hundredths, so only these two displays are exact
        if !matches!(self.currency.decimals, 0 | 2) {
            return Err(CaptureError::InvalidConfig(format!(
                "currency decimals must be 0 or 2, got {}",
                self.currency.decimals
            )));
        }

        if self.limits.max_name_length == 0 {
            return Err(CaptureError::InvalidConfig(
                "max_name_length must be greater than 0".into(),
            ));
        }

        if self.limits.max_quantity <= Decimal::ZERO {
            return Err(CaptureError::InvalidConfig(
                "max_quantity must be greater than 0".into(),
            ));
        }

        if !self.limits.max_amount.is_positive() {
            return Err(CaptureError::InvalidConfig(
                "max_amount must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// Formats an amount for display, with thousands separators.
    ///
    /// With `decimals = 0` the amount is rounded half up to whole units.
    ///
    /// ## Example
    /// ```rust
    /// use tally_capture::config::CaptureConfig;
    /// use tally_core::Money;
    ///
    /// let config = CaptureConfig::default();
    /// assert_eq!(config.format_money(Money::from_major(35_000)), "₦35,000.00");
    /// assert_eq!(config.format_money(Money::from_minor(-40_050)), "-₦400.50");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        let minor = amount.minor().unsigned_abs();
        let per_major = MINOR_PER_MAJOR.unsigned_abs();
        let sign = if amount.is_negative() { "-" } else { "" };

        if self.currency.decimals == 0 {
            let whole = (minor + per_major / 2) / per_major;
            format!("{}{}{}", sign, self.currency.symbol, group_thousands(whole))
        } else {
            format!(
                "{}{}{}.{:02}",
                sign,
                self.currency.symbol,
                group_thousands(minor / per_major),
                minor % per_major
            )
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CaptureConfig::default();
        assert_eq!(config.currency.code, "NGN");
        assert_eq!(config.currency.symbol, "₦");
        assert_eq!(config.limits.max_name_length, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CaptureConfig::default();

        config.currency.decimals = 3;
        assert!(config.validate().is_err());

        config.currency.decimals = 0;
        assert!(config.validate().is_ok());

        config.currency.code = " ".to_string();
        assert!(config.validate().is_err());

        config.currency.code = "NGN".to_string();
        config.limits.max_quantity = Decimal::ZERO;
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_format_money() {
        let config = CaptureConfig::default();
        assert_eq!(config.format_money(Money::from_major(35_000)), "₦35,000.00");
        assert_eq!(config.format_money(Money::from_minor(1)), "₦0.01");
        assert_eq!(config.format_money(Money::zero()), "₦0.00");
        assert_eq!(config.format_money(Money::from_major(-400)), "-₦400.00");
        assert_eq!(config.format_money(Money::from_minor(123_456_789)), "₦1,234,567.89");
    }

    #[test]
    fn test_format_money_whole_units() {
        let mut config = CaptureConfig::default();
        config.currency.decimals = 0;
        assert_eq!(config.format_money(Money::from_minor(150_050)), "₦1,501");
        assert_eq!(config.format_money(Money::from_minor(150_049)), "₦1,500");
    }

    #[test]
    fn test_from_toml_str_fills_defaults() {
        let config = CaptureConfig::from_toml_str(
            "[currency]\ncode = \"GHS\"\nsymbol = \"GH₵\"\n\n[limits]\nmax_quantity = \"500\"\n",
        )
        .unwrap();
        assert_eq!(config.currency.code, "GHS");
        assert_eq!(config.currency.decimals, 2);
        assert_eq!(config.limits.max_quantity, Decimal::from(500));
        assert_eq!(config.limits.max_name_length, 120);

        assert_eq!(CaptureConfig::from_toml_str("").unwrap(), CaptureConfig::default());
    }

    #[test]
    fn test_from_toml_str_rejects_bad_input() {
        assert!(matches!(
            CaptureConfig::from_toml_str("[currency\ncode = "),
            Err(CaptureError::ConfigParseFailed(_))
        ));
        assert!(matches!(
            CaptureConfig::from_toml_str("[currency]\ndecimals = 3\n"),
            Err(CaptureError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = CaptureConfig::default();
        config.limits.max_name_length = 60;

        let contents = config.to_toml_string().unwrap();
        assert!(contents.contains("[currency]"));
        assert!(contents.contains("[limits]"));
        assert_eq!(CaptureConfig::from_toml_str(&contents).unwrap(), config);
    }
}
