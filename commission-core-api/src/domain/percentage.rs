use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// How incoming commission percentages are read before they are stored.
///
/// Everything persisted is a fraction in `[0, 1]`; the scale only decides how
/// user input is turned into that fraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageScale {
    /// Input must already be a fraction; `0.10` means 10%.
    #[default]
    Fraction,
    /// Values above 1 are treated as percent (`10` means 10%), values up to 1
    /// as fractions. A real 100% share must be entered as `1` or `100`.
    LegacyAuto,
}

impl PercentageScale {
    /// Normalise a raw percentage into a fraction in `[0, 1]`.
    pub fn normalize(self, value: Decimal) -> ApiResult<Decimal> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ApiError::validation(format!(
                "commission percentage {value} must not be negative"
            )));
        }
        let fraction = match self {
            PercentageScale::Fraction => value,
            PercentageScale::LegacyAuto if value > Decimal::ONE => value / Decimal::ONE_HUNDRED,
            PercentageScale::LegacyAuto => value,
        };
        if fraction > Decimal::ONE {
            return Err(ApiError::validation(format!(
                "commission percentage {value} is out of range for a fraction in [0, 1]"
            )));
        }
        Ok(fraction.normalize())
    }

    /// Parse free text (as typed into a form) and normalise it.
    pub fn parse(self, text: &str) -> ApiResult<Decimal> {
        let value = Decimal::from_str(text.trim()).map_err(|_| {
            ApiError::validation(format!("commission percentage '{text}' is not a number"))
        })?;
        self.normalize(value)
    }
}

impl fmt::Display for PercentageScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentageScale::Fraction => write!(f, "fraction"),
            PercentageScale::LegacyAuto => write!(f, "legacy_auto"),
        }
    }
}

impl FromStr for PercentageScale {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fraction" => Ok(PercentageScale::Fraction),
            "legacy_auto" | "legacy" => Ok(PercentageScale::LegacyAuto),
            other => Err(ApiError::validation(format!("unknown percentage scale '{other}'"))),
        }
    }
}

/// Render a fraction as a percent label, e.g. `0.125` -> `12.50%`.
pub fn format_percent(fraction: Decimal, decimals: u32) -> String {
    let percent = (fraction * Decimal::ONE_HUNDRED).round_dp(decimals);
    format!("{percent:.prec$}%", prec = decimals as usize)
}
