//! Runtime configuration.
//!
//! The only setting today is the tax rate applied to new invoices. It comes
//! from `WORKSHOP_TAX_RATE` (a percentage, e.g. `21`) or from a JSON document;
//! when neither provides it the Spanish general VAT rate of 21 % is used.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use workshop_core::{DomainError, TaxRate};

/// Environment variable holding the tax percentage.
pub const TAX_RATE_VAR: &str = "WORKSHOP_TAX_RATE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a number: {value:?}")]
    NotANumber { var: &'static str, value: String },

    #[error("{var} is out of range: {source}")]
    Invalid {
        var: &'static str,
        #[source]
        source: DomainError,
    },

    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the invoicing service reads the current tax rate from.
pub trait TaxRateSource: Send + Sync {
    fn tax_rate(&self) -> TaxRate;
}

impl TaxRateSource for TaxRate {
    fn tax_rate(&self) -> TaxRate {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkshopConfig {
    pub tax_rate: TaxRate,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            tax_rate: TaxRate::default(),
        }
    }
}

impl WorkshopConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = lookup(TAX_RATE_VAR) else {
            tracing::warn!("{} not set, defaulting to {}", TAX_RATE_VAR, TaxRate::default());
            return Ok(Self::default());
        };

        let percent: f64 = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber {
                var: TAX_RATE_VAR,
                value: raw.clone(),
            })?;
        let tax_rate = TaxRate::percent(percent).map_err(|source| ConfigError::Invalid {
            var: TAX_RATE_VAR,
            source,
        })?;
        Ok(Self { tax_rate })
    }

    /// Parse a JSON document such as `{"tax_rate": 10.0}`. Missing fields
    /// take their defaults.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }
}

impl TaxRateSource for WorkshopConfig {
    fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            assert_eq!(key, TAX_RATE_VAR);
            value.map(str::to_string)
        }
    }

    #[test]
    fn unset_variable_falls_back_to_21_percent() {
        let config = WorkshopConfig::from_lookup(lookup(None)).unwrap();
        assert_eq!(config.tax_rate.as_percent(), 21.0);
    }

    #[test]
    fn variable_is_read_as_a_percentage() {
        let config = WorkshopConfig::from_lookup(lookup(Some(" 10 "))).unwrap();
        assert_eq!(config.tax_rate.as_percent(), 10.0);
    }

    #[test]
    fn garbage_and_out_of_range_values_are_rejected() {
        let err = WorkshopConfig::from_lookup(lookup(Some("abc"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotANumber { .. }));

        let err = WorkshopConfig::from_lookup(lookup(Some("150"))).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn json_document_with_and_without_tax_rate() {
        let config = WorkshopConfig::from_json(r#"{"tax_rate": 4.0}"#).unwrap();
        assert_eq!(config.tax_rate.as_percent(), 4.0);

        let config = WorkshopConfig::from_json("{}").unwrap();
        assert_eq!(config, WorkshopConfig::default());

        let err = WorkshopConfig::from_json(r#"{"tax_rate": -1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
