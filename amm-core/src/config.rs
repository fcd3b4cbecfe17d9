//! Tunables for pricing, submission and confirmation.

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::DEFAULT_FEE_PCT;
use crate::slippage_config::{SlippageConfig, BPS_DENOMINATOR};

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to read config file {path}: {source}")]
  Read {
    path: String,
    source: std::io::Error,
  },
  #[error("Failed to parse config file {path}: {source}")]
  Parse {
    path: String,
    source: toml::de::Error,
  },
  #[error("Invalid {field}: {value}, expected {expected}")]
  Invalid {
    field: &'static str,
    value: String,
    expected: &'static str,
  },
}

/// Swap engine configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapConfig {
  /// Pool fee in percent, applied to the input side.
  pub fee_pct: Decimal,
  /// Default slippage tolerance when a call does not override it.
  pub slippage_bps: u16,
  /// Number of signature status polls before giving up.
  pub max_retries: u32,
  /// Delay between polls in milliseconds.
  pub retry_interval_ms: u64,
  pub compute_unit_limit: u32,
  /// Priority fee in micro-lamports per compute unit.
  pub compute_unit_price: u64,
  pub skip_preflight: bool,
}

impl Default for SwapConfig {
  fn default() -> Self {
    SwapConfig {
      fee_pct: DEFAULT_FEE_PCT,
      slippage_bps: 500,
      max_retries: 20,
      retry_interval_ms: 3_000,
      compute_unit_limit: 150_000,
      compute_unit_price: 1_000_000,
      skip_preflight: true,
    }
  }
}

impl SwapConfig {
  /// Reads and validates a TOML config file.
  ///
  /// # Errors
  /// * File cannot be read or parsed
  /// * Any field fails [`SwapConfig::validate`]
  pub fn load(path: impl AsRef<Path>) -> Result<SwapConfig, ConfigError> {
    let path = path.as_ref();
    let content =
      std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
      })?;
    let config: SwapConfig =
      toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
      })?;
    config.validate()?;
    Ok(config)
  }

  /// # Errors
  /// * Fee outside `[0, 100)`
  /// * Slippage above 100%
  /// * Zero retries or zero retry interval
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.fee_pct.is_sign_negative() || self.fee_pct >= Decimal::ONE_HUNDRED
    {
      return Err(ConfigError::Invalid {
        field: "fee_pct",
        value: self.fee_pct.to_string(),
        expected: "a percentage in [0, 100)",
      });
    }
    if self.slippage_bps > BPS_DENOMINATOR {
      return Err(ConfigError::Invalid {
        field: "slippage_bps",
        value: self.slippage_bps.to_string(),
        expected: "at most 10000",
      });
    }
    if self.max_retries == 0 {
      return Err(ConfigError::Invalid {
        field: "max_retries",
        value: "0".to_string(),
        expected: "greater than 0",
      });
    }
    if self.retry_interval_ms == 0 {
      return Err(ConfigError::Invalid {
        field: "retry_interval_ms",
        value: "0".to_string(),
        expected: "greater than 0",
      });
    }
    Ok(())
  }

  #[must_use]
  pub fn retry_interval(&self) -> Duration {
    Duration::from_millis(self.retry_interval_ms)
  }

  /// Slippage for one call, falling back to the configured default.
  #[must_use]
  pub fn slippage(&self, override_bps: Option<u16>) -> SlippageConfig {
    SlippageConfig::new(override_bps.unwrap_or(self.slippage_bps))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    assert!(SwapConfig::default().validate().is_ok());
  }

  #[test]
  fn partial_toml_falls_back_to_defaults() -> Result<(), toml::de::Error> {
    let config: SwapConfig = toml::from_str("max_retries = 5\n")?;
    assert_eq!(5, config.max_retries);
    assert_eq!(DEFAULT_FEE_PCT, config.fee_pct);
    assert_eq!(Duration::from_secs(3), config.retry_interval());
    Ok(())
  }

  #[test]
  fn zero_retries_rejected() {
    let config = SwapConfig {
      max_retries: 0,
      ..SwapConfig::default()
    };
    assert!(matches!(
      config.validate(),
      Err(ConfigError::Invalid {
        field: "max_retries",
        ..
      })
    ));
  }

  #[test]
  fn call_override_wins() {
    let config = SwapConfig::default();
    assert_eq!(300, config.slippage(Some(300)).slippage_bps());
    assert_eq!(500, config.slippage(None).slippage_bps());
  }
}
