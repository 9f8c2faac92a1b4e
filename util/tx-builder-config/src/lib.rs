//! Transaction builder configurations.
//!
//! Defaults used when completing fees, usually loaded from the `[tx_builder]` table of an
//! application config file.

use ckb_error::{impl_error_conversion_with_kind, prelude::*, ErrorKind};
use ckb_types::core::FeeRate;
use serde::{Deserialize, Serialize};

/// Default bound on fee completion rounds.
pub const DEFAULT_MAX_FEE_ITERATIONS: usize = 64;

/// Errors raised while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML text is malformed or has unexpected fields.
    #[error("Invalid tx builder config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl_error_conversion_with_kind!(ConfigError, ErrorKind::Config, ckb_error::Error);

/// Fee completion defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fixed fee rate. When `None` the rate is asked from the fee rate provider.
    pub fee_rate: Option<FeeRate>,
    /// Block window the provider computes its fee rate over.
    pub fee_rate_block_range: Option<u64>,
    /// Upper bound applied to the provider's fee rate.
    pub max_fee_rate: Option<FeeRate>,
    /// Collect more inputs to pay the fee and the change cell.
    pub should_add_inputs: bool,
    /// Rounds of fee completion before giving up.
    pub max_fee_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fee_rate: None,
            fee_rate_block_range: None,
            max_fee_rate: None,
            should_add_inputs: true,
            max_fee_iterations: DEFAULT_MAX_FEE_ITERATIONS,
        }
    }
}

impl Config {
    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn partial_document() {
        let config = Config::from_toml_str(
            r#"
            fee_rate = 1500
            should_add_inputs = false
            "#,
        )
        .unwrap();
        assert_eq!(config.fee_rate, Some(FeeRate::from_u64(1500)));
        assert!(!config.should_add_inputs);
        assert_eq!(config.max_fee_iterations, DEFAULT_MAX_FEE_ITERATIONS);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("fee = 1").unwrap_err();
        assert!(err.to_string().starts_with("Invalid tx builder config"));
        let err: ckb_error::Error = err.into();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
