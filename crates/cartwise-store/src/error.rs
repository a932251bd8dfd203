//! # Store Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Error Categories                             │
//! │                                                                         │
//! │  ┌──────────────────────────┐     ┌──────────────────────────────┐     │
//! │  │  Configuration           │     │  Context                     │     │
//! │  │                          │     │                              │     │
//! │  │  Io        (read file)   │     │  NotProvided                 │     │
//! │  │  Parse     (TOML)        │     │  (store accessed before the  │     │
//! │  │  Invalid   (values)      │     │   host provided one)         │     │
//! │  │  Validation              │     │                              │     │
//! │  └──────────────────────────┘     └──────────────────────────────┘     │
//! │                                                                         │
//! │  Cart operations themselves never fail.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cartwise_core::ValidationError;
use thiserror::Error;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for context lookups.
pub type ContextResult<T> = Result<T, ContextError>;

/// Failures while loading or validating pricing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for `PricingConfig`.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is syntactically fine but unusable.
    #[error("Invalid pricing configuration: {0}")]
    Invalid(String),

    /// A rate or quantity failed a core validation rule.
    #[error("Invalid pricing configuration: {0}")]
    Validation(#[from] ValidationError),
}

/// Failures while looking up the cart through a [`crate::CartContext`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The host never provided a store to this context.
    #[error("{accessor} must be used within a context that has a CartStore provided")]
    NotProvided { accessor: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_error_names_accessor() {
        let err = ContextError::NotProvided {
            accessor: "cart actions",
        };
        assert_eq!(
            err.to_string(),
            "cart actions must be used within a context that has a CartStore provided"
        );
    }

    #[test]
    fn test_validation_converts_to_config_error() {
        let err: ConfigError = ValidationError::MustBePositive {
            field: "discount.min_quantity".to_string(),
        }
        .into();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
