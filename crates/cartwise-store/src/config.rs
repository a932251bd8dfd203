//! # Pricing Configuration
//!
//! Where the discount threshold and the points ratio come from.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CARTWISE_DISCOUNT_MIN_QUANTITY=10                                  │
//! │     CARTWISE_DISCOUNT_RATE_BPS=1000                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     explicit path, or the platform config dir:                         │
//! │     ~/.config/cartwise/cart.toml (Linux)                               │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     10% off at 10+ units, 1% of subtotal as points                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cart.toml
//! [discount]
//! enabled = true
//! min_quantity = 10
//! rate_bps = 1000   # 10%
//!
//! [points]
//! enabled = true
//! rate_bps = 100    # 1%
//! ```

use std::path::{Path, PathBuf};

use cartwise_core::pricing::{
    DEFAULT_DISCOUNT_MIN_QUANTITY, DEFAULT_DISCOUNT_RATE_BPS, DEFAULT_POINTS_RATE_BPS,
};
use cartwise_core::validation::validate_rate;
use cartwise_core::{PricingRules, QuantityThresholdDiscount, Rate, SubtotalRatioPoints};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "cart.toml";

// =============================================================================
// Discount Settings
// =============================================================================

/// Bulk discount settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountSettings {
    /// Turn the discount off entirely.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Units of one product needed before the discount applies.
    #[serde(default = "default_min_quantity")]
    pub min_quantity: i64,

    /// Share of the line subtotal taken off, in basis points.
    #[serde(default = "default_discount_rate")]
    pub rate_bps: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_min_quantity() -> i64 {
    DEFAULT_DISCOUNT_MIN_QUANTITY
}

fn default_discount_rate() -> u32 {
    DEFAULT_DISCOUNT_RATE_BPS
}

impl Default for DiscountSettings {
    fn default() -> Self {
        DiscountSettings {
            enabled: default_enabled(),
            min_quantity: default_min_quantity(),
            rate_bps: default_discount_rate(),
        }
    }
}

// =============================================================================
// Points Settings
// =============================================================================

/// Loyalty points settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsSettings {
    /// Turn points accrual off entirely.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Share of the line subtotal earned as points, in basis points.
    #[serde(default = "default_points_rate")]
    pub rate_bps: u32,
}

fn default_points_rate() -> u32 {
    DEFAULT_POINTS_RATE_BPS
}

impl Default for PointsSettings {
    fn default() -> Self {
        PointsSettings {
            enabled: default_enabled(),
            rate_bps: default_points_rate(),
        }
    }
}

// =============================================================================
// Pricing Config
// =============================================================================

/// Complete pricing configuration for a cart store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Bulk discount.
    #[serde(default)]
    pub discount: DiscountSettings,

    /// Loyalty points.
    #[serde(default)]
    pub points: PointsSettings,
}

impl PricingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`cart.toml`), if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading pricing config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns the default if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load pricing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Reads and parses a TOML file. Does not apply env overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses TOML text. Missing sections and keys take their defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.discount.min_quantity < 1 {
            return Err(ConfigError::Invalid(format!(
                "discount.min_quantity must be at least 1, got {}",
                self.discount.min_quantity
            )));
        }

        validate_rate("discount.rate_bps", Rate::from_bps(self.discount.rate_bps))?;
        validate_rate("points.rate_bps", Rate::from_bps(self.points.rate_bps))?;

        Ok(())
    }

    /// Builds the pricing rules this configuration describes.
    pub fn to_rules(&self) -> PricingRules {
        let mut rules = PricingRules::flat();

        if self.discount.enabled {
            rules = rules.with_discount(QuantityThresholdDiscount::new(
                self.discount.min_quantity,
                Rate::from_bps(self.discount.rate_bps),
            ));
        }

        if self.points.enabled {
            rules = rules.with_points(SubtotalRatioPoints::new(Rate::from_bps(
                self.points.rate_bps,
            )));
        }

        rules
    }

    /// Applies `CARTWISE_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides read through `lookup`; unparsable values are skipped.
    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CARTWISE_DISCOUNT_ENABLED") {
            match parse_bool(&value) {
                Some(enabled) => self.discount.enabled = enabled,
                None => warn!(value = %value, "Ignoring CARTWISE_DISCOUNT_ENABLED"),
            }
        }

        if let Some(value) = lookup("CARTWISE_DISCOUNT_MIN_QUANTITY") {
            match value.trim().parse::<i64>() {
                Ok(qty) => {
                    debug!(min_quantity = qty, "Overriding discount threshold from environment");
                    self.discount.min_quantity = qty;
                }
                Err(_) => warn!(value = %value, "Ignoring CARTWISE_DISCOUNT_MIN_QUANTITY"),
            }
        }

        if let Some(value) = lookup("CARTWISE_DISCOUNT_RATE_BPS") {
            match value.trim().parse::<u32>() {
                Ok(bps) => {
                    debug!(rate_bps = bps, "Overriding discount rate from environment");
                    self.discount.rate_bps = bps;
                }
                Err(_) => warn!(value = %value, "Ignoring CARTWISE_DISCOUNT_RATE_BPS"),
            }
        }

        if let Some(value) = lookup("CARTWISE_POINTS_ENABLED") {
            match parse_bool(&value) {
                Some(enabled) => self.points.enabled = enabled,
                None => warn!(value = %value, "Ignoring CARTWISE_POINTS_ENABLED"),
            }
        }

        if let Some(value) = lookup("CARTWISE_POINTS_RATE_BPS") {
            match value.trim().parse::<u32>() {
                Ok(bps) => {
                    debug!(rate_bps = bps, "Overriding points rate from environment");
                    self.points.rate_bps = bps;
                }
                Err(_) => warn!(value = %value, "Ignoring CARTWISE_POINTS_RATE_BPS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cartwise", "cartwise")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
