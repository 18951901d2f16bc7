//! # Configuration State
//!
//! Checkout settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`VFARMA_*`)
//! 2. Config file (`checkout.toml`)
//! 3. Defaults (this file)
//!
//! ## Config File Lookup
//! ```text
//! explicit path ──► $VFARMA_CONFIG ──► <platform config dir>/checkout.toml
//!   (must exist)      (must exist)        (optional, defaults if absent)
//! ```
//!
//! ## Example `checkout.toml`
//! ```toml
//! coupon_delay_ms = 1500
//! currency_symbol = "R$"
//! currency_decimals = 2
//!
//! [[coupons]]
//! code = "VFARMA10"
//! rate_bps = 1000
//!
//! [[coupons]]
//! code = "NEYMAR20"
//! rate_bps = 2000
//! target_id = "4"
//! ```
//!
//! Configuration is read-only after loading, so no mutex is needed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use vfarma_core::{CoreError, Coupon, Money, StaticCouponTable};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "VFARMA_CONFIG";
/// Overrides `coupon_delay_ms`.
pub const COUPON_DELAY_ENV: &str = "VFARMA_COUPON_DELAY_MS";
/// Overrides `currency_symbol`.
pub const CURRENCY_SYMBOL_ENV: &str = "VFARMA_CURRENCY_SYMBOL";

const CONFIG_FILE_NAME: &str = "checkout.toml";
const MAX_CURRENCY_DECIMALS: u8 = 4;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<CoreError> for ConfigError {
    fn from(err: CoreError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// Checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Simulated coupon lookup latency. Zero answers immediately.
    pub coupon_delay_ms: u64,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Replaces the built-in coupon table when non-empty.
    pub coupons: Vec<Coupon>,
}

impl Default for CheckoutConfig {
    /// Brazilian storefront defaults with the built-in coupon table.
    fn default() -> Self {
        CheckoutConfig {
            coupon_delay_ms: 1500,
            currency_symbol: "R$".to_string(),
            currency_decimals: 2,
            coupons: Vec::new(),
        }
    }
}

impl CheckoutConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Loads defaults, then the config file, then environment overrides.
    ///
    /// ## Errors
    /// - an explicit or `$VFARMA_CONFIG` path that cannot be read
    /// - a file that is not valid TOML for this struct
    /// - an unparsable `VFARMA_COUPON_DELAY_MS`
    /// - a coupon list that fails validation
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::read_file(&path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::read_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    CheckoutConfig::default()
                }
            },
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`CheckoutConfig::load`], but logs the failure and falls back to
    /// defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Falling back to default configuration");
                CheckoutConfig::default()
            }
        }
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        info!(?path, "Loaded config file");
        Self::from_toml_str(&source)
    }

    /// Applies `VFARMA_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Applies overrides from any variable source.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup(COUPON_DELAY_ENV) {
            self.coupon_delay_ms =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnv {
                        var: COUPON_DELAY_ENV.to_string(),
                        value,
                    })?;
        }

        if let Some(symbol) = lookup(CURRENCY_SYMBOL_ENV) {
            self.currency_symbol = symbol;
        }

        Ok(())
    }

    /// Checks the coupon list and display settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency_decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "currency_decimals must be at most {}",
                MAX_CURRENCY_DECIMALS
            )));
        }

        self.coupon_table().map(|_| ())
    }

    /// The configured coupon table, or the built-in one when none is set.
    pub fn coupon_table(&self) -> Result<StaticCouponTable, ConfigError> {
        if self.coupons.is_empty() {
            return Ok(StaticCouponTable::builtin());
        }

        Ok(StaticCouponTable::new(self.coupons.clone())?)
    }

    pub fn coupon_delay(&self) -> Duration {
        Duration::from_millis(self.coupon_delay_ms)
    }

    /// Formats an amount with the configured symbol and decimals.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = CheckoutConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "R$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

/// Platform config file location.
///
/// - **Linux**: `~/.config/checkout/checkout.toml`
/// - **macOS**: `~/Library/Application Support/br.vfarma.checkout/checkout.toml`
/// - **Windows**: `%APPDATA%\vfarma\checkout\config\checkout.toml`
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("br", "vfarma", "checkout").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
