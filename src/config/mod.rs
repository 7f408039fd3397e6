use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants;
use crate::money::Currency;
use crate::pricing::{DiscountTable, PriceRule, PriceTable, PricingMode, ServiceKey};

#[cfg(test)]
mod tests;

/// Estimator configuration, read from `<config dir>/ledpro/config.toml`.
///
/// Every pricing field is optional: whatever is left out comes from the
/// built-in table for the selected mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pricing policy
    #[serde(default)]
    pub mode: PricingMode,

    /// Display currency (defaults to the mode's currency)
    pub currency: Option<Currency>,

    /// Fraction of the sale price charged for rentals
    pub rent_multiplier: Option<Decimal>,

    /// Tax rate applied after discounts
    pub tax_rate: Option<Decimal>,

    /// Base price per wall size; replaces the built-in sizes when set
    #[serde(default)]
    pub sizes: BTreeMap<String, Decimal>,

    /// Service rules keyed by service name; each entry replaces the built-in rule
    #[serde(default)]
    pub services: BTreeMap<String, PriceRule>,

    /// Discount rates by code; replaces the built-in codes when set
    pub discounts: Option<BTreeMap<String, Decimal>>,

    /// Quote request settings
    #[serde(default)]
    pub quote: QuoteSettings,

    /// Export settings
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSettings {
    #[serde(default = "default_recipient")]
    pub recipient: String,
    #[serde(default = "default_subject")]
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Directory the export is written to (defaults to the working directory)
    pub output_dir: Option<PathBuf>,
}

fn default_recipient() -> String {
    constants::quote::RECIPIENT.to_string()
}

fn default_subject() -> String {
    constants::quote::SUBJECT.to_string()
}

fn default_file_name() -> String {
    constants::export::FILE_NAME.to_string()
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            recipient: default_recipient(),
            subject: default_subject(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            output_dir: None,
        }
    }
}

impl Config {
    /// Load the user's config file, or defaults when there is none
    pub fn load() -> Result<Self> {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("ledpro").join("config.toml");
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }
        debug!("No config file found, using built-in prices");
        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Switch pricing policy, keeping any configured overrides
    pub fn with_mode(mut self, mode: PricingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build the price table: the mode's preset with configured overrides applied
    pub fn price_table(&self) -> Result<PriceTable> {
        let mut table = PriceTable::preset(self.mode);

        if let Some(currency) = self.currency {
            table.currency = currency;
        }
        if let Some(multiplier) = self.rent_multiplier {
            if multiplier < Decimal::ZERO || multiplier > Decimal::ONE {
                anyhow::bail!("rent_multiplier must be between 0 and 1, got {}", multiplier);
            }
            table.rent_multiplier = multiplier;
        }
        if let Some(tax_rate) = self.tax_rate {
            if tax_rate < Decimal::ZERO {
                anyhow::bail!("tax_rate must not be negative, got {}", tax_rate);
            }
            table.tax_rate = tax_rate;
        }

        if !self.sizes.is_empty() {
            if let Some((size, price)) = self.sizes.iter().find(|(_, p)| p.is_sign_negative()) {
                anyhow::bail!("Price for size {} must not be negative, got {}", size, price);
            }
            table.sizes = self.sizes.clone();
        }

        for (name, rule) in &self.services {
            let key: ServiceKey = name
                .parse()
                .with_context(|| format!("Invalid [services.{}] entry", name))?;
            if rule.unit_value.is_sign_negative() {
                anyhow::bail!(
                    "Price for service {} must not be negative, got {}",
                    key,
                    rule.unit_value
                );
            }
            let mut rule = rule.clone();
            if rule.label.trim().is_empty() {
                rule.label = table
                    .services
                    .get(&key)
                    .map(|builtin| builtin.label.clone())
                    .unwrap_or_else(|| key.to_string());
            }
            table.services.insert(key, rule);
        }

        Ok(table)
    }

    /// Build the discount table from the configured codes, or the built-in ones
    pub fn discount_table(&self) -> Result<DiscountTable> {
        match &self.discounts {
            Some(rates) => DiscountTable::new(rates.clone()).context("Invalid [discounts] table"),
            None => Ok(DiscountTable::standard()),
        }
    }
}
