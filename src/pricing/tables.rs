//! Price and discount tables
//!
//! Tables are immutable values built once at startup (from the built-in
//! presets or from configuration) and handed to the calculator.

use anyhow::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::constants::{discount, pricing};
use crate::money::{round_whole, Currency};

/// Optional add-on services, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKey {
    Consultation,
    Design,
    Hardware,
    Installation,
    Controller,
}

impl ServiceKey {
    pub const ALL: [ServiceKey; 5] = [
        ServiceKey::Consultation,
        ServiceKey::Design,
        ServiceKey::Hardware,
        ServiceKey::Installation,
        ServiceKey::Controller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKey::Consultation => "consultation",
            ServiceKey::Design => "design",
            ServiceKey::Hardware => "hardware",
            ServiceKey::Installation => "installation",
            ServiceKey::Controller => "controller",
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        ServiceKey::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown service: {}", s.trim()))
    }
}

/// Which of the two pricing policies a table follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingMode {
    /// Flat base price per wall size, multiplied by quantity
    #[default]
    SizeTiered,
    /// No base price; services scale with meters and controller count
    LengthBased,
}

impl PricingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingMode::SizeTiered => "size-tiered",
            PricingMode::LengthBased => "length-based",
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "size" | "size-tiered" => Ok(PricingMode::SizeTiered),
            "length" | "length-based" => Ok(PricingMode::LengthBased),
            other => anyhow::bail!(
                "Unknown pricing mode: {} (expected size-tiered or length-based)",
                other
            ),
        }
    }
}

/// How a service price scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Fixed price regardless of size
    Flat,
    /// Price per meter of wall
    PerUnit,
    /// Price per counted item (controllers)
    PerItem,
}

/// Pricing rule for one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRule {
    pub kind: RuleKind,
    #[serde(rename = "value")]
    pub unit_value: Decimal,
    /// Display label; empty means "keep the built-in label"
    #[serde(default)]
    pub label: String,
}

impl PriceRule {
    pub fn new(kind: RuleKind, unit_value: Decimal, label: impl Into<String>) -> Self {
        Self {
            kind,
            unit_value,
            label: label.into(),
        }
    }

    pub fn flat(unit_value: Decimal, label: impl Into<String>) -> Self {
        Self::new(RuleKind::Flat, unit_value, label)
    }

    pub fn per_unit(unit_value: Decimal, label: impl Into<String>) -> Self {
        Self::new(RuleKind::PerUnit, unit_value, label)
    }

    pub fn per_item(unit_value: Decimal, label: impl Into<String>) -> Self {
        Self::new(RuleKind::PerItem, unit_value, label)
    }
}

/// Sale or rental
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transaction {
    #[default]
    Sale,
    Rent,
}

impl Transaction {
    /// Anything other than "rent" is a sale.
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("rent") {
            Transaction::Rent
        } else {
            Transaction::Sale
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transaction::Sale => "sale",
            Transaction::Rent => "rent",
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prices for one pricing policy
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    pub mode: PricingMode,
    pub currency: Currency,
    pub rent_multiplier: Decimal,
    pub tax_rate: Decimal,
    /// Base price per wall size (size-tiered mode only)
    pub sizes: BTreeMap<String, Decimal>,
    pub services: BTreeMap<ServiceKey, PriceRule>,
}

impl PriceTable {
    /// Built-in table for the given mode
    pub fn preset(mode: PricingMode) -> Self {
        match mode {
            PricingMode::SizeTiered => Self::size_tiered(),
            PricingMode::LengthBased => Self::length_based(),
        }
    }

    /// Size-tiered wall pricing in pesos
    pub fn size_tiered() -> Self {
        let sizes = [
            ("6x9", dec!(12000)),
            ("9x12", dec!(14000)),
            ("9x18", dec!(16000)),
            ("9x24", dec!(18000)),
        ]
        .into_iter()
        .map(|(size, price)| (size.to_string(), price))
        .collect();

        let services = BTreeMap::from([
            (
                ServiceKey::Consultation,
                PriceRule::flat(dec!(2500), "Consultation (flat)"),
            ),
            (ServiceKey::Design, PriceRule::flat(dec!(1500), "Design (flat)")),
            (
                ServiceKey::Hardware,
                PriceRule::flat(dec!(2000), "Hardware / accessories"),
            ),
            (
                ServiceKey::Installation,
                PriceRule::flat(dec!(3000), "Installation (flat)"),
            ),
            (
                ServiceKey::Controller,
                PriceRule::per_item(dec!(2000), "Controller setup"),
            ),
        ]);

        Self {
            mode: PricingMode::SizeTiered,
            currency: Currency::Php,
            rent_multiplier: pricing::RENT_MULTIPLIER,
            tax_rate: pricing::TAX_RATE,
            sizes,
            services,
        }
    }

    /// Per-meter wall pricing in dollars
    pub fn length_based() -> Self {
        let services = BTreeMap::from([
            (
                ServiceKey::Consultation,
                PriceRule::flat(dec!(150), "Consultation (flat)"),
            ),
            (ServiceKey::Design, PriceRule::per_unit(dec!(30), "Design")),
            (
                ServiceKey::Hardware,
                PriceRule::per_unit(dec!(120), "LED hardware"),
            ),
            (
                ServiceKey::Installation,
                PriceRule::per_unit(dec!(45), "Installation"),
            ),
            (
                ServiceKey::Controller,
                PriceRule::per_item(dec!(40), "Controller"),
            ),
        ]);

        Self {
            mode: PricingMode::LengthBased,
            currency: Currency::Usd,
            rent_multiplier: pricing::RENT_MULTIPLIER,
            tax_rate: pricing::TAX_RATE,
            sizes: BTreeMap::new(),
            services,
        }
    }

    /// Base price of a wall size, adjusted for rentals. Unknown sizes cost 0.
    pub fn base_price(&self, size: &str, transaction: Transaction) -> Decimal {
        let base = self.sizes.get(size).copied().unwrap_or(Decimal::ZERO);
        match transaction {
            Transaction::Sale => base,
            Transaction::Rent => round_whole(base.saturating_mul(self.rent_multiplier)),
        }
    }

    /// Rules for the selected services, in declaration order
    pub fn selected<'a>(
        &'a self,
        services: &'a BTreeSet<ServiceKey>,
    ) -> impl Iterator<Item = (ServiceKey, &'a PriceRule)> + 'a {
        services
            .iter()
            .filter_map(move |key| self.services.get(key).map(|rule| (*key, rule)))
    }

    /// First size in the table, used when no size was chosen
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.keys().next().map(String::as_str)
    }
}

/// Trim and uppercase a discount code
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Discount rates by code
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiscountTable {
    rates: BTreeMap<String, Decimal>,
}

impl DiscountTable {
    /// Build a table, normalizing codes. Rates must lie in [0, 1).
    pub fn new(rates: impl IntoIterator<Item = (String, Decimal)>) -> Result<Self> {
        let mut table = BTreeMap::new();
        for (code, rate) in rates {
            let code = normalize_code(&code);
            if code.is_empty() {
                anyhow::bail!("Discount code must not be empty");
            }
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                anyhow::bail!(
                    "Discount rate for {} must be at least 0 and below 1, got {}",
                    code,
                    rate
                );
            }
            table.insert(code, rate);
        }
        Ok(Self { rates: table })
    }

    /// Codes shipped with the default configuration
    pub fn standard() -> Self {
        Self {
            rates: BTreeMap::from([
                (discount::WELCOME10.to_string(), dec!(0.10)),
                (discount::PROCLIENT5.to_string(), dec!(0.05)),
            ]),
        }
    }

    /// Rate for a code as typed; unknown codes yield 0
    pub fn rate_for(&self, code: &str) -> Decimal {
        self.rates
            .get(&normalize_code(code))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
