use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

use super::tables::{normalize_code, ServiceKey, Transaction};
use crate::constants::pricing;

/// Estimate fields exactly as the user typed them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    pub size: Option<String>,
    pub transaction: Option<String>,
    pub quantity: Option<String>,
    pub meters: Option<String>,
    pub controllers: Option<String>,
    pub complexity: Option<String>,
    pub discount: Option<String>,
    pub services: Vec<String>,
}

/// Normalized estimate fields
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateInput {
    pub size: String,
    pub transaction: Transaction,
    /// Wall count, at least 1
    pub quantity: u32,
    /// Wall length, never negative
    pub meters: Decimal,
    pub controllers: u32,
    pub services: BTreeSet<ServiceKey>,
    /// Site difficulty multiplier, at least 1
    pub complexity: Decimal,
    /// Trimmed and uppercased; empty when no code was entered
    pub discount_code: String,
}

impl Default for EstimateInput {
    fn default() -> Self {
        Self {
            size: String::new(),
            transaction: Transaction::Sale,
            quantity: pricing::MIN_QUANTITY,
            meters: Decimal::ZERO,
            controllers: 0,
            services: BTreeSet::new(),
            complexity: pricing::MIN_COMPLEXITY,
            discount_code: String::new(),
        }
    }
}

impl EstimateInput {
    /// Normalize raw form values. Never fails: malformed or negative
    /// numbers fall back to their floor and unknown services are dropped.
    pub fn from_raw(raw: &RawInput) -> Self {
        let services = raw
            .services
            .iter()
            .flat_map(|entry| entry.split(','))
            .filter(|name| !name.trim().is_empty())
            .filter_map(|name| match ServiceKey::from_str(name) {
                Ok(key) => Some(key),
                Err(e) => {
                    debug!("Ignoring service: {}", e);
                    None
                }
            })
            .collect();

        Self {
            size: raw.size.as_deref().map(str::trim).unwrap_or_default().to_string(),
            transaction: raw
                .transaction
                .as_deref()
                .map(Transaction::parse_lenient)
                .unwrap_or_default(),
            quantity: parse_count(raw.quantity.as_deref(), pricing::MIN_QUANTITY),
            meters: parse_amount(raw.meters.as_deref(), Decimal::ZERO),
            controllers: parse_count(raw.controllers.as_deref(), 0),
            services,
            complexity: parse_amount(raw.complexity.as_deref(), pricing::MIN_COMPLEXITY),
            discount_code: raw.discount.as_deref().map(normalize_code).unwrap_or_default(),
        }
    }

    pub fn with_service(mut self, key: ServiceKey) -> Self {
        self.services.insert(key);
        self
    }
}

/// Whole count clamped to `floor`; fractions are truncated and counts
/// beyond `u32::MAX` saturate
pub(crate) fn parse_count(text: Option<&str>, floor: u32) -> u32 {
    match text.and_then(leading_number).map(|n| n.trunc()) {
        Some(n) if n.is_sign_positive() => n.to_u32().unwrap_or(u32::MAX).max(floor),
        _ => floor,
    }
}

/// Decimal clamped to `floor`
pub(crate) fn parse_amount(text: Option<&str>, floor: Decimal) -> Decimal {
    text.and_then(leading_number)
        .map_or(floor, |n| n.max(floor))
}

/// Parse the numeric prefix of a form value, ignoring trailing text
/// (`"3 walls"` reads as 3). Returns None when there is no digit; numbers
/// too large for a Decimal saturate to its bounds.
pub(crate) fn leading_number(text: &str) -> Option<Decimal> {
    let mut number = String::new();
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in text.trim().chars().enumerate() {
        match c {
            '-' if i == 0 => number.push(c),
            '+' if i == 0 => {}
            '0'..='9' => {
                seen_digit = true;
                number.push(c);
            }
            '.' if !seen_dot => {
                seen_dot = true;
                if !seen_digit {
                    number.push('0');
                }
                number.push(c);
            }
            _ => break,
        }
    }

    if !seen_digit {
        return None;
    }
    if number.ends_with('.') {
        number.pop();
    }
    match Decimal::from_str(&number) {
        Ok(value) => Some(value),
        Err(_) if number.starts_with('-') => Some(Decimal::MIN),
        Err(_) => Some(Decimal::MAX),
    }
}
