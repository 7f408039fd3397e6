//! Estimate calculation
//!
//! `compute` turns a normalized [`EstimateInput`] into an ordered list of
//! line items and a total. It is pure: the tables are passed in and nothing
//! outside the returned value is touched.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::money::{format_percent, format_quantity, Currency};

mod input;
mod tables;


pub use input::{EstimateInput, RawInput};
pub use tables::{
    normalize_code, DiscountTable, PriceRule, PriceTable, PricingMode, RuleKind, ServiceKey,
    Transaction,
};

/// One row of the breakdown. Discounts carry a negative amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Normalized inputs echoed back with an estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSummary {
    pub mode: PricingMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub transaction: Transaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub meters: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controllers: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub complexity: Option<Decimal>,
    pub services: Vec<ServiceKey>,
    pub discount_code: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
}

/// Breakdown, total and the inputs that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateResult {
    pub lines: Vec<LineItem>,
    pub total: Decimal,
    pub currency: Currency,
    pub summary: InputSummary,
}

/// Price an estimate.
///
/// Size-tiered tables start from the size's base price times the wall
/// count; length-based tables start from zero and scale services with the
/// wall length. Selected services follow in declaration order, then the
/// complexity surcharge (length-based only), the discount and finally tax.
pub fn compute(
    input: &EstimateInput,
    prices: &PriceTable,
    discounts: &DiscountTable,
) -> EstimateResult {
    let currency = prices.currency;
    let mut lines = Vec::new();

    match prices.mode {
        PricingMode::SizeTiered => {
            let quantity = input.quantity.max(1);
            let count = Decimal::from(quantity);
            let base = prices.base_price(&input.size, input.transaction);
            lines.push(LineItem::new(
                format!("Base price ({}) x {}", input.size, quantity),
                base.saturating_mul(count),
            ));

            for (_, rule) in prices.selected(&input.services) {
                lines.push(match rule.kind {
                    RuleKind::Flat => LineItem::new(rule.label.clone(), rule.unit_value),
                    // One controller per wall when sizes drive the price
                    RuleKind::PerItem | RuleKind::PerUnit => LineItem::new(
                        format!(
                            "{} ({} x {})",
                            rule.label,
                            quantity,
                            currency.format(rule.unit_value)
                        ),
                        rule.unit_value.saturating_mul(count),
                    ),
                });
            }
        }
        PricingMode::LengthBased => {
            let meters = input.meters.max(Decimal::ZERO);
            let controllers = Decimal::from(input.controllers);

            for (_, rule) in prices.selected(&input.services) {
                lines.push(match rule.kind {
                    RuleKind::Flat => LineItem::new(rule.label.clone(), rule.unit_value),
                    RuleKind::PerUnit => LineItem::new(
                        format!(
                            "{} ({} m x {}/m)",
                            rule.label,
                            format_quantity(meters),
                            currency.format(rule.unit_value)
                        ),
                        rule.unit_value.saturating_mul(meters),
                    ),
                    RuleKind::PerItem => LineItem::new(
                        format!(
                            "{} ({} x {})",
                            rule.label,
                            input.controllers,
                            currency.format(rule.unit_value)
                        ),
                        rule.unit_value.saturating_mul(controllers),
                    ),
                });
            }
        }
    }

    // Amounts saturate at Decimal::MAX so oversized inputs still price
    let mut subtotal = lines
        .iter()
        .fold(Decimal::ZERO, |sum, line| sum.saturating_add(line.amount));

    if prices.mode == PricingMode::LengthBased && input.complexity > Decimal::ONE {
        let extra = subtotal.saturating_mul(input.complexity - Decimal::ONE);
        if extra > Decimal::ZERO {
            lines.push(LineItem::new(
                format!(
                    "Complexity adjustment (x{})",
                    format_quantity(input.complexity)
                ),
                extra,
            ));
            subtotal = subtotal.saturating_add(extra);
        }
    }

    let rate = discounts.rate_for(&input.discount_code);
    let mut total = subtotal;
    if rate > Decimal::ZERO {
        let discount = subtotal.saturating_mul(rate);
        lines.push(LineItem::new(
            format!("Discount ({}%)", format_percent(rate)),
            -discount,
        ));
        total = total.saturating_sub(discount);
    }

    if prices.tax_rate > Decimal::ZERO {
        let tax = total.saturating_mul(prices.tax_rate);
        lines.push(LineItem::new(
            format!("Tax ({}%)", format_percent(prices.tax_rate)),
            tax,
        ));
        total = total.saturating_add(tax);
    }

    EstimateResult {
        lines,
        total,
        currency,
        summary: summarize(input, prices.mode, rate),
    }
}

fn summarize(input: &EstimateInput, mode: PricingMode, rate: Decimal) -> InputSummary {
    let size_tiered = mode == PricingMode::SizeTiered;
    InputSummary {
        mode,
        size: size_tiered.then(|| input.size.clone()),
        transaction: input.transaction,
        quantity: size_tiered.then(|| input.quantity.max(1)),
        meters: (!size_tiered).then(|| input.meters.max(Decimal::ZERO)),
        controllers: (!size_tiered).then_some(input.controllers),
        complexity: (!size_tiered).then_some(input.complexity),
        services: input.services.iter().copied().collect(),
        discount_code: (!input.discount_code.is_empty()).then(|| input.discount_code.clone()),
        discount_percent: rate,
    }
}
