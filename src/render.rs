//! Plain-text rendering of estimates and price tables

use crate::money::format_percent;
use crate::pricing::{DiscountTable, EstimateResult, PriceTable, RuleKind};

/// Breakdown with one row per line item followed by the total
pub fn render_estimate(result: &EstimateResult) -> String {
    let rows: Vec<(&str, String)> = result
        .lines
        .iter()
        .map(|line| (line.label.as_str(), result.currency.format(line.amount)))
        .collect();
    let total = result.currency.format(result.total);

    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .fold("Total".len(), usize::max);
    let amount_width = rows
        .iter()
        .map(|(_, amount)| amount.chars().count())
        .fold(total.chars().count(), usize::max);

    let mut out = String::new();
    for (label, amount) in &rows {
        out.push_str(&format!("{label:<label_width$}  {amount:>amount_width$}\n"));
    }
    out.push_str(&"-".repeat(label_width + 2 + amount_width));
    out.push('\n');
    out.push_str(&format!("{:<label_width$}  {total:>amount_width$}\n", "Total"));
    out
}

/// Listing of the active sizes, services and discount codes
pub fn render_tables(prices: &PriceTable, discounts: &DiscountTable) -> String {
    let currency = prices.currency;
    let mut out = format!("Pricing mode: {} ({})\n", prices.mode, currency);

    if !prices.sizes.is_empty() {
        out.push_str("\nSizes:\n");
        for (size, price) in &prices.sizes {
            out.push_str(&format!("  {:<14}{}\n", size, currency.format(*price)));
        }
        out.push_str(&format!(
            "  Rentals are charged {}% of the sale price\n",
            format_percent(prices.rent_multiplier)
        ));
    }

    out.push_str("\nServices:\n");
    for (key, rule) in &prices.services {
        let price = match rule.kind {
            RuleKind::Flat => currency.format(rule.unit_value),
            RuleKind::PerUnit => format!("{}/m", currency.format(rule.unit_value)),
            RuleKind::PerItem => format!("{} each", currency.format(rule.unit_value)),
        };
        out.push_str(&format!("  {:<14}{:<26}{}\n", key.as_str(), rule.label, price));
    }

    if !discounts.is_empty() {
        out.push_str("\nDiscount codes:\n");
        for (code, rate) in discounts.iter() {
            out.push_str(&format!("  {:<14}{}%\n", code, format_percent(rate)));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{compute, EstimateInput, ServiceKey};

    #[test]
    fn test_render_estimate() {
        let input = EstimateInput {
            size: "9x12".to_string(),
            quantity: 2,
            ..EstimateInput::default()
        }
        .with_service(ServiceKey::Installation);
        let result = compute(&input, &PriceTable::size_tiered(), &DiscountTable::standard());

        let rendered = render_estimate(&result);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Base price (9x12) x 2  ₱28,000.00",
                "Installation (flat)     ₱3,000.00",
                "---------------------------------",
                "Total                  ₱31,000.00",
            ]
        );
    }

    #[test]
    fn test_render_empty_estimate_shows_total() {
        let result = compute(
            &EstimateInput::default(),
            &PriceTable::length_based(),
            &DiscountTable::standard(),
        );
        assert_eq!(render_estimate(&result), "------------\nTotal  $0.00\n");
    }

    #[test]
    fn test_render_tables() {
        let rendered = render_tables(&PriceTable::size_tiered(), &DiscountTable::standard());
        assert!(rendered.starts_with("Pricing mode: size-tiered (PHP)\n"));
        assert!(rendered.contains("  9x12          ₱14,000.00\n"));
        assert!(rendered.contains("Rentals are charged 20% of the sale price"));
        assert!(rendered.contains("controller"));
        assert!(rendered.contains("₱2,000.00 each"));
        assert!(rendered.contains("  WELCOME10     10%\n"));

        let rendered = render_tables(&PriceTable::length_based(), &DiscountTable::standard());
        assert!(!rendered.contains("Sizes:"));
        assert!(rendered.contains("$30.00/m"));
    }
}
