use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
mod tests;

/// Display currency of a price table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Philippine peso, formatted for en-PH
    #[default]
    Php,
    /// US dollar, formatted for en-US
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Php => "PHP",
            Currency::Usd => "USD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Php => "₱",
            Currency::Usd => "$",
        }
    }

    /// Format an amount the way the locale displays currency: symbol,
    /// thousands separators, two decimals and a leading minus for negatives.
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = round_cents(amount);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let digits = format!("{:.2}", rounded.abs());
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        format!(
            "{}{}{}.{}",
            sign,
            self.symbol(),
            group_thousands(whole),
            fraction
        )
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Round to whole units, halves away from zero
pub fn round_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to cents, halves away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Render a plain quantity without trailing zeros (`10.0` becomes `10`)
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Render a fractional rate as a whole percentage (`0.10` becomes `10`)
pub fn format_percent(rate: Decimal) -> String {
    format_quantity(round_whole(rate.saturating_mul(Decimal::ONE_HUNDRED)))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
