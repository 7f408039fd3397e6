#[cfg(test)]
mod tests {
    use super::super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_php() {
        assert_eq!(Currency::Php.format(dec!(31000)), "₱31,000.00");
        assert_eq!(Currency::Php.format(dec!(2000)), "₱2,000.00");
        assert_eq!(Currency::Php.format(dec!(999.5)), "₱999.50");
        assert_eq!(Currency::Php.format(dec!(1234567.891)), "₱1,234,567.89");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(Currency::Usd.format(dec!(380)), "$380.00");
        assert_eq!(Currency::Usd.format(dec!(0)), "$0.00");
        assert_eq!(Currency::Usd.format(dec!(0.005)), "$0.01");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(Currency::Php.format(dec!(-3100)), "-₱3,100.00");
        assert_eq!(Currency::Usd.format(dec!(-38)), "-$38.00");
        // Rounds to zero, so no sign
        assert_eq!(Currency::Usd.format(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_round_whole_midpoint() {
        assert_eq!(round_whole(dec!(2000.5)), dec!(2001));
        assert_eq!(round_whole(dec!(2469.4)), dec!(2469));
        assert_eq!(round_whole(dec!(2400)), dec!(2400));
    }

    #[test]
    fn test_format_quantity_and_percent() {
        assert_eq!(format_quantity(dec!(10.0)), "10");
        assert_eq!(format_quantity(dec!(2.50)), "2.5");
        assert_eq!(format_percent(dec!(0.10)), "10");
        assert_eq!(format_percent(dec!(0.125)), "13");
    }
}
