#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::pricing::RuleKind;
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.mode, PricingMode::SizeTiered);
        assert!(config.currency.is_none());
        assert!(config.sizes.is_empty());
        assert!(config.discounts.is_none());
        assert_eq!(config.quote.recipient, "info@ledpro.example");
        assert_eq!(config.quote.subject, "LedPro Quote Request");
        assert_eq!(config.export.file_name, "ledpro-quote.json");
    }

    #[test]
    fn test_default_tables_match_presets() {
        let config = Config::default();
        assert_eq!(config.price_table().unwrap(), PriceTable::size_tiered());
        assert_eq!(config.discount_table().unwrap(), DiscountTable::standard());

        let config = Config::default().with_mode(PricingMode::LengthBased);
        assert_eq!(config.price_table().unwrap(), PriceTable::length_based());
    }

    #[test]
    fn test_load_from_file_with_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
mode = "length-based"
currency = "PHP"
tax_rate = 0.12

[services.design]
kind = "per_unit"
value = 35
label = "Custom design"

[discounts]
summer20 = 0.2

[quote]
recipient = "sales@example.com"

[export]
output_dir = "/tmp/quotes"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.mode, PricingMode::LengthBased);
        assert_eq!(config.quote.recipient, "sales@example.com");
        assert_eq!(config.quote.subject, "LedPro Quote Request");
        assert_eq!(config.export.file_name, "ledpro-quote.json");

        let prices = config.price_table().unwrap();
        assert_eq!(prices.currency, Currency::Php);
        assert_eq!(prices.tax_rate, dec!(0.12));
        assert_eq!(
            prices.services[&ServiceKey::Design],
            PriceRule::new(RuleKind::PerUnit, dec!(35), "Custom design")
        );
        // Untouched services keep their built-in rule
        assert_eq!(prices.services[&ServiceKey::Controller].unit_value, dec!(40));

        let discounts = config.discount_table().unwrap();
        assert_eq!(discounts.rate_for("SUMMER20"), dec!(0.2));
        assert_eq!(discounts.rate_for("WELCOME10"), dec!(0));
    }

    #[test]
    fn test_sizes_replace_builtin_sizes() {
        let config: Config = toml::from_str(
            r#"
[sizes]
"3x3" = 5000
"#,
        )
        .unwrap();

        let prices = config.price_table().unwrap();
        assert_eq!(prices.sizes.len(), 1);
        assert_eq!(prices.default_size(), Some("3x3"));
    }

    #[test]
    fn test_unknown_service_is_rejected() {
        let config: Config = toml::from_str(
            r#"
[services.fog_machine]
kind = "flat"
value = 100
label = "Fog"
"#,
        )
        .unwrap();

        let err = config.price_table().unwrap_err();
        assert!(format!("{:#}", err).contains("fog_machine"));
    }

    #[test]
    fn test_invalid_discount_rate_is_rejected() {
        let config: Config = toml::from_str(
            r#"
[discounts]
FREE = 1.0
"#,
        )
        .unwrap();

        assert!(config.discount_table().is_err());
    }

    #[test]
    fn test_invalid_rent_multiplier_is_rejected() {
        let config: Config = toml::from_str("rent_multiplier = 1.5").unwrap();
        assert!(config.price_table().is_err());
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("missing.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read"));
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "invalid toml [[[").unwrap();

        let result = Config::load_from(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn test_service_override_keeps_builtin_label() {
        let config: Config = toml::from_str(
            r#"
[services.design]
kind = "flat"
value = 1800
"#,
        )
        .unwrap();

        let prices = config.price_table().unwrap();
        assert_eq!(
            prices.services[&ServiceKey::Design],
            PriceRule::new(RuleKind::Flat, dec!(1800), "Design (flat)")
        );
    }
}
