/// Pricing defaults shared by the built-in price tables
pub mod pricing {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Fraction of the sale price charged for a rental
    pub const RENT_MULTIPLIER: Decimal = dec!(0.20);

    /// Tax rate applied after discounts (inactive by default)
    pub const TAX_RATE: Decimal = dec!(0);

    /// Floor for the wall quantity in size-tiered pricing
    pub const MIN_QUANTITY: u32 = 1;

    /// Floor for the complexity factor in length-based pricing
    pub const MIN_COMPLEXITY: Decimal = dec!(1);
}

/// Discount codes shipped with the default configuration
pub mod discount {
    /// 10% welcome discount
    pub const WELCOME10: &str = "WELCOME10";

    /// 5% returning client discount
    pub const PROCLIENT5: &str = "PROCLIENT5";
}

/// Quote request defaults
pub mod quote {
    /// Mailbox that receives quote requests
    pub const RECIPIENT: &str = "info@ledpro.example";

    /// Subject line of the quote request
    pub const SUBJECT: &str = "LedPro Quote Request";

    /// First line of the quote message body
    pub const HEADER: &str = "LED Pro - Quote Request";

    /// Call to action closing the quote message body
    pub const CLOSING: &str = "Please contact me to schedule a site visit or request a formal quote.";
}

/// Export artifact defaults
pub mod export {
    /// File name of the exported estimate
    pub const FILE_NAME: &str = "ledpro-quote.json";
}
