//! Estimate service
//!
//! Thin adapter between a front end and the calculator: it fills in
//! defaults the tables imply, calls [`compute`], and hands the result to the
//! quote and export collaborators. Pricing rules live in `pricing` only.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::{Config, ExportSettings, QuoteSettings};
use crate::export::{ExportDocument, ExportSink};
use crate::pricing::{
    compute, DiscountTable, EstimateInput, EstimateResult, PriceTable, PricingMode, RawInput,
};
use crate::quote::{MessageComposer, QuoteMessage};
use crate::render::{render_estimate, render_tables};

pub struct EstimateService {
    prices: PriceTable,
    discounts: DiscountTable,
    quote: QuoteSettings,
    export: ExportSettings,
}

impl EstimateService {
    pub fn new(prices: PriceTable, discounts: DiscountTable) -> Self {
        Self {
            prices,
            discounts,
            quote: QuoteSettings::default(),
            export: ExportSettings::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let service = Self::new(config.price_table()?, config.discount_table()?)
            .with_quote_settings(config.quote.clone())
            .with_export_settings(config.export.clone());
        info!(
            "Using {} pricing in {}",
            service.prices.mode, service.prices.currency
        );
        Ok(service)
    }

    pub fn with_quote_settings(mut self, settings: QuoteSettings) -> Self {
        self.quote = settings;
        self
    }

    pub fn with_export_settings(mut self, settings: ExportSettings) -> Self {
        self.export = settings;
        self
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn export_settings(&self) -> &ExportSettings {
        &self.export
    }

    /// Normalize raw input; a size-tiered estimate with no size uses the
    /// table's first size
    pub fn normalize(&self, raw: &RawInput) -> EstimateInput {
        let mut input = EstimateInput::from_raw(raw);
        if self.prices.mode == PricingMode::SizeTiered && input.size.is_empty() {
            if let Some(size) = self.prices.default_size() {
                debug!("No size selected, defaulting to {}", size);
                input.size = size.to_string();
            }
        }
        input
    }

    pub fn estimate(&self, raw: &RawInput) -> EstimateResult {
        let input = self.normalize(raw);
        debug!("Computing estimate for {:?}", input);
        compute(&input, &self.prices, &self.discounts)
    }

    pub fn render(&self, raw: &RawInput) -> String {
        render_estimate(&self.estimate(raw))
    }

    pub fn render_tables(&self) -> String {
        render_tables(&self.prices, &self.discounts)
    }

    /// Compose a quote request for the estimate and pass it to `composer`
    pub fn request_quote(
        &self,
        raw: &RawInput,
        composer: &mut dyn MessageComposer,
    ) -> Result<EstimateResult> {
        let result = self.estimate(raw);
        let message = QuoteMessage::from_estimate(&result, &self.quote);
        info!("Composing quote request to {}", message.recipient);
        composer.compose(&message)?;
        Ok(result)
    }

    /// Export document for the estimate, stamped with `generated_at`
    pub fn export_document(&self, raw: &RawInput, generated_at: DateTime<Utc>) -> ExportDocument {
        ExportDocument::new(&self.estimate(raw), generated_at)
    }

    /// Serialize the estimate and save it through `sink`
    pub fn export(
        &self,
        raw: &RawInput,
        sink: &dyn ExportSink,
        generated_at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let json = self.export_document(raw, generated_at).to_json()?;
        sink.persist(&self.export.file_name, json.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::DirectorySink;
    use crate::quote::QuoteMessage;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::cell::RefCell;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingComposer {
        messages: Vec<QuoteMessage>,
    }

    impl MessageComposer for RecordingComposer {
        fn compose(&mut self, message: &QuoteMessage) -> Result<()> {
            self.messages.push(message.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemorySink {
        saved: RefCell<Vec<(String, Vec<u8>)>>,
    }

    impl ExportSink for MemorySink {
        fn persist(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
            self.saved
                .borrow_mut()
                .push((file_name.to_string(), contents.to_vec()));
            Ok(PathBuf::from(file_name))
        }
    }

    fn size_service() -> EstimateService {
        EstimateService::new(PriceTable::size_tiered(), DiscountTable::standard())
    }

    fn raw_9x12() -> RawInput {
        RawInput {
            size: Some("9x12".to_string()),
            quantity: Some("2".to_string()),
            services: vec!["installation".to_string()],
            ..RawInput::default()
        }
    }

    #[test]
    fn test_missing_size_defaults_to_first_size() {
        let input = size_service().normalize(&RawInput::default());
        assert_eq!(input.size, "6x9");
    }

    #[test]
    fn test_length_mode_leaves_size_empty() {
        let service = EstimateService::new(PriceTable::length_based(), DiscountTable::standard());
        assert_eq!(service.normalize(&RawInput::default()).size, "");
    }

    #[test]
    fn test_request_quote_uses_composer() {
        let service = size_service().with_quote_settings(QuoteSettings {
            recipient: "sales@example.com".to_string(),
            subject: "Quote".to_string(),
        });
        let mut composer = RecordingComposer::default();

        let result = service.request_quote(&raw_9x12(), &mut composer).unwrap();
        assert_eq!(result.total, dec!(31000));
        assert_eq!(composer.messages.len(), 1);
        assert_eq!(composer.messages[0].recipient, "sales@example.com");
        assert!(composer.messages[0]
            .body
            .contains("Estimated total: ₱31,000.00"));
    }

    #[test]
    fn test_export_total_matches_displayed_total() {
        let service = size_service();
        let sink = MemorySink::default();
        let generated_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let path = service.export(&raw_9x12(), &sink, generated_at).unwrap();
        assert_eq!(path, PathBuf::from("ledpro-quote.json"));

        let saved = sink.saved.borrow();
        let value: serde_json::Value = serde_json::from_slice(&saved[0].1).unwrap();
        assert_eq!(value["total"].as_f64(), Some(31000.0));
        assert!(service.render(&raw_9x12()).contains("Total"));
        assert!(service.render(&raw_9x12()).contains("₱31,000.00"));
    }

    #[test]
    fn test_export_to_directory() {
        let dir = tempdir().unwrap();
        let service = size_service();
        let path = service
            .export(&raw_9x12(), &DirectorySink::new(dir.path()), Utc::now())
            .unwrap();
        assert_eq!(path, dir.path().join("ledpro-quote.json"));
        assert!(path.exists());
    }

    #[test]
    fn test_from_config() {
        let config = Config::default().with_mode(PricingMode::LengthBased);
        let service = EstimateService::from_config(&config).unwrap();
        assert_eq!(service.prices().mode, PricingMode::LengthBased);
        assert_eq!(service.export_settings().file_name, "ledpro-quote.json");
    }
}
