use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::pricing::{PricingMode, RawInput};

#[derive(Parser)]
#[command(name = "ledpro")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (defaults to <config dir>/ledpro/config.toml)
    #[arg(long, global = true, env = "LEDPRO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pricing mode: size-tiered (size) or length-based (length)
    #[arg(long, global = true, value_parser = parse_mode)]
    pub mode: Option<PricingMode>,
}

fn parse_mode(value: &str) -> Result<PricingMode, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the cost breakdown for an estimate
    Estimate {
        #[command(flatten)]
        fields: EstimateFields,

        /// Print the export document as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compose a quote request email for an estimate
    Quote {
        #[command(flatten)]
        fields: EstimateFields,

        /// Open the mailto link with the system mail client
        #[arg(long)]
        open: bool,
    },

    /// Save an estimate as a JSON file
    Export {
        #[command(flatten)]
        fields: EstimateFields,

        /// Directory to write the file to
        #[arg(long, value_name = "DIRECTORY")]
        output_dir: Option<PathBuf>,
    },

    /// List sizes, services and discount codes
    Tables,

    /// Edit an estimate interactively, re-pricing after every change
    Session {
        #[command(flatten)]
        fields: EstimateFields,
    },

    /// Show version information
    Version,
}

/// Estimate form fields. Numbers are taken as typed and clamped later.
#[derive(Args, Debug, Clone, Default)]
pub struct EstimateFields {
    /// Wall size (e.g., 9x12)
    #[arg(long)]
    pub size: Option<String>,

    /// Transaction type: sale or rent
    #[arg(long)]
    pub transaction: Option<String>,

    /// Number of walls
    #[arg(long, allow_hyphen_values = true)]
    pub quantity: Option<String>,

    /// Wall length in meters
    #[arg(long, allow_hyphen_values = true)]
    pub meters: Option<String>,

    /// Number of controllers
    #[arg(long, allow_hyphen_values = true)]
    pub controllers: Option<String>,

    /// Site complexity factor (1 = standard)
    #[arg(long, allow_hyphen_values = true)]
    pub complexity: Option<String>,

    /// Discount code
    #[arg(long)]
    pub discount: Option<String>,

    /// Add-on services (consultation, design, hardware, installation, controller)
    /// Can be specified multiple times or as a comma-separated list
    #[arg(long = "service", value_delimiter = ',')]
    pub services: Vec<String>,
}

impl From<EstimateFields> for RawInput {
    fn from(fields: EstimateFields) -> Self {
        RawInput {
            size: fields.size,
            transaction: fields.transaction,
            quantity: fields.quantity,
            meters: fields.meters,
            controllers: fields.controllers,
            complexity: fields.complexity,
            discount: fields.discount,
            services: fields.services,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsed_by_clap() {
        let cli = Cli::try_parse_from(["ledpro", "--mode", "length", "tables"]).unwrap();
        assert_eq!(cli.mode, Some(PricingMode::LengthBased));

        let cli = Cli::try_parse_from(["ledpro", "tables"]).unwrap();
        assert_eq!(cli.mode, None);
    }

    #[test]
    fn test_unknown_mode_rejected_by_clap() {
        let err = Cli::try_parse_from(["ledpro", "--mode", "hourly", "tables"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("Unknown pricing mode"));
    }
}
