//! Quote requests
//!
//! Turns an estimate into a plain-text message and hands it to a
//! [`MessageComposer`] as a `mailto:` request.

use anyhow::{Context, Result};
use std::io::Write;
use std::process::Command;
use tracing::{debug, info};

use crate::config::QuoteSettings;
use crate::constants::quote::{CLOSING, HEADER};
use crate::money::format_quantity;
use crate::pricing::EstimateResult;


/// A composed quote request
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl QuoteMessage {
    pub fn from_estimate(result: &EstimateResult, settings: &QuoteSettings) -> Self {
        Self {
            recipient: settings.recipient.clone(),
            subject: settings.subject.clone(),
            body: quote_body(result),
        }
    }

    /// `mailto:` URL with the subject and body percent-encoded
    pub fn mailto_url(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.recipient,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

fn quote_body(result: &EstimateResult) -> String {
    let summary = &result.summary;
    let currency = result.currency;

    let mut lines = vec![HEADER.to_string(), String::new()];

    if let Some(size) = &summary.size {
        lines.push(format!("Selected size: {}", size));
    }
    lines.push(format!("Transaction: {}", summary.transaction));
    if let Some(quantity) = summary.quantity {
        lines.push(format!("Quantity: {}", quantity));
    }
    if let Some(meters) = summary.meters {
        lines.push(format!("Length: {} m", format_quantity(meters)));
    }
    if let Some(controllers) = summary.controllers {
        lines.push(format!("Controllers: {}", controllers));
    }
    if let Some(complexity) = summary.complexity {
        lines.push(format!("Complexity factor: {}", format_quantity(complexity)));
    }

    let services = if summary.services.is_empty() {
        "None".to_string()
    } else {
        summary
            .services
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    lines.push(format!("Selected services: {}", services));
    lines.push(format!(
        "Discount code: {}",
        summary.discount_code.as_deref().unwrap_or("N/A")
    ));

    lines.push(String::new());
    lines.push(format!("Estimated total: {}", currency.format(result.total)));
    lines.push(String::new());
    lines.push("Estimate details:".to_string());
    for line in &result.lines {
        lines.push(format!("- {}: {}", line.label, currency.format(line.amount)));
    }

    lines.push(String::new());
    lines.push(CLOSING.to_string());

    lines.join("\n")
}

/// Delivers a quote request to whatever composes mail on this platform
pub trait MessageComposer {
    fn compose(&mut self, message: &QuoteMessage) -> Result<()>;
}

/// Writes the `mailto:` URL to a writer and optionally opens it with the
/// platform's URL handler
pub struct MailtoComposer<W: Write> {
    out: W,
    open: bool,
}

impl<W: Write> MailtoComposer<W> {
    pub fn new(out: W) -> Self {
        Self { out, open: false }
    }

    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MessageComposer for MailtoComposer<W> {
    fn compose(&mut self, message: &QuoteMessage) -> Result<()> {
        let url = message.mailto_url();
        writeln!(self.out, "{}", url).context("Failed to write mailto URL")?;

        if self.open {
            open_url(&url)?;
        }
        Ok(())
    }
}

fn open_url(url: &str) -> Result<()> {
    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &["open"]
    } else if cfg!(target_os = "windows") {
        &["explorer"]
    } else {
        &["xdg-open", "gio"]
    };

    let opener = candidates
        .iter()
        .find_map(|name| which::which(name).ok())
        .with_context(|| format!("No URL opener found (tried {})", candidates.join(", ")))?;

    let mut cmd = Command::new(&opener);
    if opener.file_stem().is_some_and(|stem| stem == "gio") {
        cmd.arg("open");
    }
    cmd.arg(url);

    debug!("Running command: {:?}", cmd);
    info!("Opening mail composer with {}", opener.display());
    let status = cmd
        .status()
        .with_context(|| format!("Failed to execute {}", opener.display()))?;

    if !status.success() {
        anyhow::bail!("{} exited with {}", opener.display(), status);
    }
    Ok(())
}
