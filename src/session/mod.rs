//! Interactive estimate session
//!
//! Holds the current form values and re-renders the estimate after every
//! change, the way the web form recomputes on each input event.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::warn;

use crate::pricing::{RawInput, ServiceKey};
use crate::service::EstimateService;


/// Editable form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Size,
    Transaction,
    Quantity,
    Meters,
    Controllers,
    Complexity,
    Discount,
    Services,
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "size" => Ok(Field::Size),
            "transaction" => Ok(Field::Transaction),
            "quantity" | "qty" => Ok(Field::Quantity),
            "meters" | "length" => Ok(Field::Meters),
            "controllers" => Ok(Field::Controllers),
            "complexity" => Ok(Field::Complexity),
            "discount" | "code" => Ok(Field::Discount),
            "services" | "service" => Ok(Field::Services),
            other => anyhow::bail!("Unknown field: {}", other),
        }
    }
}

/// One line of session input
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Set(Field, String),
    Select(ServiceKey),
    Deselect(ServiceKey),
    Show,
    Reset,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        if let Some((field, value)) = line.split_once('=') {
            return Ok(SessionCommand::Set(field.parse()?, value.trim().to_string()));
        }
        if let Some(service) = line.strip_prefix('+') {
            return Ok(SessionCommand::Select(service.parse()?));
        }
        if let Some(service) = line.strip_prefix('-') {
            return Ok(SessionCommand::Deselect(service.parse()?));
        }
        match line.to_ascii_lowercase().as_str() {
            "" | "show" => Ok(SessionCommand::Show),
            "reset" => Ok(SessionCommand::Reset),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" | "q" => Ok(SessionCommand::Quit),
            _ => anyhow::bail!("Unrecognized input: {}", line),
        }
    }
}

const HELP: &str = "\
Commands:
  field=value   set size, transaction, quantity, meters, controllers,
                complexity, discount or services (comma-separated)
  +service      select a service
  -service      deselect a service
  show          print the current estimate
  reset         clear all fields
  quit          leave the session
";

/// Current form values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    raw: RawInput,
}

impl FormState {
    pub fn new(raw: RawInput) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &RawInput {
        &self.raw
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Size => &mut self.raw.size,
            Field::Transaction => &mut self.raw.transaction,
            Field::Quantity => &mut self.raw.quantity,
            Field::Meters => &mut self.raw.meters,
            Field::Controllers => &mut self.raw.controllers,
            Field::Complexity => &mut self.raw.complexity,
            Field::Discount => &mut self.raw.discount,
            Field::Services => {
                self.raw.services = vec![value];
                return;
            }
        };
        *slot = Some(value);
    }

    pub fn select(&mut self, key: ServiceKey) {
        self.raw.services.push(key.as_str().to_string());
    }

    /// Deselect a service, including every comma-separated mention of it
    pub fn deselect(&mut self, key: ServiceKey) {
        self.raw.services = self
            .raw
            .services
            .iter()
            .flat_map(|entry| entry.split(','))
            .filter(|name| ServiceKey::from_str(name).ok() != Some(key))
            .map(|name| name.trim().to_string())
            .collect();
    }

    pub fn reset(&mut self) {
        self.raw = RawInput::default();
    }
}

/// Read commands from `input` until quit or end of input, writing the
/// estimate to `out` after every change. Bad lines are logged and skipped.
pub fn run(
    service: &EstimateService,
    state: &mut FormState,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    write!(out, "{}", service.render(state.raw())).context("Failed to write estimate")?;

    for line in input.lines() {
        let line = line.context("Failed to read session input")?;
        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        match command {
            SessionCommand::Set(field, value) => state.set(field, value),
            SessionCommand::Select(key) => state.select(key),
            SessionCommand::Deselect(key) => state.deselect(key),
            SessionCommand::Reset => state.reset(),
            SessionCommand::Show => {}
            SessionCommand::Help => {
                write!(out, "{}", HELP).context("Failed to write help")?;
                continue;
            }
            SessionCommand::Quit => break,
        }

        writeln!(out).context("Failed to write estimate")?;
        write!(out, "{}", service.render(state.raw())).context("Failed to write estimate")?;
    }

    Ok(())
}
