use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use ledpro::{
    cli::{Cli, Commands},
    config::Config,
    export::DirectorySink,
    pricing::{PricingMode, RawInput},
    quote::MailtoComposer,
    service::EstimateService,
    session::{self, FormState},
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Estimate { fields, json } => {
            let service = load_service(cli.config.as_deref(), cli.mode)?;
            let raw = RawInput::from(fields);
            if json {
                println!("{}", service.export_document(&raw, Utc::now()).to_json()?);
            } else {
                print!("{}", service.render(&raw));
            }
        }
        Commands::Quote { fields, open } => {
            let service = load_service(cli.config.as_deref(), cli.mode)?;
            let raw = RawInput::from(fields);
            let mut composer = MailtoComposer::new(io::stdout().lock()).with_open(open);
            let result = service.request_quote(&raw, &mut composer)?;
            info!("Quote total: {}", result.currency.format(result.total));
        }
        Commands::Export { fields, output_dir } => {
            let service = load_service(cli.config.as_deref(), cli.mode)?;
            let raw = RawInput::from(fields);
            let dir = output_dir
                .or_else(|| service.export_settings().output_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            let path = service.export(&raw, &DirectorySink::new(dir), Utc::now())?;

            // Print only the written path to stdout
            println!("{}", path.display());
        }
        Commands::Tables => {
            let service = load_service(cli.config.as_deref(), cli.mode)?;
            print!("{}", service.render_tables());
        }
        Commands::Session { fields } => {
            let service = load_service(cli.config.as_deref(), cli.mode)?;
            let mut state = FormState::new(RawInput::from(fields));
            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            session::run(&service, &mut state, stdin.lock(), &mut stdout)?;
            stdout.flush()?;
        }
        Commands::Version => {
            println!("ledpro {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn load_service(config_path: Option<&Path>, mode: Option<PricingMode>) -> Result<EstimateService> {
    let mut config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(mode) = mode {
        config = config.with_mode(mode);
    }
    EstimateService::from_config(&config)
}
