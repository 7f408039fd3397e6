pub mod cli;
pub mod config;
pub mod constants;
pub mod export;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod render;
pub mod service;
pub mod session;

pub use anyhow::Result;
