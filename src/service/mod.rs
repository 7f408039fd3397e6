//! Service layer between the command line and the calculator
//!
//! Front ends call into this layer; it owns the configured tables and the
//! collaborators, keeping `main.rs` free of pricing concerns.

pub mod estimate;

pub use estimate::EstimateService;
