//! # Printer Module
//!
//! Paper presets and printer profiles.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware presets and JSON profiles

pub mod config;

pub use config::{PrinterConfig, PrinterProfile};
