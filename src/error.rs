//! # Error Types
//!
//! This module defines error types used throughout the washprint library.

use thiserror::Error;

/// Main error type for washprint operations
#[derive(Debug, Error)]
pub enum PrintError {
    /// Source image could not be fetched, read, or decoded
    #[error("Image load error: {0}")]
    ImageLoad(String),

    /// Off-screen drawing surface could not be created for the request
    #[error("Render context error: {0}")]
    RenderContext(String),

    /// Transport-level errors (connection, I/O)
    #[error("Transport error: {0}")]
    Transport(String),

    /// No printer capability on this host
    #[error("Printer unavailable: {0}")]
    Unavailable(String),

    /// Invalid profile, shop, or order data
    #[error("Config error: {0}")]
    Config(String),

    /// Generated output (preview, receipt dump) could not be written
    #[error("Output error: {0}")]
    Output(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
