//! # Printer Configuration
//!
//! Hardware presets for the two paper widths cheap Bluetooth receipt
//! printers come in, and a JSON-loadable profile for a shop's printer.
//!
//! | Paper | Width (dots) | Text columns | Default logo |
//! |-------|--------------|--------------|--------------|
//! | 58mm | 384 | 32 | 256 dots |
//! | 80mm | 576 | 48 | 384 dots |
//!
//! ## Usage
//!
//! ```
//! use washprint::printer::PrinterConfig;
//!
//! let config = PrinterConfig::PAPER_58MM;
//! println!("Print width: {} dots ({} bytes)",
//!          config.width_dots,
//!          config.width_bytes());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PrintError;

/// # Printer Configuration
///
/// The hardware characteristics a receipt needs to lay itself out.
///
/// ```text
/// dots_per_mm = 203 / 25.4 ≈ 8
///
/// 58mm paper: 48mm printable = 384 dots
/// 80mm paper: 72mm printable = 576 dots
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Preset name
    pub name: &'static str,

    /// Print head width in dots
    pub width_dots: u16,

    /// Text columns with the default font (12×24)
    pub columns: usize,

    /// Logo width used when the profile does not set one
    pub logo_width: u16,
}

impl PrinterConfig {
    /// 58mm paper, 384-dot head.
    pub const PAPER_58MM: Self = Self {
        name: "58mm",
        width_dots: 384,
        columns: 32,
        logo_width: 256,
    };

    /// 80mm paper, 576-dot head.
    pub const PAPER_80MM: Self = Self {
        name: "80mm",
        width_dots: 576,
        columns: 48,
        logo_width: 384,
    };

    /// Look up a preset by paper width in millimeters.
    ///
    /// ```
    /// use washprint::printer::PrinterConfig;
    ///
    /// assert_eq!(PrinterConfig::from_paper_mm(80), Some(PrinterConfig::PAPER_80MM));
    /// assert_eq!(PrinterConfig::from_paper_mm(110), None);
    /// ```
    pub fn from_paper_mm(mm: u16) -> Option<Self> {
        match mm {
            58 => Some(Self::PAPER_58MM),
            80 => Some(Self::PAPER_80MM),
            _ => None,
        }
    }

    /// Print width in bytes (width_dots / 8)
    #[inline]
    pub fn width_bytes(&self) -> u16 {
        self.width_dots.div_ceil(8)
    }

    /// Copy with a different logo width, clamped to the head width.
    pub fn with_logo_width(mut self, logo_width: u16) -> Self {
        self.logo_width = logo_width.min(self.width_dots);
        self
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::PAPER_58MM
    }
}

// ============================================================================
// PRINTER PROFILE
// ============================================================================

/// A shop's printer settings, stored as JSON.
///
/// ```json
/// { "name": "Counter printer", "paper": 58, "device": "/dev/rfcomm0" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterProfile {
    /// Human-readable name
    #[serde(default = "default_profile_name")]
    pub name: String,
    /// Paper width in millimeters (58 or 80)
    #[serde(default = "default_paper")]
    pub paper: u16,
    /// RFCOMM device path
    #[serde(default)]
    pub device: Option<String>,
    /// Logo width override in dots
    #[serde(default)]
    pub logo_width: Option<u16>,
}

fn default_profile_name() -> String {
    "Receipt printer".to_string()
}

fn default_paper() -> u16 {
    58
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self {
            name: default_profile_name(),
            paper: default_paper(),
            device: None,
            logo_width: None,
        }
    }
}

impl PrinterProfile {
    /// Parse a profile from JSON text.
    pub fn from_json(json: &str) -> Result<Self, PrintError> {
        serde_json::from_str(json)
            .map_err(|e| PrintError::Config(format!("Invalid printer profile: {}", e)))
    }

    /// Read a profile from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PrintError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Resolve the hardware preset, applying the logo override.
    pub fn config(&self) -> Result<PrinterConfig, PrintError> {
        let config = PrinterConfig::from_paper_mm(self.paper).ok_or_else(|| {
            PrintError::Config(format!(
                "Unsupported paper width {}mm (expected 58 or 80)",
                self.paper
            ))
        })?;
        Ok(match self.logo_width {
            Some(w) => config.with_logo_width(w),
            None => config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(PrinterConfig::PAPER_58MM.width_bytes(), 48);
        assert_eq!(PrinterConfig::PAPER_80MM.width_bytes(), 72);
        assert_eq!(PrinterConfig::default(), PrinterConfig::PAPER_58MM);
    }

    #[test]
    fn test_logo_width_clamped() {
        let config = PrinterConfig::PAPER_58MM.with_logo_width(1000);
        assert_eq!(config.logo_width, 384);
    }

    #[test]
    fn test_profile_defaults() {
        let profile = PrinterProfile::from_json("{}").unwrap();
        assert_eq!(profile, PrinterProfile::default());
        assert_eq!(profile.config().unwrap(), PrinterConfig::PAPER_58MM);
    }

    #[test]
    fn test_profile_full() {
        let profile = PrinterProfile::from_json(
            r#"{"name":"Back office","paper":80,"device":"/dev/rfcomm1","logo_width":200}"#,
        )
        .unwrap();
        assert_eq!(profile.device.as_deref(), Some("/dev/rfcomm1"));

        let config = profile.config().unwrap();
        assert_eq!(config.width_dots, 576);
        assert_eq!(config.columns, 48);
        assert_eq!(config.logo_width, 200);
    }

    #[test]
    fn test_profile_bad_paper() {
        let profile = PrinterProfile::from_json(r#"{"paper":110}"#).unwrap();
        assert!(matches!(profile.config(), Err(PrintError::Config(_))));
    }

    #[test]
    fn test_profile_bad_json() {
        assert!(matches!(
            PrinterProfile::from_json("not json"),
            Err(PrintError::Config(_))
        ));
    }
}
