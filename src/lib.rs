//! # washprint - Laundry Receipt Printing
//!
//! washprint prints laundry-shop receipts on generic ESC/POS thermal
//! printers over Bluetooth. It provides:
//!
//! - **Command builder**: a chainable ESC/POS buffer for receipt text
//! - **Logo conversion**: any image to a centered `GS v 0` raster bitmap
//! - **Protocol primitives**: the raw command byte sequences
//! - **Transport**: Bluetooth RFCOMM, plus stand-in ports
//! - **Receipts**: order layout and the print job
//!
//! ## Quick Start
//!
//! ```no_run
//! use washprint::{
//!     EscPosBuilder, PrinterConfig,
//!     render::{ImageLoader, image_to_raster_command},
//!     transport::BluetoothTransport,
//! };
//!
//! # async fn run() -> Result<(), washprint::PrintError> {
//! let config = PrinterConfig::PAPER_58MM;
//! let loader = ImageLoader::new()?;
//! let logo = image_to_raster_command(&loader, "logo.png", 384, 256).await?;
//!
//! let mut receipt = EscPosBuilder::new();
//! receipt
//!     .character_width(config.columns)
//!     .initialize()
//!     .align_center()
//!     .raw(&logo)
//!     .bold(true)
//!     .text("FRESH & CLEAN LAUNDRY")
//!     .bold(false)
//!     .feed(1)
//!     .horizontal_rule()
//!     .feed(3)
//!     .cut();
//!
//! let mut transport = BluetoothTransport::open("/dev/rfcomm0")?;
//! transport.write_all(&receipt.encode())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`builder`] | Chainable ESC/POS command builder |
//! | [`protocol`] | ESC/POS command byte sequences |
//! | [`render`] | Logo loading and bitmap conversion |
//! | [`printer`] | Paper presets and printer profiles |
//! | [`transport`] | Printer ports |
//! | [`receipt`] | Laundry order receipts |
//! | [`error`] | Error types |

pub mod builder;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod receipt;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use builder::EscPosBuilder;
pub use error::PrintError;
pub use printer::{PrinterConfig, PrinterProfile};
pub use render::RasterImage;
pub use transport::{BluetoothTransport, PrinterPort};
