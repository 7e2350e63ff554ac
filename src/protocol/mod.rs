//! # ESC/POS Protocol Implementation
//!
//! This module provides low-level command builders for the ESC/POS protocol
//! spoken by generic thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Basic printer commands (init, cut, feed)
//! - [`text`]: Text styling (alignment, bold)
//! - [`graphics`]: Raster bit images (`GS v 0`)
//!
//! ## Usage Example
//!
//! ```
//! use washprint::protocol::{commands, graphics, text};
//!
//! let mut data = Vec::new();
//!
//! data.extend(commands::init());
//!
//! data.extend(text::align_center());
//! data.extend(text::bold_on());
//! data.extend(b"RECEIPT\n");
//! data.extend(text::bold_off());
//! data.extend(text::align_left());
//!
//! // 384-dot wide, 8-row striped bitmap
//! let rows = vec![0xAA; 48 * 8];
//! data.extend(graphics::raster_bit_image(48, 8, &rows));
//!
//! data.extend(commands::cut_full());
//!
//! // Send `data` to printer via a transport...
//! ```

pub mod commands;
pub mod graphics;
pub mod text;
