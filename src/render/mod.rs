//! # Rendering
//!
//! Image-to-bitmap conversion for receipt logos.
//!
//! ## Submodules
//!
//! - [`source`]: Loading images from URLs, data URIs, and files
//! - [`bitmap`]: Scaling, thresholding, and packing into `GS v 0` commands
//!
//! ## Example
//!
//! ```
//! use image::{DynamicImage, RgbImage, Rgb};
//! use washprint::render::bitmap;
//!
//! let logo = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 20, Rgb([0, 0, 0])));
//! let raster = bitmap::rasterize(&logo, 384, 200)?;
//! let cmd = raster.to_command()?;
//!
//! // 20 * 200 / 40 = 100 rows of 48 bytes
//! assert_eq!(cmd.len(), 8 + 48 * 100);
//! # Ok::<(), washprint::PrintError>(())
//! ```

pub mod bitmap;
pub mod source;

pub use bitmap::{RasterImage, image_to_raster_command, rasterize};
pub use source::ImageLoader;
