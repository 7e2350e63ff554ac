//! # Image to Raster Bitmap
//!
//! Turns a decoded image into a centered monochrome bitmap the width of the
//! print head, then into a `GS v 0` command.
//!
//! ## Pipeline
//!
//! ```text
//! source ──scale to logo_width──► logo
//!                                  │ composite over white, centered
//!                                  ▼
//!                    width × logo_height surface
//!                                  │ (R+G+B)/3 < 128 → black
//!                                  ▼
//!                             RasterImage
//!                                  │ pack MSB-first, ceil(width/8) bytes/row
//!                                  ▼
//!                 1D 76 30 00 xL xH yL yH rows...
//! ```
//!
//! Scaling keeps the aspect ratio: `logo_height = floor(src_h * logo_width / src_w)`.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

use super::source::ImageLoader;
use crate::error::PrintError;
use crate::protocol::graphics;

/// Channel average below which a pixel prints black.
pub const THRESHOLD: u16 = 128;

/// A monochrome bitmap: `true` prints a dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl RasterImage {
    /// An all-white bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per packed row.
    pub fn width_bytes(&self) -> usize {
        self.width.div_ceil(8)
    }

    /// Whether the dot at (x, y) is black. Out of range reads as white.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, black: bool) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = black;
        }
    }

    /// Pack into rows of `width_bytes()` bytes, MSB = leftmost dot.
    ///
    /// Padding bits past `width` in the last byte of a row stay 0.
    pub fn pack(&self) -> Vec<u8> {
        let width_bytes = self.width_bytes();
        let mut data = vec![0u8; width_bytes * self.height];

        for y in 0..self.height {
            let row = &self.pixels[y * self.width..(y + 1) * self.width];
            for (x, &black) in row.iter().enumerate() {
                if black {
                    data[y * width_bytes + x / 8] |= 0x80 >> (x % 8);
                }
            }
        }

        data
    }

    /// Encode as a `GS v 0` raster bit image command.
    ///
    /// Fails with [`PrintError::RenderContext`] if either dimension does not
    /// fit the command's 16-bit fields.
    pub fn to_command(&self) -> Result<Vec<u8>, PrintError> {
        let width_bytes = u16::try_from(self.width_bytes()).map_err(|_| {
            PrintError::RenderContext(format!("width {} too large for GS v 0", self.width))
        })?;
        let height = u16::try_from(self.height).map_err(|_| {
            PrintError::RenderContext(format!("height {} too large for GS v 0", self.height))
        })?;
        Ok(graphics::raster_bit_image(width_bytes, height, &self.pack()))
    }

    /// Grayscale preview (black dots = 0, white = 255).
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            if self.get(x as usize, y as usize) {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        })
    }
}

/// Height of the logo once scaled to `logo_width`, rounded down.
pub fn scaled_height(src_width: u32, src_height: u32, logo_width: u32) -> u64 {
    if src_width == 0 {
        return 0;
    }
    src_height as u64 * logo_width as u64 / src_width as u64
}

/// Render `image` scaled to `logo_width` and centered on a white surface
/// `width` dots wide, then threshold it.
///
/// Fails with [`PrintError::RenderContext`] when no surface can be made for
/// the request: zero widths, a logo wider than the head, an empty source,
/// or dimensions that overflow the raster command.
pub fn rasterize(
    image: &DynamicImage,
    width: u32,
    logo_width: u32,
) -> Result<RasterImage, PrintError> {
    if width == 0 {
        return Err(PrintError::RenderContext("print width is zero".to_string()));
    }
    if logo_width == 0 || logo_width > width {
        return Err(PrintError::RenderContext(format!(
            "logo width {} must be between 1 and print width {}",
            logo_width, width
        )));
    }
    if image.width() == 0 {
        return Err(PrintError::RenderContext("source image has zero width".to_string()));
    }
    if width.div_ceil(8) > u16::MAX as u32 {
        return Err(PrintError::RenderContext(format!(
            "print width {} too large",
            width
        )));
    }

    let logo_height = scaled_height(image.width(), image.height(), logo_width);
    let logo_height = u32::try_from(logo_height)
        .ok()
        .filter(|h| *h <= u16::MAX as u32)
        .ok_or_else(|| {
            PrintError::RenderContext(format!("logo height {} too large", logo_height))
        })?;

    let mut surface = RgbaImage::from_pixel(width, logo_height, Rgba([255, 255, 255, 255]));
    if logo_height > 0 {
        let logo = imageops::resize(&image.to_rgba8(), logo_width, logo_height, FilterType::Triangle);
        let x = ((width - logo_width) / 2) as i64;
        imageops::overlay(&mut surface, &logo, x, 0);
    }

    Ok(threshold(&surface))
}

/// Threshold an RGBA surface: black where the unweighted RGB average is
/// strictly below [`THRESHOLD`]. Alpha is not consulted.
pub fn threshold(surface: &RgbaImage) -> RasterImage {
    let mut raster = RasterImage::new(surface.width() as usize, surface.height() as usize);
    for (x, y, pixel) in surface.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        let sum = r as u16 + g as u16 + b as u16;
        raster.set(x as usize, y as usize, sum < THRESHOLD * 3);
    }
    raster
}

/// Load `source` and convert it to a `GS v 0` command for a `width`-dot head
/// with the logo `logo_width` dots wide.
///
/// Output is exactly `8 + ceil(width/8) * logo_height` bytes.
pub async fn image_to_raster_command(
    loader: &ImageLoader,
    source: &str,
    width: u32,
    logo_width: u32,
) -> Result<Vec<u8>, PrintError> {
    let image = loader.load(source).await?;
    rasterize(&image, width, logo_width)?.to_command()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use pretty_assertions::assert_eq;

    fn solid(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            Rgb([value, value, value]),
        ))
    }

    #[test]
    fn test_scaled_height_floors() {
        assert_eq!(scaled_height(100, 50, 200), 100);
        assert_eq!(scaled_height(3, 2, 10), 6); // 6.67 -> 6
        assert_eq!(scaled_height(0, 50, 10), 0);
    }

    #[test]
    fn test_pack_msb_first() {
        let mut raster = RasterImage::new(8, 1);
        raster.set(0, 0, true);
        raster.set(7, 0, true);
        assert_eq!(raster.pack(), vec![0x81]);
    }

    #[test]
    fn test_pack_pads_partial_byte_white() {
        let mut raster = RasterImage::new(12, 1);
        for x in 0..12 {
            raster.set(x, 0, true);
        }
        assert_eq!(raster.pack(), vec![0xFF, 0xF0]);
    }

    #[test]
    fn test_get_out_of_range_is_white() {
        let raster = RasterImage::new(4, 4);
        assert!(!raster.get(10, 0));
        assert!(!raster.get(0, 10));
    }

    #[test]
    fn test_threshold_boundary() {
        let mut surface = RgbaImage::new(3, 1);
        surface.put_pixel(0, 0, Rgba([127, 127, 127, 255]));
        surface.put_pixel(1, 0, Rgba([128, 128, 128, 255]));
        // average 127.67: black
        surface.put_pixel(2, 0, Rgba([255, 128, 0, 255]));
        let raster = threshold(&surface);
        assert!(raster.get(0, 0));
        assert!(!raster.get(1, 0));
        assert!(raster.get(2, 0));
    }

    #[test]
    fn test_threshold_ignores_alpha() {
        let mut surface = RgbaImage::new(1, 1);
        surface.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        assert!(threshold(&surface).get(0, 0));
    }

    #[test]
    fn test_rasterize_white_source() {
        let raster = rasterize(&solid(50, 20, 255), 384, 200).unwrap();
        assert_eq!(raster.height(), 80);
        assert!(raster.pack().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_rasterize_black_full_width() {
        let raster = rasterize(&solid(10, 5, 0), 384, 384).unwrap();
        assert_eq!(raster.height(), 192);
        assert!(raster.pack().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_rasterize_black_non_multiple_width() {
        let raster = rasterize(&solid(4, 4, 0), 12, 12).unwrap();
        let packed = raster.pack();
        assert_eq!(packed.len(), 2 * 12);
        for row in packed.chunks(2) {
            assert_eq!(row, &[0xFF, 0xF0]);
        }
    }

    #[test]
    fn test_rasterize_centers_logo() {
        // 8-dot logo on a 24-dot head lands in the middle byte
        let raster = rasterize(&solid(8, 8, 0), 24, 8).unwrap();
        assert_eq!(raster.height(), 8);
        for row in raster.pack().chunks(3) {
            assert_eq!(row, &[0x00, 0xFF, 0x00]);
        }
    }

    #[test]
    fn test_rasterize_transparent_reads_white() {
        let clear = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0])));
        let raster = rasterize(&clear, 8, 8).unwrap();
        assert!(raster.pack().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_rasterize_zero_logo_height() {
        // 1000 x 1 scaled to 8 wide rounds down to zero rows
        let raster = rasterize(&solid(1000, 1, 0), 384, 8).unwrap();
        assert_eq!(raster.height(), 0);
        assert_eq!(
            raster.to_command().unwrap(),
            vec![0x1D, 0x76, 0x30, 0x00, 48, 0, 0, 0]
        );
    }

    #[test]
    fn test_rasterize_rejects_bad_dimensions() {
        let img = solid(10, 10, 0);
        assert!(matches!(
            rasterize(&img, 0, 0),
            Err(PrintError::RenderContext(_))
        ));
        assert!(matches!(
            rasterize(&img, 384, 0),
            Err(PrintError::RenderContext(_))
        ));
        assert!(matches!(
            rasterize(&img, 384, 400),
            Err(PrintError::RenderContext(_))
        ));
        assert!(matches!(
            rasterize(&solid(1, 100_000, 0), 384, 384),
            Err(PrintError::RenderContext(_))
        ));
    }

    #[test]
    fn test_command_length_and_header() {
        let raster = rasterize(&solid(30, 20, 255), 576, 300).unwrap();
        let cmd = raster.to_command().unwrap();

        // 20 * 300 / 30 = 200 rows
        assert_eq!(cmd.len(), 8 + 72 * 200);
        assert_eq!(&cmd[0..4], &[0x1D, 0x76, 0x30, 0x00]);
        assert_eq!(&cmd[4..6], &[72, 0]);
        assert_eq!(&cmd[6..8], &[200, 0]);
    }

    #[test]
    fn test_gray_preview() {
        let mut raster = RasterImage::new(2, 1);
        raster.set(0, 0, true);
        let gray = raster.to_gray_image();
        assert_eq!(gray.get_pixel(0, 0), &Luma([0]));
        assert_eq!(gray.get_pixel(1, 0), &Luma([255]));
    }
}
