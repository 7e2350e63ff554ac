//! # washprint CLI
//!
//! Command-line interface for laundry receipt printing.
//!
//! ## Usage
//!
//! ```bash
//! # Print the demo receipt on the default printer
//! washprint print
//!
//! # Print an order from JSON on an 80mm printer
//! washprint print --order order.json --shop shop.json --paper 80
//!
//! # Write the receipt bytes to a file instead of printing
//! washprint print --out receipt.bin
//!
//! # Convert a logo and preview it
//! washprint logo https://example.com/logo.png --png logo.png
//!
//! # Bind a paired printer to /dev/rfcomm0
//! sudo washprint bind 66:22:AA:BB:CC:DD
//! ```
//!
//! Set `RUST_LOG=debug` for transport details.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use washprint::{
    PrintError, PrinterConfig, PrinterProfile,
    receipt::{self, LaundryOrder, ShopInfo},
    render::{ImageLoader, bitmap},
    transport::{self, MemoryPort, bluetooth},
};

/// washprint - Laundry receipt printer utility
#[derive(Parser, Debug)]
#[command(name = "washprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print an order receipt
    Print {
        /// Order JSON file (demo order if omitted)
        #[arg(long, value_name = "FILE")]
        order: Option<PathBuf>,

        /// Shop JSON file (demo shop if omitted)
        #[arg(long, value_name = "FILE")]
        shop: Option<PathBuf>,

        /// Printer profile JSON file
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        /// Paper width in mm (58 or 80), overrides the profile
        #[arg(long)]
        paper: Option<u16>,

        /// Printer device path, overrides the profile
        #[arg(long)]
        device: Option<String>,

        /// Logo width in dots, overrides the profile
        #[arg(long)]
        logo_width: Option<u16>,

        /// Write the receipt bytes to a file instead of printing
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Convert a logo image to a raster bitmap command
    Logo {
        /// Image URL, data URI, or path
        source: String,

        /// Paper width in mm (58 or 80)
        #[arg(long, default_value = "58")]
        paper: u16,

        /// Logo width in dots (defaults to the paper preset's)
        #[arg(long)]
        logo_width: Option<u16>,

        /// Write the GS v 0 command bytes to a file
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Save a PNG preview of the thresholded bitmap
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },

    /// Find or create the RFCOMM device for a paired printer
    Bind {
        /// Printer Bluetooth address (XX:XX:XX:XX:XX:XX)
        mac: String,

        /// RFCOMM device number (/dev/rfcommN)
        #[arg(long, default_value = "0")]
        channel: u8,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), PrintError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Print {
            order,
            shop,
            profile,
            paper,
            device,
            logo_width,
            out,
        } => {
            let mut profile = match profile {
                Some(path) => PrinterProfile::load(&path)?,
                None => PrinterProfile::default(),
            };
            if let Some(paper) = paper {
                profile.paper = paper;
            }
            if device.is_some() {
                profile.device = device;
            }
            if logo_width.is_some() {
                profile.logo_width = logo_width;
            }
            let config = profile.config()?;

            let shop = match shop {
                Some(path) => ShopInfo::load(&path)?,
                None => receipt::demo_shop(),
            };
            let order = match order {
                Some(path) => LaundryOrder::load(&path)?,
                None => receipt::demo_order(),
            };

            let loader = ImageLoader::new()?;

            if let Some(out) = out {
                let mut port = MemoryPort::new();
                receipt::print_order(&mut port, &loader, &shop, &order, &config).await?;
                std::fs::write(&out, port.data())?;
                println!("Wrote {} bytes to {}", port.data().len(), out.display());
                return Ok(());
            }

            let device = profile
                .device
                .clone()
                .unwrap_or_else(|| bluetooth::DEFAULT_DEVICE.to_string());
            let mut port = transport::select_port(Some(&device));
            let report =
                receipt::print_order(port.as_mut(), &loader, &shop, &order, &config).await?;
            println!(
                "Printed order #{} ({} bytes{})",
                order.number,
                report.bytes,
                if report.logo_printed { ", with logo" } else { "" }
            );
        }

        Commands::Logo {
            source,
            paper,
            logo_width,
            out,
            png,
        } => {
            let config = PrinterConfig::from_paper_mm(paper).ok_or_else(|| {
                PrintError::Config(format!(
                    "Unsupported paper width {}mm (expected 58 or 80)",
                    paper
                ))
            })?;
            let logo_width = logo_width.unwrap_or(config.logo_width);

            let loader = ImageLoader::new()?;
            let image = loader.load(&source).await?;
            let raster =
                bitmap::rasterize(&image, config.width_dots as u32, logo_width as u32)?;
            let command = raster.to_command()?;
            info!(
                width = raster.width(),
                height = raster.height(),
                bytes = command.len(),
                "converted logo"
            );

            if let Some(out) = &out {
                std::fs::write(out, &command)?;
                println!("Wrote {} bytes to {}", command.len(), out.display());
            }
            if let Some(png) = &png {
                save_png(png, &raster)?;
                println!("Saved preview to {}", png.display());
            }
            if out.is_none() && png.is_none() {
                println!(
                    "{}x{} bitmap, {} bytes (use --out or --png to save)",
                    raster.width(),
                    raster.height(),
                    command.len()
                );
            }
        }

        Commands::Bind { mac, channel } => {
            if !bluetooth::is_valid_mac(&mac) {
                return Err(PrintError::Config(format!(
                    "'{}' is not a Bluetooth address (expected XX:XX:XX:XX:XX:XX)",
                    mac
                )));
            }
            let device = match bluetooth::find_rfcomm_for_mac(&mac)? {
                Some(existing) => {
                    info!(device = %existing, "already bound");
                    existing
                }
                None => bluetooth::setup_rfcomm(&mac, channel)?,
            };
            println!("{}", device);
        }
    }

    Ok(())
}

/// Save a bitmap preview as PNG
fn save_png(path: &Path, raster: &washprint::RasterImage) -> Result<(), PrintError> {
    raster
        .to_gray_image()
        .save(path)
        .map_err(|e| PrintError::Output(format!("Failed to save PNG {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_print_overrides() {
        let cli = Cli::parse_from([
            "washprint",
            "print",
            "--paper",
            "80",
            "--device",
            "/dev/rfcomm1",
            "--out",
            "r.bin",
        ]);
        match cli.command {
            Commands::Print {
                paper, device, out, ..
            } => {
                assert_eq!(paper, Some(80));
                assert_eq!(device.as_deref(), Some("/dev/rfcomm1"));
                assert_eq!(out, Some(PathBuf::from("r.bin")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_logo_defaults() {
        let cli = Cli::parse_from(["washprint", "logo", "logo.png"]);
        match cli.command {
            Commands::Logo {
                source,
                paper,
                logo_width,
                ..
            } => {
                assert_eq!(source, "logo.png");
                assert_eq!(paper, 58);
                assert_eq!(logo_width, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_save_png_failure_is_output_error() {
        let raster = washprint::RasterImage::new(8, 2);
        let err = save_png(Path::new("/nonexistent/washprint/preview.png"), &raster).unwrap_err();
        assert!(matches!(err, PrintError::Output(_)), "got {:?}", err);
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
