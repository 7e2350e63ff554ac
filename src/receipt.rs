//! # Laundry Receipts
//!
//! Order data, receipt layout, and the print job that ties the logo
//! converter, the command builder, and a printer port together.
//!
//! ```text
//! ShopInfo + LaundryOrder ──compose_receipt──► ESC/POS bytes ──► PrinterPort
//!        │                        ▲
//!        └── logo source ──► GS v 0 (or text-only on failure)
//! ```

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{info, warn};

use crate::builder::EscPosBuilder;
use crate::error::PrintError;
use crate::printer::PrinterConfig;
use crate::render::{ImageLoader, image_to_raster_command};
use crate::transport::PrinterPort;

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

// ============================================================================
// DATA MODEL
// ============================================================================

/// The shop printed at the top and bottom of every receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopInfo {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub footer: Option<String>,
    /// Prefix for amounts, e.g. "$" or "Rp "
    #[serde(default)]
    pub currency: String,
    /// URL, data URI, or path of the logo
    #[serde(default)]
    pub logo: Option<String>,
}

/// One service line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// e.g. "Wash & Fold", "Dry Clean - Suit"
    pub service: String,
    pub quantity: f64,
    /// e.g. "kg", "pcs"
    #[serde(default = "default_unit")]
    pub unit: String,
    pub unit_price: f64,
}

fn default_unit() -> String {
    "pcs".to_string()
}

impl OrderItem {
    pub fn subtotal(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// A laundry order as handed over at the counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaundryOrder {
    pub number: String,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub received_at: NaiveDateTime,
    #[serde(default)]
    pub due_at: Option<NaiveDateTime>,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub paid: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LaundryOrder {
    /// Sum of item subtotals less the discount, never below zero.
    pub fn total(&self) -> f64 {
        let gross: f64 = self.items.iter().map(OrderItem::subtotal).sum();
        (gross - self.discount).max(0.0)
    }

    /// What the customer still owes at pickup.
    pub fn balance(&self) -> f64 {
        (self.total() - self.paid).max(0.0)
    }
}

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, PrintError> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json)
        .map_err(|e| PrintError::Config(format!("Invalid {} in {}: {}", what, path.display(), e)))
}

impl ShopInfo {
    pub fn load(path: &Path) -> Result<Self, PrintError> {
        load_json(path, "shop")
    }
}

impl LaundryOrder {
    pub fn load(path: &Path) -> Result<Self, PrintError> {
        load_json(path, "order")
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Lay out `left` and `right` on one line of `width` columns.
///
/// The right side is kept whole; the left is truncated if both don't fit
/// with at least one space between them.
pub fn two_columns(left: &str, right: &str, width: usize) -> String {
    let right_len = right.chars().count();
    let left_max = width.saturating_sub(right_len + 1);
    let left: String = left.chars().take(left_max).collect();
    let padding = width.saturating_sub(left.chars().count() + right_len).max(1);
    format!("{}{}{}", left, " ".repeat(padding), right)
}

fn money(currency: &str, amount: f64) -> String {
    format!("{}{:.2}", currency, amount)
}

fn quantity(q: f64) -> String {
    if q.fract() == 0.0 {
        format!("{}", q as i64)
    } else {
        format!("{:.2}", q)
    }
}

/// Compose the full receipt.
///
/// `logo` is a ready `GS v 0` command; pass `None` for a text-only receipt.
pub fn compose_receipt(
    shop: &ShopInfo,
    order: &LaundryOrder,
    config: &PrinterConfig,
    logo: Option<&[u8]>,
) -> Vec<u8> {
    let width = config.columns;
    let mut b = EscPosBuilder::new();
    b.character_width(width).initialize();

    b.align_center();
    if let Some(logo) = logo {
        b.raw(logo).feed(1);
    }
    b.bold(true).text(&shop.name).feed(1).bold(false);
    if let Some(address) = &shop.address {
        b.text(address).feed(1);
    }
    if let Some(phone) = &shop.phone {
        b.text(phone).feed(1);
    }

    b.align_left().horizontal_rule().feed(1);
    b.text(&two_columns("Order", &format!("#{}", order.number), width))
        .feed(1);
    b.text(&two_columns("Customer", &order.customer_name, width))
        .feed(1);
    if let Some(phone) = &order.customer_phone {
        b.text(&two_columns("Phone", phone, width)).feed(1);
    }
    b.text(&two_columns(
        "Received",
        &order.received_at.format(DATE_FORMAT).to_string(),
        width,
    ))
    .feed(1);
    if let Some(due) = order.due_at {
        b.text(&two_columns("Ready", &due.format(DATE_FORMAT).to_string(), width))
            .feed(1);
    }

    b.horizontal_rule().feed(1);
    for item in &order.items {
        b.text(&item.service).feed(1);
        let detail = format!(
            "  {} {} x {}",
            quantity(item.quantity),
            item.unit,
            money(&shop.currency, item.unit_price)
        );
        b.text(&two_columns(&detail, &money(&shop.currency, item.subtotal()), width))
            .feed(1);
    }

    b.horizontal_rule().feed(1);
    if order.discount != 0.0 {
        b.text(&two_columns(
            "Discount",
            &format!("-{}", money(&shop.currency, order.discount)),
            width,
        ))
        .feed(1);
    }
    b.bold(true)
        .text(&two_columns("TOTAL", &money(&shop.currency, order.total()), width))
        .feed(1)
        .bold(false);
    b.text(&two_columns("Paid", &money(&shop.currency, order.paid), width))
        .feed(1);
    b.text(&two_columns("Balance", &money(&shop.currency, order.balance()), width))
        .feed(1);

    if let Some(notes) = &order.notes {
        b.horizontal_rule().feed(1);
        b.text(&format!("Notes: {}", notes)).feed(1);
    }

    if let Some(footer) = &shop.footer {
        b.feed(1).align_center().text(footer).feed(1);
    }

    b.feed(3).cut();
    b.encode()
}

// ============================================================================
// PRINT JOB
// ============================================================================

/// What a print job did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintReport {
    pub bytes: usize,
    pub logo_printed: bool,
}

/// Render the shop logo for `config`, or `None` if there is none or it fails.
pub async fn render_logo(
    loader: &ImageLoader,
    shop: &ShopInfo,
    config: &PrinterConfig,
) -> Option<Vec<u8>> {
    let source = shop.logo.as_deref().filter(|s| !s.is_empty())?;
    match image_to_raster_command(
        loader,
        source,
        config.width_dots as u32,
        config.logo_width as u32,
    )
    .await
    {
        Ok(cmd) => Some(cmd),
        Err(e) => {
            warn!(error = %e, "logo failed to render, printing text-only receipt");
            None
        }
    }
}

/// Print an order receipt on `port`.
pub async fn print_order(
    port: &mut dyn PrinterPort,
    loader: &ImageLoader,
    shop: &ShopInfo,
    order: &LaundryOrder,
    config: &PrinterConfig,
) -> Result<PrintReport, PrintError> {
    if !port.is_available() {
        return Err(PrintError::Unavailable(format!(
            "cannot print order #{} on {}",
            order.number,
            port.name()
        )));
    }

    let logo = render_logo(loader, shop, config).await;
    let data = compose_receipt(shop, order, config, logo.as_deref());

    info!(
        order = %order.number,
        port = port.name(),
        bytes = data.len(),
        logo = logo.is_some(),
        "printing receipt"
    );
    port.write_all(&data)?;

    Ok(PrintReport {
        bytes: data.len(),
        logo_printed: logo.is_some(),
    })
}

// ============================================================================
// DEMO DATA
// ============================================================================

/// Shop used when none is configured.
pub fn demo_shop() -> ShopInfo {
    ShopInfo {
        name: "FRESH & CLEAN LAUNDRY".to_string(),
        address: Some("12 Market Street".to_string()),
        phone: Some("0812-3456-7890".to_string()),
        footer: Some("Thank you! Pick up within 30 days.".to_string()),
        currency: "$".to_string(),
        logo: None,
    }
}

/// Order used when none is given.
pub fn demo_order() -> LaundryOrder {
    let received = NaiveDate::from_ymd_opt(2026, 1, 20)
        .and_then(|day| day.and_hms_opt(9, 30, 0))
        .unwrap_or_default();
    LaundryOrder {
        number: "A-0042".to_string(),
        customer_name: "Dana".to_string(),
        customer_phone: Some("0813-0000-1111".to_string()),
        received_at: received,
        due_at: Some(received + chrono::Duration::days(2)),
        items: vec![
            OrderItem {
                service: "Wash & Fold".to_string(),
                quantity: 3.5,
                unit: "kg".to_string(),
                unit_price: 2.00,
            },
            OrderItem {
                service: "Dry Clean - Suit".to_string(),
                quantity: 1.0,
                unit: "pcs".to_string(),
                unit_price: 12.50,
            },
        ],
        discount: 1.00,
        paid: 10.00,
        notes: Some("Separate whites".to_string()),
    }
}
