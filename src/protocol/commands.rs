//! # ESC/POS Basic Commands
//!
//! Prefix bytes plus the setup, feed and cut commands a receipt needs.
//! Byte values match the generic 58mm/80mm Bluetooth printers sold for shop
//! counters.
//!
//! Sequences are one control byte (`LF`), a prefix and a letter (`ESC @`), or
//! a prefix, a letter and parameters (`ESC a n`, `GS V m n`). Two-byte
//! numeric parameters go low byte first, see [`u16_le`].

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// Prefix for text and setup commands.
pub const ESC: u8 = 0x1B;

/// Prefix for the cutter and `GS v 0` raster commands.
pub const GS: u8 = 0x1D;

/// Print the pending line and advance one line.
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Puts the printer back in its power-on state. Each receipt opens with it so
/// bold or alignment from the last job cannot carry over.
///
/// | Hex   | Decimal |
/// |-------|---------|
/// | 1B 40 | 27 64   |
///
/// Clears the line buffer, turns bold off and left-aligns.
///
/// ```
/// use washprint::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// CUTTER CONTROL COMMANDS
// ============================================================================

/// # Full Cut (GS V A 0)
///
/// | Hex         | Decimal    |
/// |-------------|------------|
/// | 1D 56 41 00 | 29 86 65 0 |
///
/// `A` advances the paper to the blade before cutting; the trailing 0 adds
/// no extra feed. Cutterless printers skip it.
///
/// ```
/// use washprint::protocol::commands;
///
/// assert_eq!(commands::cut_full(), vec![0x1D, 0x56, 0x41, 0x00]);
/// ```
#[inline]
pub fn cut_full() -> Vec<u8> {
    vec![GS, b'V', b'A', 0]
}

// ============================================================================
// PAPER FEED COMMANDS
// ============================================================================

/// `n` line feeds.
///
/// ```
/// use washprint::protocol::commands;
///
/// assert_eq!(commands::feed_lines(3), vec![0x0A, 0x0A, 0x0A]);
/// assert!(commands::feed_lines(0).is_empty());
/// ```
#[inline]
pub fn feed_lines(n: usize) -> Vec<u8> {
    vec![LF; n]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// `[low, high]`, the order of the `xL xH yL yH` raster fields.
///
/// ```
/// use washprint::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(576), [0x40, 0x02]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================
