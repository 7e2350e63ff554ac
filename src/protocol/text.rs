//! # ESC/POS Text Styling Commands
//!
//! Alignment and emphasis, the two text effects receipts rely on.
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Alignment | ESC a n | Left / center / right |
//! | Bold | ESC E n | **Emphasized** text |
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! Right aligned             |      RIGHT TEXT
//! ```

use super::commands::ESC;

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// # Set Text Alignment (ESC a n)
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
/// | Decimal | 27 97 n  |
///
/// ## Parameters
///
/// - `n = 0`: Left alignment (default)
/// - `n = 1`: Center alignment
/// - `n = 2`: Right alignment
///
/// Takes effect at the start of the next line and also positions raster
/// images on most printers.
///
/// ## Example
///
/// ```
/// use washprint::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
#[inline]
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

/// Left alignment (ESC a 0)
#[inline]
pub fn align_left() -> Vec<u8> {
    align(Alignment::Left)
}

/// Center alignment (ESC a 1)
#[inline]
pub fn align_center() -> Vec<u8> {
    align(Alignment::Center)
}

/// Right alignment (ESC a 2)
#[inline]
pub fn align_right() -> Vec<u8> {
    align(Alignment::Right)
}

// ============================================================================
// EMPHASIS
// ============================================================================

/// # Set Emphasized Mode (ESC E n)
///
/// | Format  | Bytes   |
/// |---------|---------|
/// | ASCII   | ESC E n |
/// | Hex     | 1B 45 n |
///
/// Only the lowest bit of `n` is significant: 1 turns bold on, 0 off.
#[inline]
pub fn bold(enabled: bool) -> Vec<u8> {
    vec![ESC, b'E', enabled as u8]
}

/// Bold on (ESC E 1)
#[inline]
pub fn bold_on() -> Vec<u8> {
    bold(true)
}

/// Bold off (ESC E 0)
#[inline]
pub fn bold_off() -> Vec<u8> {
    bold(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment() {
        assert_eq!(align_left(), vec![0x1B, 0x61, 0x00]);
        assert_eq!(align_center(), vec![0x1B, 0x61, 0x01]);
        assert_eq!(align_right(), vec![0x1B, 0x61, 0x02]);
    }

    #[test]
    fn test_alignment_default_is_left() {
        assert_eq!(Alignment::default(), Alignment::Left);
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold_on(), vec![0x1B, 0x45, 0x01]);
        assert_eq!(bold_off(), vec![0x1B, 0x45, 0x00]);
        assert_eq!(bold(true), bold_on());
    }
}
