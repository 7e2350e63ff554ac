//! # ESC/POS Command Builder
//!
//! An append-only byte buffer with chained operations for composing a
//! receipt. Every operation appends to the buffer and returns the builder,
//! so a whole receipt reads as one expression:
//!
//! ```
//! use washprint::EscPosBuilder;
//!
//! let mut builder = EscPosBuilder::new();
//! builder
//!     .initialize()
//!     .align_center()
//!     .bold(true)
//!     .text("FRESH & CLEAN LAUNDRY")
//!     .bold(false)
//!     .feed(1)
//!     .horizontal_rule()
//!     .feed(3)
//!     .cut();
//!
//! let bytes = builder.encode();
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! assert!(bytes.ends_with(&[0x1D, 0x56, 0x41, 0x00]));
//! ```
//!
//! Nothing here validates printer capability or fails. Text is passed through
//! as UTF-8 bytes; a cut is expected to be the last thing appended.

use crate::protocol::{commands, text};

/// Text columns of a 58mm printer with the default font
pub const DEFAULT_CHARACTER_WIDTH: usize = 32;

/// Chainable ESC/POS command builder.
///
/// Not meant to be shared: use one builder per receipt.
#[derive(Debug, Clone)]
pub struct EscPosBuilder {
    buffer: Vec<u8>,
    character_width: usize,
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EscPosBuilder {
    /// Create an empty builder with the default character width (32).
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            character_width: DEFAULT_CHARACTER_WIDTH,
        }
    }

    /// Reset the printer (`ESC @`).
    pub fn initialize(&mut self) -> &mut Self {
        self.buffer.extend(commands::init());
        self
    }

    /// Center subsequent lines (`ESC a 1`).
    pub fn align_center(&mut self) -> &mut Self {
        self.buffer.extend(text::align_center());
        self
    }

    /// Left-align subsequent lines (`ESC a 0`).
    pub fn align_left(&mut self) -> &mut Self {
        self.buffer.extend(text::align_left());
        self
    }

    /// Right-align subsequent lines (`ESC a 2`).
    pub fn align_right(&mut self) -> &mut Self {
        self.buffer.extend(text::align_right());
        self
    }

    /// Toggle emphasized printing (`ESC E n`).
    pub fn bold(&mut self, enabled: bool) -> &mut Self {
        self.buffer.extend(text::bold(enabled));
        self
    }

    /// Append literal text.
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.buffer.extend_from_slice(s.as_bytes());
        self
    }

    /// Append raw bytes, e.g. a bitmap command. The caller vouches for them.
    pub fn raw(&mut self, bytes: impl AsRef<[u8]>) -> &mut Self {
        self.buffer.extend_from_slice(bytes.as_ref());
        self
    }

    /// Append `n` line feeds.
    pub fn feed(&mut self, n: usize) -> &mut Self {
        self.buffer.extend(commands::feed_lines(n));
        self
    }

    /// Append a dash for every text column. No line feed follows.
    pub fn horizontal_rule(&mut self) -> &mut Self {
        self.buffer
            .extend(std::iter::repeat_n(b'-', self.character_width));
        self
    }

    /// Feed to the cutter and cut (`GS V A 0`).
    pub fn cut(&mut self) -> &mut Self {
        self.buffer.extend(commands::cut_full());
        self
    }

    /// Set the column count used by [`horizontal_rule`](Self::horizontal_rule).
    pub fn character_width(&mut self, width: usize) -> &mut Self {
        self.character_width = width;
        self
    }

    /// Current column count.
    pub fn columns(&self) -> usize {
        self.character_width
    }

    /// Accumulated bytes. The buffer is left intact.
    pub fn encode(&self) -> Vec<u8> {
        self.buffer.clone()
    }

    /// Return to the state of a fresh builder: empty buffer, default width.
    pub fn reset(&mut self) -> &mut Self {
        self.buffer.clear();
        self.character_width = DEFAULT_CHARACTER_WIDTH;
        self
    }

    /// Bytes appended so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
