//! Hex preview of relayed frames for console diagnostics

use core::fmt;

/// Number of leading bytes shown in a preview
pub const PREVIEW_LEN: usize = 16;

/// Lowercase, space-separated hex of the first [`PREVIEW_LEN`] bytes of a frame
///
/// ```
/// use liftbridge_protocol::HexPreview;
///
/// let frame = [0x55, 0xAA, 0xE3, 0xE3, 0xE3];
/// assert_eq!(format!("{}", HexPreview::new(&frame)), "55 aa e3 e3 e3");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HexPreview<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> HexPreview<'a> {
    pub fn new(frame: &'a [u8]) -> Self {
        Self {
            bytes: &frame[..frame.len().min(PREVIEW_LEN)],
            total: frame.len(),
        }
    }

    /// Bytes included in the preview
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// True when the frame was longer than the preview
    pub fn is_truncated(&self) -> bool {
        self.total > self.bytes.len()
    }

    /// Previewed bytes, each paired with the separator printed before it
    fn tokens(&self) -> impl Iterator<Item = (&'static str, u8)> + 'a {
        let bytes = self.bytes;
        bytes
            .iter()
            .enumerate()
            .map(|(i, &byte)| (if i == 0 { "" } else { " " }, byte))
    }
}

impl fmt::Display for HexPreview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (sep, byte) in self.tokens() {
            write!(f, "{}{:02x}", sep, byte)?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HexPreview<'_> {
    fn format(&self, f: defmt::Formatter) {
        for (sep, byte) in self.tokens() {
            defmt::write!(f, "{=str}{=u8:02x}", sep, byte);
        }
    }
}
