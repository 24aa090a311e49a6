//! Byte formatters used for node labels in exported graphs.

use crate::to_hex;

/// Turns raw bytes into a display label.
pub trait ByteFormatter {
    fn format(&self, bytes: &[u8]) -> String;
}

/// Shows only the leading and trailing hex characters of long values.
#[derive(Debug, Default, Clone, Copy)]
pub struct TruncatedHexFormatter;

impl ByteFormatter for TruncatedHexFormatter {
    fn format(&self, bytes: &[u8]) -> String {
        to_hex(bytes)
    }
}

/// Shows the entire value as lowercase hex.
#[derive(Debug, Default, Clone, Copy)]
pub struct HexFormatter;

impl ByteFormatter for HexFormatter {
    fn format(&self, bytes: &[u8]) -> String {
        hex::encode(bytes)
    }
}

/// Shows the value as UTF-8, replacing invalid sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8Formatter;

impl ByteFormatter for Utf8Formatter {
    fn format(&self, bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

impl<F: ByteFormatter + ?Sized> ByteFormatter for &F {
    fn format(&self, bytes: &[u8]) -> String {
        (*self).format(bytes)
    }
}
