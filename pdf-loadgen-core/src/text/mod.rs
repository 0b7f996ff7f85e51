mod font;

pub use font::Font;

use crate::error::Result;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Accumulates text-showing operators for one page content stream.
///
/// Every call to [`TextContext::write`] emits a self-contained `BT ... ET`
/// block at the current position.
#[derive(Clone, Debug)]
pub struct TextContext {
    operations: String,
    current_font: Font,
    font_size: f64,
    position: (f64, f64),
    fonts_used: BTreeSet<Font>,
}

impl Default for TextContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TextContext {
    pub fn new() -> Self {
        Self {
            operations: String::new(),
            current_font: Font::Helvetica,
            font_size: 12.0,
            position: (0.0, 0.0),
            fonts_used: BTreeSet::new(),
        }
    }

    pub fn set_font(&mut self, font: Font, size: f64) -> &mut Self {
        self.current_font = font;
        self.font_size = size;
        self
    }

    pub fn at(&mut self, x: f64, y: f64) -> &mut Self {
        self.position = (x, y);
        self
    }

    pub fn write(&mut self, text: &str) -> Result<&mut Self> {
        self.fonts_used.insert(self.current_font);

        self.operations.push_str("BT\n");
        let _ = writeln!(
            self.operations,
            "/{} {} Tf",
            self.current_font.pdf_name(),
            self.font_size
        );
        let _ = writeln!(
            self.operations,
            "{:.2} {:.2} Td",
            self.position.0, self.position.1
        );

        self.operations.push('(');
        escape_literal(text, &mut self.operations);
        self.operations.push_str(") Tj\n");
        self.operations.push_str("ET\n");

        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub(crate) fn fonts_used(&self) -> &BTreeSet<Font> {
        &self.fonts_used
    }

    pub(crate) fn operations(&self) -> &[u8] {
        self.operations.as_bytes()
    }
}

/// Writes `text` as the body of a PDF literal string.
///
/// Standard fonts are single-byte, so anything outside Latin-1 becomes `?`
/// and non-printable bytes are written as octal escapes.
pub(crate) fn escape_literal(text: &str, out: &mut String) {
    for ch in text.chars() {
        let byte = u8::try_from(u32::from(ch)).unwrap_or(b'?');
        match byte {
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7E => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
}
