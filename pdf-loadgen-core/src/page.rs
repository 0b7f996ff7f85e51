use crate::text::{Font, TextContext};
use std::collections::BTreeSet;

/// A single page in a PDF document.
///
/// Pages have a size (width and height in points) and a text layer.
///
/// # Example
///
/// ```rust
/// use pdf_loadgen::{Font, Page};
///
/// let mut page = Page::letter();
///
/// page.text()
///     .set_font(Font::Helvetica, 12.0)
///     .at(40.0, 750.0)
///     .write("Hello World")?;
/// # Ok::<(), pdf_loadgen::LoadgenError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Page {
    width: f64,
    height: f64,
    text_context: TextContext,
}

impl Page {
    /// Creates a new page with the specified width and height in points.
    ///
    /// Points are 1/72 of an inch.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            text_context: TextContext::new(),
        }
    }

    /// Creates a new A4 page (595 x 842 points).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// Creates a new US Letter page (612 x 792 points).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Returns a mutable reference to the text context for adding text.
    pub fn text(&mut self) -> &mut TextContext {
        &mut self.text_context
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn is_blank(&self) -> bool {
        self.text_context.is_empty()
    }

    pub(crate) fn fonts_used(&self) -> &BTreeSet<Font> {
        self.text_context.fonts_used()
    }

    pub(crate) fn content(&self) -> &[u8] {
        self.text_context.operations()
    }
}
