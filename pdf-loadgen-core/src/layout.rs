//! Fixed-geometry pagination of a text blob.
//!
//! The text is cut into chunks of [`PageGeometry::chars_per_line`] characters.
//! Each chunk becomes one line at the left margin, every line sits
//! [`PageGeometry::line_height`] points below the previous one, and a new page
//! starts after [`PageGeometry::lines_per_page`] lines. Lines are never wrapped:
//! a chunk wider than the page runs past the right edge.

use crate::document::Document;
use crate::error::{LoadgenError, Result};
use crate::page::Page;
use crate::text::Font;
use crate::writer::WriterConfig;
use std::path::Path;
use tracing::trace;

/// Layout constants for generated pages. Distances are in points.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub left_margin: f64,
    /// Baseline of the first line on every page, measured from the bottom.
    pub top_offset: f64,
    pub line_height: f64,
    pub lines_per_page: usize,
    pub chars_per_line: usize,
    pub font: Font,
    pub font_size: f64,
}

impl Default for PageGeometry {
    /// US Letter, Helvetica 12, 100 characters per line, 50 lines per page.
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            left_margin: 40.0,
            top_offset: 750.0,
            line_height: 14.0,
            lines_per_page: 50,
            chars_per_line: 100,
            font: Font::Helvetica,
            font_size: 12.0,
        }
    }
}

impl PageGeometry {
    pub fn validate(&self) -> Result<()> {
        if self.chars_per_line == 0 {
            return Err(LoadgenError::InvalidStructure(
                "chars_per_line must be at least 1".to_string(),
            ));
        }
        if self.lines_per_page == 0 {
            return Err(LoadgenError::InvalidStructure(
                "lines_per_page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Baseline of the zero-based `line` within a page.
    pub fn line_y(&self, line: usize) -> f64 {
        self.top_offset - line as f64 * self.line_height
    }

    /// Number of lines needed for `char_count` characters.
    pub fn line_count(&self, char_count: usize) -> usize {
        char_count.div_ceil(self.chars_per_line)
    }

    /// Number of pages needed for `char_count` characters. Never zero.
    pub fn page_count(&self, char_count: usize) -> usize {
        self.line_count(char_count)
            .div_ceil(self.lines_per_page)
            .max(1)
    }

    fn new_page(&self) -> Page {
        Page::new(self.page_width, self.page_height)
    }
}

/// Splits `text` into pieces of at most `size` characters.
fn char_chunks(text: &str, size: usize) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let split = rest
            .char_indices()
            .nth(size)
            .map_or(rest.len(), |(index, _)| index);
        let (chunk, tail) = rest.split_at(split);
        rest = tail;
        Some(chunk)
    })
}

/// Lays `text` out over as many pages as `geometry` requires.
///
/// Empty text yields a single blank page.
pub fn lay_out_text(text: &str, geometry: &PageGeometry) -> Result<Document> {
    geometry.validate()?;

    let mut document = Document::new();
    let mut page = geometry.new_page();
    let mut line = 0;

    for chunk in char_chunks(text, geometry.chars_per_line) {
        page.text()
            .set_font(geometry.font, geometry.font_size)
            .at(geometry.left_margin, geometry.line_y(line))
            .write(chunk)?;
        line += 1;

        if line >= geometry.lines_per_page {
            document.add_page(std::mem::replace(&mut page, geometry.new_page()));
            line = 0;
        }
    }

    // A full last page was already pushed; don't leave a trailing blank one.
    if line > 0 || document.page_count() == 0 {
        document.add_page(page);
    }

    trace!(pages = document.page_count(), chars = text.len(), "text laid out");
    Ok(document)
}

/// Lays out `text` and writes it to `path`, creating or truncating the file.
/// Returns the number of pages written.
pub fn write_text_pdf(
    path: impl AsRef<Path>,
    text: &str,
    geometry: &PageGeometry,
    config: WriterConfig,
) -> Result<usize> {
    let mut document = lay_out_text(text, geometry)?;
    document.save_with_config(path, config)?;
    Ok(document.page_count())
}
