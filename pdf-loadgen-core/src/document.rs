use crate::error::Result;
use crate::page::Page;
use crate::text::Font;
use crate::writer::{PdfWriter, WriterConfig};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::path::Path;

/// A PDF document made of pages and an info dictionary.
///
/// # Example
///
/// ```rust,no_run
/// use pdf_loadgen::{Document, Page};
///
/// let mut doc = Document::new();
/// doc.add_page(Page::letter());
/// doc.save("output.pdf").unwrap();
/// ```
pub struct Document {
    pub(crate) pages: Vec<Page>,
    pub(crate) metadata: DocumentMetadata,
}

/// Info dictionary entries written for every document.
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    /// Software that created the original document
    pub creator: Option<String>,
    /// Software that produced the PDF
    pub producer: Option<String>,
    /// Date and time the document was created
    pub creation_date: Option<DateTime<Utc>>,
    /// Date and time the document was last modified
    pub modification_date: Option<DateTime<Utc>>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            creator: Some("pdf_loadgen".to_string()),
            producer: Some(format!("pdf_loadgen v{}", env!("CARGO_PKG_VERSION"))),
            creation_date: Some(now),
            modification_date: Some(now),
        }
    }
}

impl Document {
    /// Creates a new empty PDF document.
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            metadata: DocumentMetadata::default(),
        }
    }

    /// Adds a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Gets the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Sets the document creation date.
    pub fn set_creation_date(&mut self, date: DateTime<Utc>) {
        self.metadata.creation_date = Some(date);
    }

    /// Sets the modification date to the current time.
    pub fn update_modification_date(&mut self) {
        self.metadata.modification_date = Some(Utc::now());
    }

    /// Distinct fonts referenced by any page, in a stable order.
    pub(crate) fn fonts_used(&self) -> BTreeSet<Font> {
        self.pages
            .iter()
            .flat_map(|page| page.fonts_used().iter().copied())
            .collect()
    }

    /// Saves the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with_config(path, WriterConfig::default())
    }

    /// Saves the document to a file with explicit writer options.
    pub fn save_with_config(&mut self, path: impl AsRef<Path>, config: WriterConfig) -> Result<()> {
        self.update_modification_date();

        let mut writer = PdfWriter::new(path, config)?;
        writer.write_document(self)?;
        Ok(())
    }

    /// Writes the document to a buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the PDF cannot be generated.
    pub fn write(&mut self, buffer: &mut Vec<u8>) -> Result<()> {
        self.update_modification_date();

        let mut writer = PdfWriter::new_with_writer(buffer, WriterConfig::default());
        writer.write_document(self)?;
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
