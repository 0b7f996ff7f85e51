//! # pdf-loadgen
//!
//! Generates batches of PDF documents filled with random text, sized to a
//! requested range, for load-testing document management systems.
//!
//! ## Features
//!
//! - **Batch generation**: N files, each with a random size in a MB range
//! - **Random filler**: uniformly drawn letters, digits and spaces
//! - **Paginated text**: fixed Letter geometry, 100 characters per line, 50 lines per page
//! - **Native writer**: PDF 1.7 objects, xref table and trailer written directly
//! - **Progress hooks**: plug any [`ProgressReporter`] into a run
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_loadgen::{BatchConfig, BatchGenerator, GenerationRequest, SilentProgress};
//!
//! # fn main() -> pdf_loadgen::Result<()> {
//! let request = GenerationRequest {
//!     count: 3,
//!     min_size_mb: 1,
//!     max_size_mb: 2,
//!     name_pattern: "TEST".to_string(),
//!     output_dir: "./pdfs".into(),
//! };
//!
//! let summary = BatchGenerator::new(request, BatchConfig::default()).run(&mut SilentProgress)?;
//! println!("{} files, {} bytes", summary.len(), summary.total_bytes());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`batch`] - Batch orchestration and progress reporting
//! - [`content`] - Random filler text
//! - [`naming`] - Output file names
//! - [`layout`] - Page geometry and pagination
//! - [`document`], [`page`], [`text`] - Document model
//! - [`writer`] - Low-level PDF writing
//! - [`objects`] - PDF object model

pub mod batch;
pub mod content;
pub mod document;
pub mod error;
pub mod layout;
pub mod naming;
pub mod objects;
pub mod page;
pub mod text;
pub mod writer;

pub use batch::{
    generate_batch, mb_to_bytes, BatchConfig, BatchGenerator, BatchSummary, DocumentJob,
    GeneratedFile, GenerationRequest, ProgressReporter, SilentProgress, BYTES_PER_MB,
};
pub use content::{random_text, ALPHABET};
pub use document::{Document, DocumentMetadata};
pub use error::{LoadgenError, Result};
pub use layout::{lay_out_text, write_text_pdf, PageGeometry};
pub use naming::file_name;
pub use page::Page;
pub use text::{Font, TextContext};
pub use writer::{PdfWriter, WriterConfig};

/// Current version of pdf-loadgen
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_create_page() {
        let page = Page::new(595.0, 842.0);
        assert_eq!(page.width(), 595.0);
        assert_eq!(page.height(), 842.0);
    }
}
