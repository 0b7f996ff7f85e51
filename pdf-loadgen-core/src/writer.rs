use crate::document::Document;
use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId, Stream};
use crate::page::Page;
use crate::text::{escape_literal, Font};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::trace;

/// Options that change how a document is serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterConfig {
    /// Flate-compress page content streams.
    pub compress_streams: bool,
}

/// Serializes a [`Document`] as a classic PDF 1.7 file: header, indirect
/// objects, cross-reference table and trailer.
pub struct PdfWriter<W: Write> {
    writer: W,
    config: WriterConfig,
    xref_positions: BTreeMap<u32, u64>,
    current_position: u64,
    next_object_number: u32,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W, config: WriterConfig) -> Self {
        Self {
            writer,
            config,
            xref_positions: BTreeMap::new(),
            current_position: 0,
            next_object_number: 1,
        }
    }

    pub fn write_document(&mut self, document: &Document) -> Result<()> {
        self.write_header()?;

        let catalog_id = self.allocate_id();
        let pages_id = self.allocate_id();

        self.write_catalog(catalog_id, pages_id)?;
        let font_ids = self.write_fonts(document.fonts_used())?;
        self.write_pages(pages_id, &document.pages, &font_ids)?;
        let info_id = self.write_info(document)?;

        let xref_position = self.current_position;
        self.write_xref()?;
        self.write_trailer(catalog_id, info_id, xref_position)?;

        self.writer.flush()?;
        Ok(())
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_object_number, 0);
        self.next_object_number += 1;
        id
    }

    fn write_header(&mut self) -> Result<()> {
        self.write_bytes(b"%PDF-1.7\n")?;
        // Binary comment to ensure file is treated as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    fn write_catalog(&mut self, catalog_id: ObjectId, pages_id: ObjectId) -> Result<()> {
        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::name("Catalog"));
        catalog.set("Pages", pages_id);

        self.write_object(catalog_id, &Object::Dictionary(catalog))
    }

    fn write_fonts(
        &mut self,
        fonts: impl IntoIterator<Item = Font>,
    ) -> Result<HashMap<Font, ObjectId>> {
        let mut font_ids = HashMap::new();

        for font in fonts {
            let font_id = self.allocate_id();

            let mut font_dict = Dictionary::new();
            font_dict.set("Type", Object::name("Font"));
            font_dict.set("Subtype", Object::name("Type1"));
            font_dict.set("BaseFont", Object::name(font.pdf_name()));
            if !font.is_symbolic() {
                font_dict.set("Encoding", Object::name("WinAnsiEncoding"));
            }

            self.write_object(font_id, &Object::Dictionary(font_dict))?;
            font_ids.insert(font, font_id);
        }

        Ok(font_ids)
    }

    fn write_pages(
        &mut self,
        pages_id: ObjectId,
        pages: &[Page],
        font_ids: &HashMap<Font, ObjectId>,
    ) -> Result<()> {
        let page_ids: Vec<(ObjectId, ObjectId)> = pages
            .iter()
            .map(|_| (self.allocate_id(), self.allocate_id()))
            .collect();

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::name("Pages"));
        pages_dict.set("Count", pages.len() as i64);
        pages_dict.set(
            "Kids",
            page_ids
                .iter()
                .map(|(page_id, _)| Object::Reference(*page_id))
                .collect::<Vec<_>>(),
        );
        self.write_object(pages_id, &Object::Dictionary(pages_dict))?;

        for (index, (page, (page_id, content_id))) in pages.iter().zip(page_ids).enumerate() {
            self.write_page(page_id, pages_id, content_id, page, font_ids)?;
            self.write_page_content(content_id, page)?;
            trace!(page = index + 1, "page written");
        }

        Ok(())
    }

    fn write_page(
        &mut self,
        page_id: ObjectId,
        parent_id: ObjectId,
        content_id: ObjectId,
        page: &Page,
        font_ids: &HashMap<Font, ObjectId>,
    ) -> Result<()> {
        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::name("Page"));
        page_dict.set("Parent", parent_id);
        page_dict.set(
            "MediaBox",
            vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width()),
                Object::Real(page.height()),
            ],
        );
        page_dict.set("Contents", content_id);

        let mut font_dict = Dictionary::new();
        for font in page.fonts_used() {
            if let Some(font_id) = font_ids.get(font) {
                font_dict.set(font.pdf_name(), *font_id);
            }
        }

        let mut resources = Dictionary::new();
        resources.set("Font", font_dict);
        page_dict.set("Resources", resources);

        self.write_object(page_id, &Object::Dictionary(page_dict))
    }

    fn write_page_content(&mut self, content_id: ObjectId, page: &Page) -> Result<()> {
        let mut stream = Stream::new(page.content().to_vec());
        if self.config.compress_streams {
            stream.compress_flate()?;
        }

        self.write_object(content_id, &Object::Stream(stream))
    }

    fn write_info(&mut self, document: &Document) -> Result<ObjectId> {
        let info_id = self.allocate_id();
        let metadata = document.metadata();
        let mut info_dict = Dictionary::new();

        if let Some(ref creator) = metadata.creator {
            info_dict.set("Creator", creator.as_str());
        }
        if let Some(ref producer) = metadata.producer {
            info_dict.set("Producer", producer.as_str());
        }
        if let Some(creation_date) = metadata.creation_date {
            info_dict.set("CreationDate", format_pdf_date(creation_date));
        }
        if let Some(mod_date) = metadata.modification_date {
            info_dict.set("ModDate", format_pdf_date(mod_date));
        }

        self.write_object(info_id, &Object::Dictionary(info_dict))?;
        Ok(info_id)
    }
}

impl PdfWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`.
    pub fn new(path: impl AsRef<Path>, config: WriterConfig) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new_with_writer(BufWriter::new(file), config))
    }
}

impl<W: Write> PdfWriter<W> {
    fn write_object(&mut self, id: ObjectId, object: &Object) -> Result<()> {
        self.xref_positions.insert(id.number(), self.current_position);

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;

        self.write_object_value(object)?;

        self.write_bytes(b"\nendobj\n")?;
        Ok(())
    }

    fn write_object_value(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Null => self.write_bytes(b"null")?,
            Object::Boolean(b) => self.write_bytes(if *b { b"true" } else { b"false" })?,
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes())?,
            Object::Real(f) => self.write_bytes(
                format!("{f:.6}")
                    .trim_end_matches('0')
                    .trim_end_matches('.')
                    .as_bytes(),
            )?,
            Object::String(s) => {
                let mut escaped = String::with_capacity(s.len() + 2);
                escaped.push('(');
                escape_literal(s, &mut escaped);
                escaped.push(')');
                self.write_bytes(escaped.as_bytes())?;
            }
            Object::Name(n) => {
                self.write_bytes(b"/")?;
                self.write_bytes(n.as_bytes())?;
            }
            Object::Array(arr) => {
                self.write_bytes(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ")?;
                    }
                    self.write_object_value(obj)?;
                }
                self.write_bytes(b"]")?;
            }
            Object::Dictionary(dict) => {
                self.write_bytes(b"<<")?;
                for (key, value) in dict.entries() {
                    self.write_bytes(b"\n/")?;
                    self.write_bytes(key.as_bytes())?;
                    self.write_bytes(b" ")?;
                    self.write_object_value(value)?;
                }
                self.write_bytes(b"\n>>")?;
            }
            Object::Stream(stream) => {
                self.write_object_value(&Object::Dictionary(stream.dictionary().clone()))?;
                self.write_bytes(b"\nstream\n")?;
                self.write_bytes(stream.data())?;
                self.write_bytes(b"\nendstream")?;
            }
            Object::Reference(id) => {
                self.write_bytes(id.to_string().as_bytes())?;
            }
        }
        Ok(())
    }

    fn write_xref(&mut self) -> Result<()> {
        let max_obj_num = self.xref_positions.keys().next_back().copied().unwrap_or(0);

        self.write_bytes(format!("xref\n0 {}\n", max_obj_num + 1).as_bytes())?;
        self.write_bytes(b"0000000000 65535 f \n")?;

        // Gaps become free entries
        for obj_num in 1..=max_obj_num {
            let entry = match self.xref_positions.get(&obj_num) {
                Some(position) => format!("{position:010} 00000 n \n"),
                None => "0000000000 00000 f \n".to_string(),
            };
            self.write_bytes(entry.as_bytes())?;
        }

        Ok(())
    }

    fn write_trailer(
        &mut self,
        catalog_id: ObjectId,
        info_id: ObjectId,
        xref_position: u64,
    ) -> Result<()> {
        let max_obj_num = self.xref_positions.keys().next_back().copied().unwrap_or(0);

        let mut trailer = Dictionary::new();
        trailer.set("Size", (max_obj_num + 1) as i64);
        trailer.set("Root", catalog_id);
        trailer.set("Info", info_id);

        self.write_bytes(b"trailer\n")?;
        self.write_object_value(&Object::Dictionary(trailer))?;
        self.write_bytes(format!("\nstartxref\n{xref_position}\n%%EOF\n").as_bytes())?;

        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSS+00'00)
fn format_pdf_date(date: DateTime<Utc>) -> String {
    format!("{}+00'00", date.format("D:%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io;

    fn written(document: &Document) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut writer = PdfWriter::new_with_writer(&mut buffer, WriterConfig::default());
            writer.write_document(document).unwrap();
        }
        buffer
    }

    fn text_page(line: &str) -> Page {
        let mut page = Page::letter();
        page.text()
            .set_font(Font::Helvetica, 12.0)
            .at(40.0, 750.0)
            .write(line)
            .unwrap();
        page
    }

    #[test]
    fn test_write_header() {
        let mut buffer = Vec::new();
        let mut writer = PdfWriter::new_with_writer(&mut buffer, WriterConfig::default());

        writer.write_header().unwrap();

        assert!(buffer.starts_with(b"%PDF-1.7\n"));
        assert_eq!(buffer.len(), 15);
        assert_eq!(&buffer[9..], &[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);
    }

    #[test]
    fn test_write_bytes_tracks_position() {
        let mut buffer = Vec::new();
        {
            let mut writer = PdfWriter::new_with_writer(&mut buffer, WriterConfig::default());
            writer.write_bytes(b"Hello").unwrap();
            assert_eq!(writer.current_position, 5);
            writer.write_bytes(b" World").unwrap();
            assert_eq!(writer.current_position, 11);
        }
        assert_eq!(buffer, b"Hello World");
    }

    #[test]
    fn test_write_object_values() {
        let mut buffer = Vec::new();
        {
            let mut writer = PdfWriter::new_with_writer(&mut buffer, WriterConfig::default());
            let array = Object::Array(vec![
                Object::Integer(0),
                Object::Real(612.0),
                Object::Real(0.5),
                Object::Boolean(true),
                Object::Null,
                Object::from("a(b)"),
                Object::Reference(ObjectId::new(7, 0)),
            ]);
            writer.write_object(ObjectId::new(5, 0), &array).unwrap();
        }

        let content = String::from_utf8(buffer).unwrap();
        assert_eq!(
            content,
            "5 0 obj\n[0 612 0.5 true null (a\\(b\\)) 7 0 R]\nendobj\n"
        );
    }

    #[test]
    fn test_write_xref_fills_gaps() {
        let mut buffer = Vec::new();
        {
            let mut writer = PdfWriter::new_with_writer(&mut buffer, WriterConfig::default());
            writer.xref_positions.insert(1, 15);
            writer.xref_positions.insert(3, 152);
            writer.write_xref().unwrap();
        }

        let content = String::from_utf8(buffer).unwrap();
        assert_eq!(
            content,
            "xref\n0 4\n\
             0000000000 65535 f \n\
             0000000015 00000 n \n\
             0000000000 00000 f \n\
             0000000152 00000 n \n"
        );
    }

    #[test]
    fn test_write_trailer() {
        let mut buffer = Vec::new();
        {
            let mut writer = PdfWriter::new_with_writer(&mut buffer, WriterConfig::default());
            writer.xref_positions.insert(1, 15);
            writer.xref_positions.insert(2, 94);
            writer
                .write_trailer(ObjectId::new(1, 0), ObjectId::new(2, 0), 1234)
                .unwrap();
        }

        let content = String::from_utf8(buffer).unwrap();
        assert!(content.contains("/Size 3"));
        assert!(content.contains("/Root 1 0 R"));
        assert!(content.contains("/Info 2 0 R"));
        assert!(content.ends_with("startxref\n1234\n%%EOF\n"));
    }

    #[test]
    fn test_format_pdf_date() {
        let date = Utc.with_ymd_and_hms(2023, 12, 25, 15, 30, 45).unwrap();
        assert_eq!(format_pdf_date(date), "D:20231225153045+00'00");
    }

    #[test]
    fn test_complete_document_structure() {
        let mut document = Document::new();
        document.add_page(text_page("first"));
        document.add_page(text_page("second"));

        let buffer = written(&document);
        let content = String::from_utf8_lossy(&buffer);

        assert!(buffer.starts_with(b"%PDF-1.7\n"));
        assert!(buffer.ends_with(b"%%EOF\n"));
        assert!(content.contains("/Type /Catalog"));
        assert!(content.contains("/Type /Pages"));
        assert!(content.contains("/Count 2"));
        assert!(content.contains("/MediaBox [0 0 612 792]"));
        assert!(content.contains("/BaseFont /Helvetica"));
        assert!(content.contains("/Encoding /WinAnsiEncoding"));
        assert!(content.contains("(first) Tj"));
        assert!(content.contains("(second) Tj"));
        // One shared font object, not one per page
        assert_eq!(content.matches("/Type /Font").count(), 1);
        assert!(content.contains("/Producer (pdf_loadgen v"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut document = Document::new();
        for i in 0..60 {
            document.add_page(text_page(&format!("line {i}")));
        }

        let buffer = written(&document);
        // Everything after the 15 byte header is ASCII
        let header_len = 15;
        let body = std::str::from_utf8(&buffer[header_len..]).unwrap();
        let at = |offset: usize| &body[offset - header_len..];

        let startxref = body.rfind("startxref\n").unwrap();
        let xref_offset: usize = body[startxref + 10..]
            .lines()
            .next()
            .unwrap()
            .parse()
            .unwrap();
        assert!(at(xref_offset).starts_with("xref\n"));

        // 1 catalog + 1 pages + 1 font + 60 * (page + content) + 1 info
        let expected_objects = 3 + 60 * 2 + 1;
        assert!(body.contains(&format!("/Size {}", expected_objects + 1)));

        let entries: Vec<&str> = at(xref_offset).lines().skip(3).collect();
        for (index, entry) in entries.iter().take(expected_objects).enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let header = format!("{} 0 obj\n", index + 1);
            assert!(
                at(offset).starts_with(&header),
                "xref entry {} does not point at its object",
                index + 1
            );
        }
    }

    #[test]
    fn test_blank_page_has_no_font_resources() {
        let mut document = Document::new();
        document.add_page(Page::letter());

        let content = String::from_utf8_lossy(&written(&document)).into_owned();
        assert!(!content.contains("/Type /Font"));
        assert!(content.contains("/Length 0"));
    }

    #[cfg(feature = "compression")]
    #[test]
    fn test_compressed_streams() {
        let mut document = Document::new();
        document.add_page(text_page(&"a".repeat(500)));

        let mut buffer = Vec::new();
        {
            let config = WriterConfig {
                compress_streams: true,
            };
            let mut writer = PdfWriter::new_with_writer(&mut buffer, config);
            writer.write_document(&document).unwrap();
        }

        let content = String::from_utf8_lossy(&buffer);
        assert!(content.contains("/Filter /FlateDecode"));
        assert!(!content.contains(&"a".repeat(500)));
    }

    struct FailingWriter {
        remaining: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_propagates() {
        let mut document = Document::new();
        document.add_page(text_page("will not fit"));

        let mut writer =
            PdfWriter::new_with_writer(FailingWriter { remaining: 64 }, WriterConfig::default());
        let error = writer.write_document(&document).unwrap_err();
        assert!(error.to_string().contains("disk full"));
    }
}
