#[cfg(feature = "compression")]
use crate::error::LoadgenError;
use crate::error::Result;
use crate::objects::{Dictionary, Object};

#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    dictionary: Dictionary,
    data: Vec<u8>,
}

impl Stream {
    pub fn new(data: Vec<u8>) -> Self {
        let mut dictionary = Dictionary::new();
        dictionary.set("Length", data.len() as i64);

        Self { dictionary, data }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.dictionary.set("Filter", Object::name(filter));
    }

    #[cfg(feature = "compression")]
    pub fn compress_flate(&mut self) -> Result<()> {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&self.data)
            .map_err(|e| LoadgenError::CompressionError(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| LoadgenError::CompressionError(e.to_string()))?;

        self.data = compressed;
        self.dictionary.set("Length", self.data.len() as i64);
        self.set_filter("FlateDecode");

        Ok(())
    }

    #[cfg(not(feature = "compression"))]
    pub fn compress_flate(&mut self) -> Result<()> {
        Err(crate::error::LoadgenError::CompressionError(
            "built without the `compression` feature".to_string(),
        ))
    }
}
