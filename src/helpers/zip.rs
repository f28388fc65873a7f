//! ZIP archive helper utilities for writing Excel (.xlsx) packages

use crate::error::DataCleanerError;
use crate::helpers::xml::XmlWriter;
use std::io::Seek;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

/// Helper trait for ZIP archive operations with package part writers
pub(crate) trait ZipHelper<W: Write + Seek> {
    /// Adds a part with fixed content
    fn write_part(&mut self, name: &str, content: &[u8]) -> Result<(), DataCleanerError>;

    /// Adds an XML part whose content is produced by `build`
    fn write_xml_part<F>(&mut self, name: &str, build: F) -> Result<(), DataCleanerError>
    where
        F: FnOnce(&mut XmlWriter<&mut ZipWriter<W>>) -> Result<(), DataCleanerError>;
}

fn part_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

impl<W: Write + Seek> ZipHelper<W> for ZipWriter<W> {
    fn write_part(&mut self, name: &str, content: &[u8]) -> Result<(), DataCleanerError> {
        self.start_file(name, part_options())?;
        self.write_all(content)?;
        Ok(())
    }

    fn write_xml_part<F>(&mut self, name: &str, build: F) -> Result<(), DataCleanerError>
    where
        F: FnOnce(&mut XmlWriter<&mut ZipWriter<W>>) -> Result<(), DataCleanerError>,
    {
        self.start_file(name, part_options())?;
        let mut writer = XmlWriter::new(self);
        writer.declaration()?;
        build(&mut writer)
    }
}
