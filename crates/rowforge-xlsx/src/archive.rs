//! ZIP container assembly
//!
//! Parts are written one at a time: creating a part closes the previous one,
//! and nothing is ever written back into a closed part.

use std::collections::HashSet;
use std::io::{self, Seek, Write};

use rowforge_core::CancellationToken;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{XlsxError, XlsxResult};

/// `[Content_Types].xml`
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
/// `xl/workbook.xml`
pub const WORKBOOK_PART: &str = "xl/workbook.xml";
/// `xl/styles.xml`
pub const STYLES_PART: &str = "xl/styles.xml";

const WORKSHEET_PREFIX: &str = "xl/worksheets/sheet";

/// Compression applied to an archive entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression
    Stored,
    /// Deflate level 1
    Fastest,
    /// Deflate level 6
    #[default]
    Balanced,
    /// Deflate level 9
    Maximum,
}

impl CompressionLevel {
    fn file_options(self) -> SimpleFileOptions {
        let (method, level): (CompressionMethod, Option<u8>) = match self {
            CompressionLevel::Stored => (CompressionMethod::Stored, None),
            CompressionLevel::Fastest => (CompressionMethod::Deflated, Some(1)),
            CompressionLevel::Balanced => (CompressionMethod::Deflated, Some(6)),
            CompressionLevel::Maximum => (CompressionMethod::Deflated, Some(9)),
        };
        SimpleFileOptions::default()
            .compression_method(method)
            .compression_level(level.map(Into::into))
    }
}

/// Owns the output stream and the lifecycle of its entries
pub struct Archive<W: Write + Seek> {
    zip: Option<ZipWriter<W>>,
    parts: HashSet<String>,
    open_part: Option<String>,
    cancel: Option<CancellationToken>,
}

impl<W: Write + Seek> Archive<W> {
    /// Start a new archive on `writer`
    pub fn new(writer: W) -> Self {
        Self {
            zip: Some(ZipWriter::new(writer)),
            parts: HashSet::new(),
            open_part: None,
            cancel: None,
        }
    }

    /// Check `token` whenever a part is closed
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Close the open part (if any) and start a new entry called `name`
    pub fn create_part(&mut self, name: &str, level: CompressionLevel) -> XlsxResult<()> {
        if self.zip.is_none() {
            return Err(XlsxError::ArchiveFinished);
        }
        if self.parts.contains(name) {
            return Err(XlsxError::DuplicatePart(name.to_string()));
        }
        self.close_part()?;

        let zip = self.zip.as_mut().ok_or(XlsxError::ArchiveFinished)?;
        log::debug!("creating part {} ({:?})", name, level);
        zip.start_file(name.to_string(), level.file_options())?;
        self.parts.insert(name.to_string());
        self.open_part = Some(name.to_string());
        Ok(())
    }

    /// Close the open part. A no-op when no part is open.
    pub fn close_part(&mut self) -> XlsxResult<()> {
        if let Some(token) = &self.cancel {
            token.check()?;
        }
        if let Some(name) = self.open_part.take() {
            log::trace!("closing part {}", name);
            if let Some(zip) = self.zip.as_mut() {
                zip.flush()?;
            }
        }
        Ok(())
    }

    /// Name of the part currently accepting writes
    pub fn open_part(&self) -> Option<&str> {
        self.open_part.as_deref()
    }

    /// Whether a part called `name` has been created
    pub fn contains_part(&self, name: &str) -> bool {
        self.parts.contains(name)
    }

    /// Whether [`finish`](Self::finish) has completed
    pub fn is_finished(&self) -> bool {
        self.zip.is_none()
    }

    fn missing_parts(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.contains_part(CONTENT_TYPES_PART) {
            missing.push("content types");
        }
        if !self.contains_part(WORKBOOK_PART) {
            missing.push("workbook");
        }
        if !self.parts.iter().any(|p| p.starts_with(WORKSHEET_PREFIX)) {
            missing.push("worksheet");
        }
        if !self.contains_part(STYLES_PART) {
            missing.push("styles");
        }
        missing
    }

    /// Close the last part, write the central directory and hand back the
    /// output stream
    ///
    /// Fails with [`XlsxError::IncompleteDocument`] if a mandatory part was
    /// never created.
    pub fn finish(&mut self) -> XlsxResult<W> {
        if self.zip.is_none() {
            return Err(XlsxError::ArchiveFinished);
        }
        let missing = self.missing_parts();
        if !missing.is_empty() {
            return Err(XlsxError::IncompleteDocument(format!(
                "missing {}",
                missing.join(", ")
            )));
        }
        self.close_part()?;

        let zip = self.zip.take().ok_or(XlsxError::ArchiveFinished)?;
        let writer = zip.finish()?;
        log::debug!("archive finished with {} parts", self.parts.len());
        Ok(writer)
    }
}

impl<W: Write + Seek> Write for Archive<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match (&self.open_part, self.zip.as_mut()) {
            (Some(_), Some(zip)) => zip.write(buf),
            _ => Err(io::Error::new(
                io::ErrorKind::Other,
                "no archive part is open for writing",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.zip.as_mut() {
            Some(zip) => zip.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write + Seek> std::fmt::Debug for Archive<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Archive")
            .field("parts", &self.parts.len())
            .field("open_part", &self.open_part)
            .field("finished", &self.zip.is_none())
            .finish()
    }
}
