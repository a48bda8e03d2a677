//! Image embedding helper
//!
//! Only the header is inspected: PNG dimensions are read from the IHDR chunk
//! and anything else is stored as an opaque `.bin` part of size 0×0.

use std::io::{self, Read, Write};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Bytes inspected before the rest of the stream is copied
pub const HEADER_LEN: usize = 24;

/// Image formats recognised from their header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Unknown,
}

impl ImageFormat {
    /// File extension of the media part
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Unknown => "bin",
        }
    }

    /// Content type registered for the extension
    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Unknown => "application/octet-stream",
        }
    }
}

/// An image stored in the package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    /// Width in pixels (0 when unknown)
    pub width: u32,
    /// Height in pixels (0 when unknown)
    pub height: u32,
    /// Archive part holding the image bytes
    pub part_name: String,
}

/// The first bytes of an image stream
#[derive(Debug, Clone)]
pub struct ImageHeader {
    bytes: [u8; HEADER_LEN],
    len: usize,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageHeader {
    /// Read up to [`HEADER_LEN`] bytes from `reader` and sniff the format
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; HEADER_LEN];
        let mut len = 0;
        while len < HEADER_LEN {
            match reader.read(&mut bytes[len..]) {
                Ok(0) => break,
                Ok(n) => len += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }

        let mut header = Self {
            bytes,
            len,
            format: ImageFormat::Unknown,
            width: 0,
            height: 0,
        };
        if len == HEADER_LEN && bytes[..8] == PNG_SIGNATURE {
            header.format = ImageFormat::Png;
            header.width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
            header.height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        }
        Ok(header)
    }

    /// Bytes consumed while sniffing
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Write the header followed by the rest of `reader` to `sink`
    pub fn copy_with<R, W>(&self, reader: &mut R, sink: &mut W) -> io::Result<u64>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        sink.write_all(self.bytes())?;
        let rest = io::copy(reader, sink)?;
        Ok(self.len as u64 + rest)
    }
}

/// Part name of the `index`th (1-based) image
pub fn media_part_name(index: usize, format: ImageFormat) -> String {
    format!("xl/media/image{}.{}", index, format.extension())
}
