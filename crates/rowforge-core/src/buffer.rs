//! Fixed-capacity write-ahead buffer
//!
//! Every byte of every document part passes through a single [`ByteBuffer`]
//! owned by the session. The buffer never performs I/O on its own; callers
//! pass the destination sink into the operations that may need to flush.

use std::io::Write;

use crate::cancel::CancellationToken;
use crate::error::{Error, Result};

/// Smallest capacity a buffer may be created with.
///
/// The helpers below request spans of at most this many bytes (the longest
/// XML entity, a formatted `i64` or a formatted `f64`).
pub const MIN_CAPACITY: usize = 32;

/// Whether `c` survives [`ByteBuffer::write_escaped`] unchanged or as an entity.
///
/// XML 1.0 allows tab, LF and CR among the C0 controls and excludes the
/// noncharacters U+FFFE and U+FFFF.
pub fn is_xml_char(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => false,
        _ => true,
    }
}

/// Reusable byte buffer with explicit span/commit semantics
#[derive(Debug)]
pub struct ByteBuffer {
    data: Box<[u8]>,
    used: usize,
    cancel: Option<CancellationToken>,
}

impl ByteBuffer {
    /// Allocate a buffer holding `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity < MIN_CAPACITY {
            return Err(Error::invalid_value(format!(
                "buffer capacity {} is below the minimum of {}",
                capacity, MIN_CAPACITY
            )));
        }
        Ok(Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            used: 0,
            cancel: None,
        })
    }

    /// Attach a cancellation token checked on every flush
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Total capacity in bytes
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Committed bytes not yet flushed
    pub fn used(&self) -> usize {
        self.used
    }

    /// Bytes that can still be committed before a flush is needed
    pub fn free_capacity(&self) -> usize {
        self.data.len() - self.used
    }

    /// Committed bytes not yet flushed
    pub fn committed(&self) -> &[u8] {
        &self.data[..self.used]
    }

    /// Return a writable span of at least `min_size` bytes.
    ///
    /// Flushes to `sink` first when the free capacity is too small. Asking
    /// for more than the total capacity is a configuration error.
    pub fn request_span<W: Write + ?Sized>(
        &mut self,
        min_size: usize,
        sink: &mut W,
    ) -> Result<&mut [u8]> {
        if min_size > self.data.len() {
            return Err(Error::Capacity {
                requested: min_size,
                capacity: self.data.len(),
            });
        }
        if self.free_capacity() < min_size {
            self.flush(sink)?;
        }
        Ok(&mut self.data[self.used..])
    }

    /// Commit the first `n` bytes of the last span returned by
    /// [`request_span`](Self::request_span).
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the free capacity.
    pub fn advance(&mut self, n: usize) {
        assert!(
            n <= self.free_capacity(),
            "advance({}) past the end of the buffer ({} free)",
            n,
            self.free_capacity()
        );
        self.used += n;
    }

    /// Write all committed bytes to `sink` and reset the buffer.
    pub fn flush<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<()> {
        if let Some(token) = &self.cancel {
            token.check()?;
        }
        if self.used == 0 {
            return Ok(());
        }
        log::trace!("flushing {} buffered bytes", self.used);
        sink.write_all(&self.data[..self.used])?;
        self.used = 0;
        Ok(())
    }

    /// Copy `bytes` into the buffer, flushing as often as needed.
    ///
    /// Input may be longer than the capacity.
    pub fn write_bytes<W: Write + ?Sized>(&mut self, mut bytes: &[u8], sink: &mut W) -> Result<()> {
        while !bytes.is_empty() {
            if self.free_capacity() == 0 {
                self.flush(sink)?;
            }
            let n = bytes.len().min(self.free_capacity());
            self.data[self.used..self.used + n].copy_from_slice(&bytes[..n]);
            self.used += n;
            bytes = &bytes[n..];
        }
        Ok(())
    }

    /// Copy a string verbatim (no escaping)
    pub fn write_str<W: Write + ?Sized>(&mut self, s: &str, sink: &mut W) -> Result<()> {
        self.write_bytes(s.as_bytes(), sink)
    }

    /// Write a short fragment that must not be split across flushes
    fn write_small<W: Write + ?Sized>(&mut self, bytes: &[u8], sink: &mut W) -> Result<()> {
        let span = self.request_span(bytes.len(), sink)?;
        span[..bytes.len()].copy_from_slice(bytes);
        self.advance(bytes.len());
        Ok(())
    }

    /// Write text escaped for XML element content and attribute values.
    ///
    /// The five reserved characters become entities and characters that are
    /// not allowed in XML 1.0 (C0 controls other than tab/LF/CR, U+FFFE and
    /// U+FFFF) are dropped.
    pub fn write_escaped<W: Write + ?Sized>(&mut self, text: &str, sink: &mut W) -> Result<()> {
        let bytes = text.as_bytes();
        let mut start = 0;
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            let (replacement, width): (&[u8], usize) = match b {
                b'<' => (b"&lt;".as_slice(), 1),
                b'>' => (b"&gt;".as_slice(), 1),
                b'&' => (b"&amp;".as_slice(), 1),
                b'"' => (b"&quot;".as_slice(), 1),
                b'\'' => (b"&apos;".as_slice(), 1),
                b'\t' | b'\n' | b'\r' => {
                    i += 1;
                    continue;
                }
                0x00..=0x1F => (b"".as_slice(), 1),
                // U+FFFE and U+FFFF encode as EF BF BE / EF BF BF
                0xEF if bytes.get(i + 1) == Some(&0xBF)
                    && matches!(bytes.get(i + 2), Some(0xBE) | Some(0xBF)) =>
                {
                    (b"".as_slice(), 3)
                }
                _ => {
                    i += 1;
                    continue;
                }
            };
            self.write_bytes(&bytes[start..i], sink)?;
            if !replacement.is_empty() {
                self.write_small(replacement, sink)?;
            }
            i += width;
            start = i;
        }
        self.write_bytes(&bytes[start..], sink)
    }

    /// Write an unsigned integer in decimal
    pub fn write_u32<W: Write + ?Sized>(&mut self, value: u32, sink: &mut W) -> Result<()> {
        let mut fmt = itoa::Buffer::new();
        self.write_small(fmt.format(value).as_bytes(), sink)
    }

    /// Write a signed integer in decimal
    pub fn write_i64<W: Write + ?Sized>(&mut self, value: i64, sink: &mut W) -> Result<()> {
        let mut fmt = itoa::Buffer::new();
        self.write_small(fmt.format(value).as_bytes(), sink)
    }

    /// Write a floating-point number using locale-independent formatting.
    ///
    /// Integral values below 10^15 are written without a fractional part.
    pub fn write_f64<W: Write + ?Sized>(&mut self, value: f64, sink: &mut W) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::UnsupportedValue("non-finite number"));
        }
        if value.fract() == 0.0 && value.abs() < 1e15 {
            return self.write_i64(value as i64, sink);
        }
        let mut fmt = ryu::Buffer::new();
        self.write_small(fmt.format_finite(value).as_bytes(), sink)
    }
}
