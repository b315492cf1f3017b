use std::io::{self, BufRead, ErrorKind};

use super::FormatError;
use crate::{Error, Stage};

/// Serial reader of single bytes and byte chunks over a [`BufRead`] source.
///
/// The reader never pulls more out of the source than it hands out, so whatever follows the
/// bitmap data stays in the source's own buffer.
#[derive(Debug)]
pub struct ByteReader<R> {
    inner: R,
}

impl<R: BufRead> ByteReader<R> {
    /// Wraps a byte source
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns the wrapped source
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Reads the next byte, or `None` at the end of data
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the source fails.
    pub fn next_byte(&mut self, stage: Stage) -> Result<Option<u8>, Error> {
        loop {
            let b = match self.inner.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => buf[0],
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io(stage, e)),
            };
            self.inner.consume(1);
            return Ok(Some(b));
        }
    }

    /// Reads the next byte, treating the end of data as an error
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the source fails or has no byte left.
    pub fn byte(&mut self, stage: Stage) -> Result<u8, Error> {
        self.next_byte(stage)?
            .ok_or_else(|| Error::io(stage, io::Error::from(ErrorKind::UnexpectedEof)))
    }

    /// Fills `buf` completely
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the source fails or ends before `buf` is full.
    pub fn read_exact(&mut self, buf: &mut [u8], stage: Stage) -> Result<(), Error> {
        self.inner
            .read_exact(buf)
            .map_err(|e| Error::io(stage, e))
    }

    /// Reads an unsigned decimal integer.
    ///
    /// Spaces, tabs, carriage returns, line feeds and `#` comments (running to the end of the
    /// line) before the digits are skipped. The first byte after the digits is consumed as well,
    /// which is the single whitespace byte separating a header from raw pixel data. Data may end
    /// right after the digits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the data ends before a digit is found, and [`Error::Format`]
    /// if something other than a digit follows the blanks or the value overflows 32 bits.
    pub fn integer(&mut self, stage: Stage) -> Result<u32, Error> {
        let mut c = self.byte(stage)?;
        loop {
            match c {
                b' ' | b'\t' | b'\r' | b'\n' => c = self.byte(stage)?,
                b'#' => {
                    while !matches!(self.byte(stage)?, b'\n' | b'\r') {}
                    c = self.byte(stage)?;
                }
                _ => break,
            }
        }
        if !c.is_ascii_digit() {
            return Err(Error::format(stage, FormatError::NotAnInteger(c)));
        }
        let mut value = 0u32;
        loop {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(c - b'0')))
                .ok_or_else(|| Error::format(stage, FormatError::IntegerOverflow))?;
            match self.next_byte(stage)? {
                Some(d) if d.is_ascii_digit() => c = d,
                _ => return Ok(value),
            }
        }
    }
}
