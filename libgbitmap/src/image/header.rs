use bon::Builder;
use std::io::{self, BufRead, Write};
use strum::{Display, EnumString, IntoStaticStr};
use tracing::trace;

use crate::{
    stream::{ByteReader, FormatError},
    Error, Stage,
};

/// The two magic bytes opening a bitmap stream
#[derive(Debug, Display, EnumString, IntoStaticStr, Eq, PartialEq, Hash, Copy, Clone)]
pub enum Magic {
    /// PBM, one `'0'` or `'1'` character per pixel
    P1,
    /// PGM, one decimal sample per pixel
    P2,
    /// PBM, eight pixels per byte, most significant bit first
    P4,
    /// PGM, one or two bytes per pixel
    P5,
    /// Run-length encoded bilevel data
    R4,
}

impl Magic {
    /// Looks up the format named by two magic bytes
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::BadMagic`] for any pair other than `P1`, `P2`, `P4`, `P5` or `R4`.
    pub fn from_bytes(bytes: [u8; 2]) -> Result<Self, FormatError> {
        std::str::from_utf8(&bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(FormatError::BadMagic(bytes))
    }

    /// The two magic bytes
    #[must_use]
    pub fn as_bytes(self) -> &'static [u8] {
        <&'static str>::from(self).as_bytes()
    }

    /// Whether the format carries gray levels, and therefore a maxval
    #[must_use]
    pub const fn is_gray(self) -> bool {
        matches!(self, Self::P2 | Self::P5)
    }

    /// Whether the pixel data is binary rather than text
    #[must_use]
    pub const fn is_raw(self) -> bool {
        matches!(self, Self::P4 | Self::P5 | Self::R4)
    }
}

/// Header of a bitmap stream
///
/// ```text
/// <magic> <columns> <rows> [<maxval>]
/// ```
///
/// Fields are separated by blanks and may be interleaved with `#` comments. Only the gray
/// formats (`P2`, `P5`) have a maxval.
#[derive(Debug, Eq, PartialEq, Clone, Builder)]
#[non_exhaustive]
pub struct Header {
    /// Format of the pixel data
    pub magic: Magic,
    /// Width of the image in pixels
    pub cols: u16,
    /// Height of the image in pixels
    pub rows: u16,
    /// Largest sample value of a gray image
    pub maxval: Option<u16>,
}

impl Header {
    /// Reads the magic number and the image extent, leaving the maxval for later
    pub(crate) fn read_extent<R: BufRead>(stream: &mut ByteReader<R>) -> Result<Self, Error> {
        let mut magic = [0; 2];
        stream.read_exact(&mut magic, Stage::Magic)?;
        let magic = Magic::from_bytes(magic).map_err(|e| Error::format(Stage::Magic, e))?;
        let cols = read_dimension(stream, Stage::Columns)?;
        let rows = read_dimension(stream, Stage::Rows)?;
        Ok(Self {
            magic,
            cols,
            rows,
            maxval: None,
        })
    }

    /// Reads the maxval of a gray format and returns it
    pub(crate) fn read_maxval<R: BufRead>(
        &mut self,
        stream: &mut ByteReader<R>,
    ) -> Result<u16, Error> {
        let maxval = stream.integer(Stage::Maxval)?;
        let maxval = u16::try_from(maxval)
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| Error::format(Stage::Maxval, FormatError::BadMaxval(maxval)))?;
        trace!("maxval {maxval}");
        self.maxval = Some(maxval);
        Ok(maxval)
    }

    /// Number of gray levels a bitmap needs to hold the samples of this header
    #[must_use]
    pub fn grays(&self) -> u16 {
        self.maxval.map_or(2, |m| m.min(255) + 1)
    }

    /// Writes the header in its text form, ending with the single newline that separates it
    /// from the pixel data
    ///
    /// # Errors
    ///
    /// Returns any error of the underlying writer.
    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        write!(w, "{}\n{} {}\n", self.magic, self.cols, self.rows)?;
        if let Some(maxval) = self.maxval {
            writeln!(w, "{maxval}")?;
        }
        Ok(())
    }
}

fn read_dimension<R: BufRead>(stream: &mut ByteReader<R>, stage: Stage) -> Result<u16, Error> {
    let value = stream.integer(stage)?;
    u16::try_from(value).map_err(|_| Error::format(stage, FormatError::DimensionTooLarge(value)))
}
