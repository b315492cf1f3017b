use std::io::Write;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::{
    image::{bitmap::Raster, header::Header},
    Bitmap, Error, Magic, MAX_RUN_SIZE, RUN_OVERFLOW_VALUE,
};

/// Pixels per line of `P1` text
const PBM_LINE: usize = 64;
/// Samples per line of `P2` text
const PGM_LINE: usize = 32;

/// Appends one run length, splitting runs too long for the two-byte form with empty runs of the
/// opposite color
fn push_run(buf_out: &mut Vec<u8>, mut run: usize) {
    let max = usize::from(MAX_RUN_SIZE);
    while run > max {
        push_run(buf_out, max);
        buf_out.push(0);
        run -= max;
    }
    match u8::try_from(run) {
        Ok(short) if short < RUN_OVERFLOW_VALUE => buf_out.push(short),
        _ => {
            let [hi, lo] = u16::try_from(run).unwrap_or(MAX_RUN_SIZE).to_be_bytes();
            buf_out.extend_from_slice(&[RUN_OVERFLOW_VALUE + hi, lo]);
        }
    }
}

/// Run-length encodes a single bilevel row, white first
pub(crate) fn compress_rle_row(to_compress: &[u8], compressed_buf: &mut Vec<u8>) {
    let mut color = 0;
    for (run, value) in to_compress
        .iter()
        .map(|p| u8::from(*p != 0))
        .dedup_with_count()
    {
        if value != color {
            // rows starting black open with an empty white run
            push_run(compressed_buf, 0);
            color = value;
        }
        push_run(compressed_buf, run);
        color = 1 - color;
    }
}

fn header(raster: &Raster, magic: Magic, maxval: Option<u16>) -> Header {
    Header::builder()
        .magic(magic)
        .cols(raster.cols())
        .rows(raster.rows())
        .maybe_maxval(maxval)
        .build()
}

fn ensure_bilevel(raster: &Raster, format: Magic) -> Result<(), Error> {
    if raster.grays() == 2 {
        Ok(())
    } else {
        Err(Error::TooManyGrays {
            grays: raster.grays(),
            format,
        })
    }
}

/// Writes a bilevel raster as `P4` when `raw`, `P1` otherwise
#[instrument(skip(raster, w), level = "trace")]
pub(crate) fn write_pbm(raster: &Raster, w: &mut impl Write, raw: bool) -> Result<(), Error> {
    let format = if raw { Magic::P4 } else { Magic::P1 };
    ensure_bilevel(raster, format)?;
    let wrap = |source| Error::Write { format, source };

    header(raster, format, None).write_to(w).map_err(wrap)?;
    let mut buf_out = Vec::new();
    let mut written = 0;
    for row in raster.rows_from_top() {
        if raw {
            buf_out.extend(row.chunks(8).map(|byte| {
                byte.iter()
                    .enumerate()
                    .fold(0u8, |b, (i, p)| b | (u8::from(*p != 0) << (7 - i)))
            }));
        } else {
            for line in row.chunks(PBM_LINE) {
                buf_out.extend(line.iter().map(|p| if *p == 0 { b'0' } else { b'1' }));
                buf_out.push(b'\n');
            }
        }
        w.write_all(&buf_out).map_err(wrap)?;
        written += buf_out.len();
        buf_out.clear();
    }
    debug!("wrote {written} bytes of {format} data");
    Ok(())
}

/// Writes a raster as `P5` when `raw`, `P2` otherwise, with `maxval = grays - 1`
#[instrument(skip(raster, w), level = "trace")]
pub(crate) fn write_pgm(raster: &Raster, w: &mut impl Write, raw: bool) -> Result<(), Error> {
    let format = if raw { Magic::P5 } else { Magic::P2 };
    let wrap = |source| Error::Write { format, source };
    let maxval = raster.grays() - 1;
    let black = u8::try_from(maxval).unwrap_or(u8::MAX);

    header(raster, format, Some(maxval)).write_to(w).map_err(wrap)?;
    let mut buf_out = Vec::new();
    let mut written = 0;
    for row in raster.rows_from_top() {
        let samples = row.iter().map(|p| black.saturating_sub(*p));
        if raw {
            buf_out.extend(samples);
        } else {
            for line in &samples.chunks(PGM_LINE) {
                writeln!(buf_out, "{}", line.format(" ")).map_err(wrap)?;
            }
        }
        w.write_all(&buf_out).map_err(wrap)?;
        written += buf_out.len();
        buf_out.clear();
    }
    debug!("wrote {written} bytes of {format} data");
    Ok(())
}

/// Writes a bilevel raster as `R4`, bottom row first
#[instrument(skip(raster, w), level = "trace")]
pub(crate) fn write_rle(raster: &Raster, w: &mut impl Write) -> Result<(), Error> {
    let format = Magic::R4;
    ensure_bilevel(raster, format)?;
    if raster.rows() == 0 || raster.cols() == 0 {
        return Err(Error::EmptyBitmap(format));
    }
    let wrap = |source| Error::Write { format, source };

    header(raster, format, None).write_to(w).map_err(wrap)?;
    let mut compressed_buf = Vec::new();
    for row in 0..raster.rows() {
        compress_rle_row(raster.row(i32::from(row)), &mut compressed_buf);
    }
    w.write_all(&compressed_buf).map_err(wrap)?;
    debug!("wrote {} bytes of {format} data", compressed_buf.len());
    Ok(())
}

impl Bitmap {
    /// Writes the bitmap as `P4` when `raw`, `P1` otherwise.
    ///
    /// Rows are written from the top of the image down.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyGrays`] unless the bitmap has two gray levels, and
    /// [`Error::Write`] if the writer fails.
    pub fn write_pbm(&self, w: &mut impl Write, raw: bool) -> Result<(), Error> {
        write_pbm(&self.read(), w, raw)
    }

    /// Writes the bitmap as `P5` when `raw`, `P2` otherwise.
    ///
    /// The maxval is `grays - 1` and each sample is `grays - 1 - pixel`, so that black is zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the writer fails.
    pub fn write_pgm(&self, w: &mut impl Write, raw: bool) -> Result<(), Error> {
        write_pgm(&self.read(), w, raw)
    }

    /// Writes the bitmap as `R4`
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyGrays`] unless the bitmap has two gray levels,
    /// [`Error::EmptyBitmap`] if it has no pixel, and [`Error::Write`] if the writer fails.
    pub fn write_rle(&self, w: &mut impl Write) -> Result<(), Error> {
        write_rle(&self.read(), w)
    }

    /// Writes the bitmap in the format named by `magic`
    ///
    /// # Errors
    ///
    /// See [`Self::write_pbm`], [`Self::write_pgm`] and [`Self::write_rle`].
    pub fn save(&self, w: &mut impl Write, magic: Magic) -> Result<(), Error> {
        let raster = self.read();
        match magic {
            Magic::P1 => write_pbm(&raster, w, false),
            Magic::P4 => write_pbm(&raster, w, true),
            Magic::P2 => write_pgm(&raster, w, false),
            Magic::P5 => write_pgm(&raster, w, true),
            Magic::R4 => write_rle(&raster, w),
        }
    }
}
