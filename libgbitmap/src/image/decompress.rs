use std::io::BufRead;

use itertools::Either;
use tracing::{trace, warn};

use crate::{
    image::bitmap::Raster,
    stream::{ByteReader, FormatError},
    Error, Stage, RUN_OVERFLOW_VALUE,
};

/// Order in which the rows of a payload are stored
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub(crate) enum RowOrder {
    /// First row of data is the top of the image, the last row of the raster
    TopDown,
    /// First row of data is row zero, the bottom of the image
    BottomUp,
}

pub(crate) trait PayloadDecoder {
    const ROW_ORDER: RowOrder = RowOrder::TopDown;

    /// Decodes the pixels of raster row `row` into `pixels`
    fn decode_row<R: BufRead>(
        &mut self,
        row: u16,
        pixels: &mut [u8],
        stream: &mut ByteReader<R>,
    ) -> Result<(), Error>;

    fn decode_into<R: BufRead>(
        &mut self,
        raster: &mut Raster,
        stream: &mut ByteReader<R>,
    ) -> Result<(), Error> {
        let rows = raster.rows();
        let order = match Self::ROW_ORDER {
            RowOrder::TopDown => Either::Left((0..rows).rev()),
            RowOrder::BottomUp => Either::Right(0..rows),
        };
        for row in order {
            if let Some(pixels) = raster.row_mut(row) {
                self.decode_row(row, pixels, stream)?;
            }
        }
        Ok(())
    }
}

/// Maps samples in `0..len` to gray levels, sample zero being black.
/// Samples above `maxval` map to white.
pub(crate) fn ramp(grays: u16, maxval: u16, len: usize) -> Vec<u8> {
    let (black, maxval) = (u32::from(grays - 1), u32::from(maxval));
    (0..len)
        .map(|i| {
            u32::try_from(i)
                .ok()
                .filter(|i| *i <= maxval)
                .map_or(0, |i| (black * (maxval - i) + maxval / 2) / maxval)
        })
        .map(|level| u8::try_from(level).unwrap_or(u8::MAX))
        .collect()
}

/// `P1`: one `'0'` or `'1'` per pixel, blanks ignored
pub(crate) struct PbmText;

impl PayloadDecoder for PbmText {
    fn decode_row<R: BufRead>(
        &mut self,
        row: u16,
        pixels: &mut [u8],
        stream: &mut ByteReader<R>,
    ) -> Result<(), Error> {
        let stage = Stage::Row(row);
        for pixel in pixels {
            let c = loop {
                match stream.byte(stage)? {
                    b' ' | b'\t' | b'\r' | b'\n' => {}
                    c => break c,
                }
            };
            *pixel = match c {
                b'0' => 0,
                b'1' => 1,
                c => return Err(Error::format(stage, FormatError::BadPbmDigit(c))),
            };
        }
        Ok(())
    }
}

/// `P2`: one decimal sample per pixel
pub(crate) struct PgmText {
    ramp: Vec<u8>,
    maxval: u16,
}

impl PgmText {
    pub(crate) fn new(grays: u16, maxval: u16) -> Self {
        let ramp = ramp(grays, maxval, usize::from(maxval) + 1);
        trace!("text ramp of {} levels", ramp.len());
        Self { ramp, maxval }
    }
}

impl PayloadDecoder for PgmText {
    fn decode_row<R: BufRead>(
        &mut self,
        row: u16,
        pixels: &mut [u8],
        stream: &mut ByteReader<R>,
    ) -> Result<(), Error> {
        let stage = Stage::Row(row);
        for pixel in pixels {
            let sample = stream.integer(stage)?;
            let level = usize::try_from(sample)
                .ok()
                .and_then(|s| self.ramp.get(s))
                .ok_or_else(|| {
                    Error::format(
                        stage,
                        FormatError::SampleOutOfRange {
                            sample,
                            maxval: u32::from(self.maxval),
                        },
                    )
                })?;
            *pixel = *level;
        }
        Ok(())
    }
}

/// `P4`: eight pixels per byte, most significant bit first, each row starting on a new byte
pub(crate) struct PbmRaw {
    packed: Vec<u8>,
}

impl PbmRaw {
    pub(crate) fn new(cols: u16) -> Self {
        Self {
            packed: vec![0; usize::from(cols).div_ceil(8)],
        }
    }
}

impl PayloadDecoder for PbmRaw {
    fn decode_row<R: BufRead>(
        &mut self,
        row: u16,
        pixels: &mut [u8],
        stream: &mut ByteReader<R>,
    ) -> Result<(), Error> {
        stream.read_exact(&mut self.packed, Stage::Row(row))?;
        for (col, pixel) in pixels.iter_mut().enumerate() {
            *pixel = (self.packed[col / 8] >> (7 - col % 8)) & 1;
        }
        Ok(())
    }
}

/// `P5`: one byte per pixel, or two big-endian bytes when the maxval exceeds 255
pub(crate) struct PgmRaw {
    ramp: Vec<u8>,
    wide: bool,
    samples: Vec<u8>,
}

impl PgmRaw {
    pub(crate) fn new(grays: u16, maxval: u16, cols: u16) -> Self {
        let wide = maxval > 255;
        let ramp = ramp(grays, maxval, if wide { 1 << 16 } else { 1 << 8 });
        trace!("raw ramp of {} levels", ramp.len());
        let width = if wide { 2 } else { 1 };
        Self {
            ramp,
            wide,
            samples: vec![0; usize::from(cols) * width],
        }
    }
}

impl PayloadDecoder for PgmRaw {
    fn decode_row<R: BufRead>(
        &mut self,
        row: u16,
        pixels: &mut [u8],
        stream: &mut ByteReader<R>,
    ) -> Result<(), Error> {
        stream.read_exact(&mut self.samples, Stage::Row(row))?;
        if self.wide {
            for (pixel, sample) in pixels.iter_mut().zip(self.samples.chunks_exact(2)) {
                *pixel = self.ramp[usize::from(u16::from_be_bytes([sample[0], sample[1]]))];
            }
        } else {
            for (pixel, sample) in pixels.iter_mut().zip(&self.samples) {
                *pixel = self.ramp[usize::from(*sample)];
            }
        }
        Ok(())
    }
}

/// `R4`: runs of alternating color, starting white at the beginning of each row
pub(crate) struct Rle;

impl Rle {
    fn run<R: BufRead>(stream: &mut ByteReader<R>, stage: Stage) -> Result<usize, Error> {
        let x = stream.byte(stage)?;
        if x < RUN_OVERFLOW_VALUE {
            return Ok(usize::from(x));
        }
        let x2 = stream.byte(stage)?;
        Ok((usize::from(x - RUN_OVERFLOW_VALUE) << 8) + usize::from(x2))
    }
}

impl PayloadDecoder for Rle {
    const ROW_ORDER: RowOrder = RowOrder::BottomUp;

    fn decode_row<R: BufRead>(
        &mut self,
        row: u16,
        pixels: &mut [u8],
        stream: &mut ByteReader<R>,
    ) -> Result<(), Error> {
        let stage = Stage::Row(row);
        let (mut col, mut color) = (0, 0);
        loop {
            let run = Self::run(stream, stage)?;
            if col + run > pixels.len() {
                warn!("run of {run} at row {row}, column {col} overflows the row");
                return Err(Error::LostSync { row, col, run });
            }
            pixels[col..col + run].fill(color);
            col += run;
            color = 1 - color;
            if col >= pixels.len() {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(mut decoder: impl PayloadDecoder, raster: &mut Raster, data: &[u8]) -> Result<(), Error> {
        decoder.decode_into(raster, &mut ByteReader::new(data))
    }

    fn rows(raster: &Raster) -> Vec<Vec<u8>> {
        (0..i32::from(raster.rows()))
            .map(|r| raster.row(r).to_vec())
            .collect()
    }

    #[test]
    fn ramp_inverts_samples() {
        assert_eq!(ramp(2, 1, 2), vec![1, 0]);
        assert_eq!(ramp(4, 3, 4), vec![3, 2, 1, 0]);
        assert_eq!(ramp(256, 255, 256)[0], 255);
        assert_eq!(ramp(256, 255, 256)[255], 0);
        // rounding to the nearest level
        assert_eq!(ramp(2, 4, 5), vec![1, 1, 1, 0, 0]);
    }

    #[test]
    fn raw_ramp_zeroes_samples_above_maxval() {
        let ramp = ramp(16, 15, 256);
        assert_eq!(ramp.len(), 256);
        assert_eq!(ramp[0], 15);
        assert!(ramp[16..].iter().all(|l| *l == 0));
    }

    #[test]
    fn pbm_text_fills_top_row_first() {
        let mut raster = Raster::new(2, 2, 1).unwrap();
        decode(PbmText, &mut raster, b"0 1\n1 0").unwrap();
        assert_eq!(rows(&raster), vec![vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn pbm_text_rejects_other_digits() {
        let mut raster = Raster::new(1, 3, 0).unwrap();
        let err = decode(PbmText, &mut raster, b"0 2 1").unwrap_err();
        assert!(matches!(
            err,
            Error::Format {
                stage: Stage::Row(0),
                source: FormatError::BadPbmDigit(b'2')
            }
        ));
    }

    #[test]
    fn pgm_text_goes_through_the_ramp() {
        let mut raster = Raster::new(1, 4, 0).unwrap();
        decode(PgmText::new(4, 3), &mut raster, b"0 1\n2 3").unwrap();
        assert_eq!(raster.row(0), &[3, 2, 1, 0]);
    }

    #[test]
    fn pgm_text_rejects_samples_above_maxval() {
        let mut raster = Raster::new(1, 2, 0).unwrap();
        let err = decode(PgmText::new(4, 3), &mut raster, b"0 4").unwrap_err();
        assert!(matches!(
            err,
            Error::Format {
                source: FormatError::SampleOutOfRange { sample: 4, maxval: 3 },
                ..
            }
        ));
    }

    #[test]
    fn pbm_raw_rows_start_on_a_new_byte() {
        let mut raster = Raster::new(2, 10, 0).unwrap();
        decode(PbmRaw::new(10), &mut raster, &[0b1010_0000, 0b0100_0000, 0xff, 0xc0]).unwrap();
        assert_eq!(raster.row(1), &[1, 0, 1, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(raster.row(0), &[1; 10]);
    }

    #[test]
    fn pgm_raw_reads_one_or_two_bytes() {
        let mut raster = Raster::new(1, 2, 0).unwrap();
        decode(PgmRaw::new(2, 1, 2), &mut raster, &[0, 1]).unwrap();
        assert_eq!(raster.row(0), &[1, 0]);

        let mut raster = Raster::new(1, 3, 0).unwrap();
        decode(PgmRaw::new(256, 1000, 3), &mut raster, &[0, 0, 0x03, 0xe8, 0x01, 0xf4]).unwrap();
        assert_eq!(raster.row(0), &[255, 0, 128]);
    }

    #[test]
    fn short_raw_payload_is_an_io_error() {
        let mut raster = Raster::new(2, 8, 0).unwrap();
        let err = decode(PbmRaw::new(8), &mut raster, &[0]).unwrap_err();
        // the top row comes first
        assert!(matches!(err, Error::Io { stage: Stage::Row(1), .. }));
    }

    #[test]
    fn rle_runs_alternate_from_white() {
        let mut raster = Raster::new(1, 4, 0).unwrap();
        decode(Rle, &mut raster, &[2, 2]).unwrap();
        assert_eq!(raster.row(0), &[0, 0, 1, 1]);
    }

    #[test]
    fn rle_fills_bottom_row_first() {
        let mut raster = Raster::new(2, 2, 0).unwrap();
        decode(Rle, &mut raster, &[0, 1, 1, 2]).unwrap();
        assert_eq!(rows(&raster), vec![vec![1, 0], vec![0, 0]]);

        // the same picture as P1 lists the top row first
        let mut text = Raster::new(2, 2, 0).unwrap();
        decode(PbmText, &mut text, b"00\n10").unwrap();
        assert_eq!(rows(&text), vec![vec![1, 0], vec![0, 0]]);
    }

    #[test]
    fn rle_two_byte_runs() {
        let mut raster = Raster::new(1, 300, 0).unwrap();
        decode(Rle, &mut raster, &[0xc1, 0x00, 0x2c]).unwrap();
        assert!(raster.row(0)[..256].iter().all(|p| *p == 0));
        assert!(raster.row(0)[256..].iter().all(|p| *p == 1));
    }

    #[test]
    fn rle_lost_sync() {
        let mut raster = Raster::new(1, 4, 0).unwrap();
        let err = decode(Rle, &mut raster, &[3, 2]).unwrap_err();
        assert!(matches!(
            err,
            Error::LostSync {
                row: 0,
                col: 3,
                run: 2
            }
        ));
    }
}
