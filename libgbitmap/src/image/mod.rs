#![allow(clippy::module_name_repetitions)]

pub(crate) mod bitmap;
pub(crate) mod compress;
pub(crate) mod decompress;
pub(crate) mod header;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use bitmap::{Bitmap, Raster};
use decompress::{PayloadDecoder, PbmRaw, PbmText, PgmRaw, PgmText, Rle};
use header::{Header, Magic};
use tracing::{debug, instrument};

use crate::{stream::ByteReader, Error, Stage};

/// Decodes a whole bitmap stream into a new raster
fn decode<R: BufRead>(stream: &mut ByteReader<R>, border: u16) -> Result<(Header, Raster), Error> {
    let mut header = Header::read_extent(stream)?;
    let mut raster = Raster::new(header.rows, header.cols, border)?;
    match header.magic {
        Magic::P1 => PbmText.decode_into(&mut raster, stream)?,
        Magic::P4 => PbmRaw::new(header.cols).decode_into(&mut raster, stream)?,
        Magic::R4 => Rle.decode_into(&mut raster, stream)?,
        Magic::P2 | Magic::P5 => {
            let maxval = header.read_maxval(stream)?;
            let grays = header.grays();
            raster.set_grays(grays)?;
            if header.magic == Magic::P2 {
                PgmText::new(grays, maxval).decode_into(&mut raster, stream)?;
            } else {
                PgmRaw::new(grays, maxval, header.cols).decode_into(&mut raster, stream)?;
            }
        }
    }
    debug!("decoded {header:?}");
    Ok((header, raster))
}

impl Bitmap {
    /// Decodes a `P1`, `P2`, `P4`, `P5` or `R4` stream into a new bitmap with `border` white
    /// pixels around the image.
    ///
    /// Only the bytes of the bitmap are taken from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the reader fails or ends early, [`Error::Format`] if the data is
    /// not a valid bitmap, and [`Error::SizeOverflow`] or [`Error::LostSync`] if it is corrupted.
    #[instrument(skip(reader))]
    pub fn from_reader(reader: impl BufRead, border: u16) -> Result<Self, Error> {
        let (_header, raster) = decode(&mut ByteReader::new(reader), border)?;
        Ok(Self::from(raster))
    }

    /// Decodes the bitmap stored in file `path`. See [`Self::from_reader`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened, and any error of
    /// [`Self::from_reader`].
    pub fn from_file<P: AsRef<Path>>(path: P, border: u16) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::io(Stage::Magic, e))?;
        Self::from_reader(BufReader::new(file), border)
    }

    /// Replaces the content of the bitmap with the one decoded from `reader`, returning the
    /// stream header.
    ///
    /// Readers of the bitmap see either the old or the new content in full. On error the bitmap
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// See [`Self::from_reader`].
    #[instrument(skip(self, reader))]
    pub fn read_from(&self, reader: impl BufRead, border: u16) -> Result<Header, Error> {
        let (header, raster) = decode(&mut ByteReader::new(reader), border)?;
        self.replace(raster);
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::FormatError;

    #[test]
    fn pbm_text_scenario() {
        let bitmap = Bitmap::from_reader(&b"P1\n2 2\n0 1\n1 0"[..], 0).unwrap();
        assert_eq!((bitmap.rows(), bitmap.cols(), bitmap.grays()), (2, 2, 2));
        let raster = bitmap.read();
        assert_eq!(raster.row(1), &[0, 1]);
        assert_eq!(raster.row(0), &[1, 0]);
    }

    #[test]
    fn rle_scenario() {
        let bitmap = Bitmap::from_reader(&b"R4\n4 1\n\x02\x02"[..], 0).unwrap();
        assert_eq!(bitmap.read().row(0), &[0, 0, 1, 1]);
    }

    #[test]
    fn rle_lost_sync_scenario() {
        let err = Bitmap::from_reader(&b"R4\n4 1\n\x03\x02"[..], 0).unwrap_err();
        assert!(matches!(err, Error::LostSync { row: 0, .. }));
    }

    #[test]
    fn gray_header_sets_grays() {
        let bitmap = Bitmap::from_reader(&b"P2 2 1 1000 0 1000"[..], 2).unwrap();
        assert_eq!(bitmap.grays(), 256);
        assert_eq!(bitmap.border(), 2);
        assert_eq!(bitmap.read().row(0), &[255, 0]);

        let bitmap = Bitmap::from_reader(&b"P5\n1 1\n7\n\x07"[..], 0).unwrap();
        assert_eq!(bitmap.grays(), 8);
        assert_eq!(bitmap.pixel(0, 0), 0);
    }

    #[test]
    fn bad_magic_names_the_stage() {
        let err = Bitmap::from_reader(&b"P6\n1 1\n255\n"[..], 0).unwrap_err();
        assert!(matches!(
            err,
            Error::Format {
                stage: Stage::Magic,
                source: FormatError::BadMagic(_)
            }
        ));
        assert_eq!(err.to_string(), "invalid magic number");
    }

    #[test]
    fn truncated_payload_names_the_row() {
        let err = Bitmap::from_reader(&b"P1\n2 2\n0 1\n1"[..], 0).unwrap_err();
        assert!(matches!(err, Error::Io { stage: Stage::Row(0), .. }));
        assert_eq!(err.to_string(), "could not read row 0");
    }

    #[test]
    fn trailing_bytes_stay_in_the_reader() {
        let mut data = &b"P4\n8 1\n\xffrest"[..];
        let bitmap = Bitmap::from_reader(&mut data, 0).unwrap();
        assert_eq!(bitmap.read().row(0), &[1; 8]);
        assert_eq!(data, b"rest");
    }

    #[test]
    fn failed_read_keeps_the_bitmap() {
        let bitmap = Bitmap::from_reader(&b"P1\n1 1\n1"[..], 0).unwrap();
        assert!(bitmap.read_from(&b"P1\n1 1\n7"[..], 0).is_err());
        assert_eq!(bitmap.pixel(0, 0), 1);

        let header = bitmap.read_from(&b"P2\n1 1\n3\n1"[..], 1).unwrap();
        assert_eq!(header.maxval, Some(3));
        assert_eq!((bitmap.grays(), bitmap.pixel(0, 0), bitmap.border()), (4, 2, 1));
    }

    #[test]
    fn oversized_bitmap_is_corruption() {
        let err = Bitmap::from_reader(&b"P4\n65535 65535\n"[..], 0xFFFF).unwrap_err();
        assert!(matches!(err, Error::SizeOverflow { .. }));
    }
}
