use crate::{stream::FormatError, Magic};
use strum::Display;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
/// Possible `libgbitmap` errors
pub enum Error {
    /// Error returned if the byte source fails or ends before a field is complete
    #[error("could not read {stage}")]
    Io {
        /// the field or row being read
        stage: Stage,
        /// the underlying i/o error
        #[source]
        source: std::io::Error,
    },
    /// Error returned if the data does not follow the format grammar
    #[error("invalid {stage}")]
    Format {
        /// the field or row being read
        stage: Stage,
        /// what was wrong with it
        #[source]
        source: FormatError,
    },
    /// Error returned if the bitmap buffer size does not fit in 32 bits
    #[error("image size exceeds maximum (corrupted file?): rows {rows}, columns {cols}, border {border}")]
    SizeOverflow {
        /// requested rows
        rows: u16,
        /// requested columns
        cols: u16,
        /// requested border
        border: u16,
    },
    /// Error returned if a `R4` run does not fit in what is left of its row
    #[error("bitmap lost sync: run of {run} pixels at row {row}, column {col} exceeds the row width")]
    LostSync {
        /// row being decoded
        row: u16,
        /// column the run starts at
        col: usize,
        /// length of the offending run
        run: usize,
    },
    /// Error returned if a [`crate::RectMapper`] is given an empty rectangle
    #[error("cannot map from or onto an empty rectangle")]
    EmptyRect,
    /// Error returned if a gray level count is outside `2..=256`
    #[error("gray levels must be within 2..=256, got {0}")]
    InvalidGrays(u16),
    /// Error returned if a bilevel format is asked to hold a gray bitmap
    #[error("cannot save a bitmap with {grays} gray levels as {format}")]
    TooManyGrays {
        /// gray levels of the bitmap
        grays: u16,
        /// requested format
        format: Magic,
    },
    /// Error returned if an empty bitmap is saved in a format that cannot hold it
    #[error("cannot save an empty bitmap as {0}")]
    EmptyBitmap(Magic),
    /// Error returned if the sink fails while writing
    #[error("could not write {format} data")]
    Write {
        /// format being written
        format: Magic,
        /// the underlying i/o error
        #[source]
        source: std::io::Error,
    },
}

/// The part of a bitmap stream being read when an error happened
#[derive(Debug, Display, Eq, PartialEq, Copy, Clone)]
pub enum Stage {
    /// The two magic bytes
    #[strum(to_string = "magic number")]
    Magic,
    /// The column count of the header
    #[strum(to_string = "column count")]
    Columns,
    /// The row count of the header
    #[strum(to_string = "row count")]
    Rows,
    /// The maximum sample value of a PGM header
    #[strum(to_string = "maxval")]
    Maxval,
    /// A row of the pixel payload
    #[strum(to_string = "row {0}")]
    Row(u16),
}

impl Error {
    pub(crate) fn format(stage: Stage, source: FormatError) -> Self {
        Self::Format { stage, source }
    }

    pub(crate) fn io(stage: Stage, source: std::io::Error) -> Self {
        Self::Io { stage, source }
    }
}
