//! # libgbitmap
//!
//!
//! This library provides datatypes and i/o functionality for the bilevel and gray-level bitmaps
//! found in the DjVu decoding pipeline: the PBM/PGM text and raw formats (`P1`, `P2`, `P4`, `P5`)
//! and the run-length encoded `R4` format. It also provides the exact rectangle geometry the
//! renderers use to relate coordinates between differently sized or rotated views of an image.
//!
//! It aims to provide a minimal, low-level API to build upon.
//!
//! ### Geometry
//!
//! [`Rect`] is an axis-aligned rectangle with half-open bounds. [`RectMapper`] is an affine
//! transform between two rectangles (scaling, mirroring and quarter-turn rotations) which uses
//! the reduced fractions of [`Ratio`] so that no floating-point drift is introduced.
//!
//! ```rust
//! use libgbitmap::{Rect, RectMapper};
//!
//! fn main() -> Result<(), libgbitmap::Error> {
//!     let page = Rect::new(0, 0, 10, 10);
//!     let thumbnail = Rect::new(0, 0, 5, 5);
//!     let mapper = RectMapper::new(page, thumbnail)?;
//!
//!     assert_eq!(mapper.map(10, 10), (5, 5));
//!     assert_eq!(mapper.unmap(5, 5), (10, 10));
//!     Ok(())
//! }
//! ```
//!
//! ### Bitmaps
//!
//! A [`Bitmap`] stores one byte per pixel, `0` being white and `grays - 1` being black. Row zero
//! is the *bottom* scanline of the image. A few white border pixels can be read around the image
//! without bounds checks.
//!
//! #### Decoding a bitmap
//!
//! ```rust
//! use libgbitmap::Bitmap;
//!
//! fn main() -> Result<(), libgbitmap::Error> {
//!     let bitmap = Bitmap::from_reader(&b"P1\n2 2\n0 1\n1 0"[..], 0)?;
//!
//!     assert_eq!((bitmap.rows(), bitmap.cols(), bitmap.grays()), (2, 2, 2));
//!     let raster = bitmap.read();
//!     // the first line of the file is the top of the image
//!     assert_eq!(raster.row(1), &[0, 1]);
//!     assert_eq!(raster.row(0), &[1, 0]);
//!     Ok(())
//! }
//! ```
//!
//! #### Encoding a bitmap
//!
//! ```rust
//! use libgbitmap::{Bitmap, Magic};
//!
//! fn main() -> Result<(), libgbitmap::Error> {
//!     let bitmap = Bitmap::with_size(1, 4, 0)?;
//!     bitmap.set_pixel(0, 2, 1);
//!     bitmap.set_pixel(0, 3, 1);
//!
//!     let mut rle = Vec::new();
//!     bitmap.save(&mut rle, Magic::R4)?;
//!     assert_eq!(rle, b"R4\n4 1\n\x02\x02");
//!     Ok(())
//! }
//! ```
//!

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

mod error;
/// Module containing rectangles, ratios and the rectangle mapper
pub mod geometry;
/// Module containing the bitmap type and its decoders and encoders
pub mod image;
/// Module containing the byte-level readers used by the decoders
pub mod stream;

pub use error::{Error, Stage};
pub use geometry::{Orientation, Ratio, Rect, RectMapper};
pub use image::bitmap::{Bitmap, Raster};
pub use image::header::{Header, Magic};

/// A run length at or above this value takes two bytes in `R4` data
const RUN_OVERFLOW_VALUE: u8 = 0xc0;
/// Longest run a single `R4` run length can hold
const MAX_RUN_SIZE: u16 = 0x3fff;
