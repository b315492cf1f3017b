use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::{Error, Rect};

/// Bilevel or gray-level image, one byte per pixel
///
/// Value zero is white, `grays - 1` is black. Row zero is the *bottom* line of the image.
///
/// The pixels and every size field live in a [`Raster`] behind a reader/writer lock, so a
/// renderer may read the bitmap while another thread replaces its content. The methods of
/// [`Bitmap`] take the lock for a single call; [`Bitmap::read`] and [`Bitmap::write`] hold it
/// for as long as the returned guard lives.
#[derive(Debug, Default)]
pub struct Bitmap {
    raster: RwLock<Raster>,
}

/// Pixel storage of a [`Bitmap`]
///
/// Rows are stored bottom to top, `bytes_per_row = cols + border` bytes apart, the first row
/// starting `border` bytes into the buffer. The bytes between the end of a row and the start of
/// the next one are border pixels, shared by the right side of a row and the left side of the
/// following one. Border pixels are never written and always read as white.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Raster {
    rows: u16,
    cols: u16,
    border: u16,
    bytes_per_row: usize,
    grays: u16,
    bytes: Vec<u8>,
    /// white line read in place of the rows above and below the image
    zeroes: Vec<u8>,
}

impl Default for Raster {
    fn default() -> Self {
        Self {
            rows: 0,
            cols: 0,
            border: 0,
            bytes_per_row: 0,
            grays: 2,
            bytes: Vec::new(),
            zeroes: Vec::new(),
        }
    }
}

impl Raster {
    /// Creates a white raster of `rows` by `cols` pixels with two gray levels
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if `rows * (cols + border) + border` does not fit in
    /// 32 bits.
    pub fn new(rows: u16, cols: u16, border: u16) -> Result<Self, Error> {
        let overflow = || Error::SizeOverflow { rows, cols, border };
        let len = u32::from(rows)
            .checked_mul(u32::from(cols) + u32::from(border))
            .and_then(|n| n.checked_add(u32::from(border)))
            .ok_or_else(overflow)?;
        let len = usize::try_from(len).map_err(|_| overflow())?;
        let bytes_per_row = usize::from(cols) + usize::from(border);
        debug!("allocating {len} bytes for a {rows}x{cols} raster with border {border}");
        Ok(Self {
            rows,
            cols,
            border,
            bytes_per_row,
            grays: 2,
            bytes: vec![0; len],
            zeroes: vec![0; bytes_per_row + usize::from(border)],
        })
    }

    /// Number of rows (the image height)
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Number of columns (the image width)
    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// Width of the white border around the image
    #[must_use]
    pub const fn border(&self) -> u16 {
        self.border
    }

    /// Distance in bytes between the starts of two consecutive rows
    #[must_use]
    pub const fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    /// Number of gray levels
    #[must_use]
    pub const fn grays(&self) -> u16 {
        self.grays
    }

    /// Offset of pixel `(row, col)` in [`Self::data`]
    #[must_use]
    pub const fn offset(&self, row: u16, col: u16) -> usize {
        row as usize * self.bytes_per_row + self.border as usize + col as usize
    }

    /// The whole buffer, border bytes included
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    /// The `cols` pixels of row `row`, or a white line for rows outside the image
    #[must_use]
    pub fn row(&self, row: i32) -> &[u8] {
        let cols = usize::from(self.cols);
        match self.row_index(row) {
            Some(r) => {
                let start = self.offset(r, 0);
                &self.bytes[start..start + cols]
            }
            None => &self.zeroes[..cols],
        }
    }

    /// Row `row` together with `border` white pixels on each side, or a white line for rows
    /// outside the image
    #[must_use]
    pub fn row_with_border(&self, row: i32) -> &[u8] {
        match self.row_index(row) {
            Some(r) => {
                let start = self.offset(r, 0) - usize::from(self.border);
                &self.bytes[start..start + self.zeroes.len()]
            }
            None => &self.zeroes,
        }
    }

    /// Mutable access to the pixels of row `row`, without its border
    #[must_use]
    pub fn row_mut(&mut self, row: u16) -> Option<&mut [u8]> {
        if row < self.rows {
            let start = self.offset(row, 0);
            let cols = usize::from(self.cols);
            Some(&mut self.bytes[start..start + cols])
        } else {
            None
        }
    }

    /// Rows from the top of the image down to row zero
    pub fn rows_from_top(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.rows).rev().map(|r| self.row(i32::from(r)))
    }

    /// The pixel at `(row, col)`. Pixels outside the image read as white.
    #[must_use]
    pub fn pixel(&self, row: i32, col: i32) -> u8 {
        usize::try_from(col)
            .ok()
            .and_then(|c| self.row(row).get(c).copied())
            .unwrap_or(0)
    }

    /// Sets the pixel at `(row, col)`. Coordinates outside the image are ignored.
    pub fn set_pixel(&mut self, row: u16, col: u16, value: u8) {
        if let Some(pixels) = self.row_mut(row) {
            if let Some(p) = pixels.get_mut(usize::from(col)) {
                *p = value;
            }
        }
    }

    /// Sets every pixel of the image to `value`
    pub fn fill(&mut self, value: u8) {
        for row in 0..self.rows {
            if let Some(pixels) = self.row_mut(row) {
                pixels.fill(value);
            }
        }
    }

    /// Sets the number of gray levels without touching the pixels
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrays`] unless `grays` is within `2..=256`.
    pub fn set_grays(&mut self, grays: u16) -> Result<(), Error> {
        if !(2..=256).contains(&grays) {
            return Err(Error::InvalidGrays(grays));
        }
        self.grays = grays;
        Ok(())
    }

    /// Sets the number of gray levels and rescales every pixel to the new range
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrays`] unless `grays` is within `2..=256`.
    pub fn change_grays(&mut self, grays: u16) -> Result<(), Error> {
        let og = u32::from(self.grays - 1);
        self.set_grays(grays)?;
        let ng = u32::from(grays - 1);
        let conv: Vec<u8> = (0..=u32::from(u8::MAX))
            .map(|i| {
                let level = if i > og { ng } else { (i * ng + og / 2) / og };
                u8::try_from(level).unwrap_or(u8::MAX)
            })
            .collect();
        self.map_pixels(|p| conv[usize::from(p)]);
        Ok(())
    }

    /// Turns the raster bilevel: pixels above `threshold` become black, the others white
    pub fn binarize_grays(&mut self, threshold: u8) {
        self.map_pixels(|p| u8::from(p > threshold));
        self.grays = 2;
    }

    /// A copy of the raster with a different border
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if the new border makes the buffer too large.
    pub fn with_border(&self, border: u16) -> Result<Self, Error> {
        let mut out = Self::new(self.rows, self.cols, border)?;
        out.grays = self.grays;
        for row in 0..self.rows {
            if let Some(pixels) = out.row_mut(row) {
                pixels.copy_from_slice(self.row(i32::from(row)));
            }
        }
        Ok(out)
    }

    /// A new raster holding the pixels of `rect`. Parts of `rect` outside the image are white.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if `rect` is larger than a raster can be.
    #[allow(clippy::cast_sign_loss)]
    pub fn section(&self, rect: &Rect, border: u16) -> Result<Self, Error> {
        let too_large = || Error::SizeOverflow {
            rows: u16::try_from(rect.height()).unwrap_or(u16::MAX),
            cols: u16::try_from(rect.width()).unwrap_or(u16::MAX),
            border,
        };
        let rows = u16::try_from(rect.height()).map_err(|_| too_large())?;
        let cols = u16::try_from(rect.width()).map_err(|_| too_large())?;
        let mut out = Self::new(rows, cols, border)?;
        out.grays = self.grays;

        let area = rect.intersect(&Rect::new(
            0,
            0,
            i32::from(self.cols),
            i32::from(self.rows),
        ));
        if area.is_empty() {
            return Ok(out);
        }
        // `area` lies inside both the image and `rect`, so none of these is negative
        let (x0, x1) = (area.xmin() as usize, area.xmax() as usize);
        let dx = (area.xmin() - rect.xmin()) as usize;
        for y in area.ymin()..area.ymax() {
            let Ok(target) = u16::try_from(y - rect.ymin()) else {
                continue;
            };
            let src = &self.row(y)[x0..x1];
            if let Some(pixels) = out.row_mut(target) {
                pixels[dx..dx + src.len()].copy_from_slice(src);
            }
        }
        Ok(out)
    }

    /// Row index of `row` if it is inside the image
    fn row_index(&self, row: i32) -> Option<u16> {
        u16::try_from(row).ok().filter(|r| *r < self.rows)
    }

    fn map_pixels(&mut self, f: impl Fn(u8) -> u8) {
        for row in 0..self.rows {
            if let Some(pixels) = self.row_mut(row) {
                for p in pixels {
                    *p = f(*p);
                }
            }
        }
    }
}

impl Bitmap {
    /// Creates an empty bitmap, with no row and no column
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a white bitmap of `rows` by `cols` pixels surrounded by `border` white pixels
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if the buffer size does not fit in 32 bits.
    pub fn with_size(rows: u16, cols: u16, border: u16) -> Result<Self, Error> {
        Raster::new(rows, cols, border).map(Self::from)
    }

    /// Resets the bitmap to `rows` by `cols` white pixels with two gray levels.
    ///
    /// On error the bitmap keeps its previous content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if the buffer size does not fit in 32 bits.
    pub fn init(&self, rows: u16, cols: u16, border: u16) -> Result<(), Error> {
        let raster = Raster::new(rows, cols, border)?;
        *self.raster.write() = raster;
        Ok(())
    }

    /// Locks the bitmap for reading
    pub fn read(&self) -> RwLockReadGuard<'_, Raster> {
        self.raster.read()
    }

    /// Locks the bitmap for writing
    pub fn write(&self) -> RwLockWriteGuard<'_, Raster> {
        self.raster.write()
    }

    /// Replaces the content of the bitmap at once
    pub fn replace(&self, raster: Raster) -> Raster {
        std::mem::replace(&mut *self.raster.write(), raster)
    }

    /// Returns the pixel storage, consuming the bitmap
    pub fn into_raster(self) -> Raster {
        self.raster.into_inner()
    }

    /// Number of rows (the image height)
    #[must_use]
    pub fn rows(&self) -> u16 {
        self.read().rows()
    }

    /// Number of columns (the image width)
    #[must_use]
    pub fn cols(&self) -> u16 {
        self.read().cols()
    }

    /// Width of the white border around the image
    #[must_use]
    pub fn border(&self) -> u16 {
        self.read().border()
    }

    /// Distance in bytes between the starts of two consecutive rows
    #[must_use]
    pub fn bytes_per_row(&self) -> usize {
        self.read().bytes_per_row()
    }

    /// Number of gray levels
    #[must_use]
    pub fn grays(&self) -> u16 {
        self.read().grays()
    }

    /// The pixel at `(row, col)`. Pixels outside the image read as white.
    #[must_use]
    pub fn pixel(&self, row: i32, col: i32) -> u8 {
        self.read().pixel(row, col)
    }

    /// Sets the pixel at `(row, col)`. Coordinates outside the image are ignored.
    pub fn set_pixel(&self, row: u16, col: u16, value: u8) {
        self.write().set_pixel(row, col, value);
    }

    /// Sets every pixel to `value`
    pub fn fill(&self, value: u8) {
        self.write().fill(value);
    }

    /// See [`Raster::set_grays`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrays`] unless `grays` is within `2..=256`.
    pub fn set_grays(&self, grays: u16) -> Result<(), Error> {
        self.write().set_grays(grays)
    }

    /// See [`Raster::change_grays`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrays`] unless `grays` is within `2..=256`.
    pub fn change_grays(&self, grays: u16) -> Result<(), Error> {
        self.write().change_grays(grays)
    }

    /// See [`Raster::binarize_grays`]
    pub fn binarize_grays(&self, threshold: u8) {
        self.write().binarize_grays(threshold);
    }

    /// Makes sure the border is at least `minimum` pixels wide, keeping the pixels
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if the wider border makes the buffer too large.
    pub fn minborder(&self, minimum: u16) -> Result<(), Error> {
        let mut raster = self.write();
        if raster.border() < minimum {
            *raster = raster.with_border(minimum)?;
        }
        Ok(())
    }

    /// A copy of the bitmap with a different border
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if the new border makes the buffer too large.
    pub fn copy_with_border(&self, border: u16) -> Result<Self, Error> {
        self.read().with_border(border).map(Self::from)
    }

    /// A new bitmap holding the pixels of `rect`. Parts of `rect` outside the image are white.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeOverflow`] if `rect` is larger than a bitmap can be.
    pub fn copy_section(&self, rect: &Rect, border: u16) -> Result<Self, Error> {
        self.read().section(rect, border).map(Self::from)
    }
}

impl From<Raster> for Bitmap {
    fn from(raster: Raster) -> Self {
        Self {
            raster: RwLock::new(raster),
        }
    }
}

impl Clone for Bitmap {
    fn clone(&self) -> Self {
        Self::from(self.read().clone())
    }
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || *self.read() == *other.read()
    }
}

impl Eq for Bitmap {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bitmap_is_empty() {
        let bitmap = Bitmap::new();
        assert_eq!((bitmap.rows(), bitmap.cols(), bitmap.grays()), (0, 0, 2));
        assert!(bitmap.read().data().is_empty());
        assert_eq!(bitmap.pixel(0, 0), 0);
    }

    #[test]
    fn layout_with_border() {
        let raster = Raster::new(3, 4, 2).unwrap();
        assert_eq!(raster.bytes_per_row(), 6);
        assert_eq!(raster.data().len(), 3 * 6 + 2);
        assert_eq!(raster.offset(0, 0), 2);
        assert_eq!(raster.offset(2, 3), 2 * 6 + 2 + 3);
        assert_eq!(raster.row(1).len(), 4);
        assert_eq!(raster.row_with_border(1).len(), 4 + 2 * 2);
        assert_eq!(raster.row_with_border(-1).len(), 4 + 2 * 2);
        assert_eq!(raster.row(3), &[0; 4]);
    }

    #[test]
    fn size_overflow_is_an_error() {
        let err = Bitmap::with_size(0xFFFF, 0xFFFF, 0xFFFF).unwrap_err();
        assert!(matches!(
            err,
            Error::SizeOverflow {
                rows: 0xFFFF,
                cols: 0xFFFF,
                border: 0xFFFF
            }
        ));
    }

    #[test]
    fn failed_init_keeps_previous_content() {
        let bitmap = Bitmap::with_size(2, 2, 1).unwrap();
        bitmap.set_pixel(1, 1, 1);
        assert!(bitmap.init(0xFFFF, 0xFFFF, 0xFFFF).is_err());
        assert_eq!(bitmap.pixel(1, 1), 1);
        bitmap.init(5, 7, 0).unwrap();
        assert_eq!((bitmap.rows(), bitmap.cols(), bitmap.border()), (5, 7, 0));
        assert_eq!(bitmap.pixel(1, 1), 0);
    }

    #[test]
    fn border_reads_white() {
        let bitmap = Bitmap::with_size(2, 3, 2).unwrap();
        bitmap.fill(1);
        assert_eq!(bitmap.pixel(0, 0), 1);
        assert_eq!(bitmap.pixel(1, 2), 1);
        for (row, col) in [(-1, 0), (2, 0), (0, -1), (0, 3), (1, -2), (1, 4), (-100, -100)] {
            assert_eq!(bitmap.pixel(row, col), 0, "({row}, {col})");
        }
        let raster = bitmap.read();
        assert_eq!(raster.row_with_border(0), &[0, 0, 1, 1, 1, 0, 0]);
        assert_eq!(raster.row_with_border(1), &[0, 0, 1, 1, 1, 0, 0]);
        assert_eq!(raster.row_with_border(2), &[0; 7]);
    }

    #[test]
    fn set_pixel_ignores_outside_coordinates() {
        let bitmap = Bitmap::with_size(2, 2, 0).unwrap();
        bitmap.set_pixel(2, 0, 1);
        bitmap.set_pixel(0, 2, 1);
        assert!(bitmap.read().data().iter().all(|p| *p == 0));
    }

    #[test]
    fn gray_levels() {
        let bitmap = Bitmap::with_size(1, 4, 0).unwrap();
        assert!(matches!(bitmap.set_grays(1), Err(Error::InvalidGrays(1))));
        assert!(matches!(bitmap.set_grays(257), Err(Error::InvalidGrays(257))));
        bitmap.set_grays(256).unwrap();
        for (col, value) in [0, 85, 170, 255].into_iter().enumerate() {
            bitmap.set_pixel(0, u16::try_from(col).unwrap(), value);
        }
        bitmap.change_grays(4).unwrap();
        assert_eq!(bitmap.grays(), 4);
        assert_eq!(bitmap.read().row(0), &[0, 1, 2, 3]);
        bitmap.binarize_grays(1);
        assert_eq!(bitmap.grays(), 2);
        assert_eq!(bitmap.read().row(0), &[0, 0, 1, 1]);
    }

    #[test]
    fn minborder_keeps_pixels() {
        let bitmap = Bitmap::with_size(2, 2, 0).unwrap();
        bitmap.set_pixel(0, 1, 1);
        bitmap.set_pixel(1, 0, 1);
        bitmap.minborder(3).unwrap();
        assert_eq!(bitmap.border(), 3);
        assert_eq!(bitmap.read().row(0), &[0, 1]);
        assert_eq!(bitmap.read().row(1), &[1, 0]);
        bitmap.minborder(1).unwrap();
        assert_eq!(bitmap.border(), 3);
    }

    #[test]
    fn copy_section_pads_with_white() {
        let bitmap = Bitmap::with_size(3, 3, 1).unwrap();
        bitmap.fill(1);
        bitmap.set_pixel(1, 1, 0);
        let section = bitmap.copy_section(&Rect::new(1, 1, 3, 3), 0).unwrap();
        assert_eq!((section.rows(), section.cols(), section.border()), (3, 3, 0));
        let raster = section.read();
        assert_eq!(raster.row(0), &[0, 1, 0]);
        assert_eq!(raster.row(1), &[1, 1, 0]);
        assert_eq!(raster.row(2), &[0, 0, 0]);

        let outside = bitmap.copy_section(&Rect::new(10, 10, 2, 2), 0).unwrap();
        assert!(outside.read().data().iter().all(|p| *p == 0));
    }

    #[test]
    fn copies_are_independent() {
        let bitmap = Bitmap::with_size(2, 2, 0).unwrap();
        let copy = bitmap.copy_with_border(4).unwrap();
        bitmap.set_pixel(0, 0, 1);
        assert_eq!(copy.pixel(0, 0), 0);
        assert_eq!(copy.border(), 4);
        let clone = bitmap.clone();
        assert_eq!(clone, bitmap);
        assert_ne!(clone, copy);
    }

    #[test]
    fn readers_see_whole_replacements() {
        let bitmap = Bitmap::with_size(4, 4, 0).unwrap();
        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..100u8 {
                    let mut raster = Raster::new(4, 4, 0).unwrap();
                    raster.fill(i % 2);
                    bitmap.replace(raster);
                }
            });
            s.spawn(|| {
                for _ in 0..100 {
                    let raster = bitmap.read();
                    let first = raster.pixel(0, 0);
                    assert!(raster.data().iter().all(|p| *p == first));
                }
            });
        });
    }
}
