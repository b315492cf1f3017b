use super::{
    ratio::{scaled_divide, scaled_multiply},
    Orientation, Ratio, Rect,
};
use crate::Error;
use std::mem;

/// Maps points from one rectangle to another.
///
/// Given the coordinates of a point in the input rectangle, [`RectMapper::map`] computes the
/// matching point in the output rectangle, and [`RectMapper::unmap`] goes the other way. The
/// transform is affine: the corners of the input rectangle land on the matching corners of the
/// output rectangle, after the optional mirroring and axis swap described by the mapper's
/// [`Orientation`].
///
/// Scale factors are kept as reduced fractions, so mapping then unmapping a point is off by at
/// most one unit per axis as long as each output extent is at least half the input extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RectMapper {
    /// input rectangle, with its axes exchanged while the orientation swaps them
    src: Rect,
    dst: Rect,
    orientation: Orientation,
    rw: Ratio,
    rh: Ratio,
}

impl RectMapper {
    /// Creates a mapper from `src` onto `dst`
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRect`] if either rectangle is empty.
    pub fn new(src: Rect, dst: Rect) -> Result<Self, Error> {
        if src.is_empty() || dst.is_empty() {
            return Err(Error::EmptyRect);
        }
        let mut mapper = Self {
            src,
            dst,
            orientation: Orientation::IDENTITY,
            rw: Ratio::default(),
            rh: Ratio::default(),
        };
        mapper.precalc();
        Ok(mapper)
    }

    /// Replaces both rectangles, keeping the orientation
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRect`] if either rectangle is empty. The mapper is left untouched.
    pub fn set(&mut self, src: Rect, dst: Rect) -> Result<(), Error> {
        if src.is_empty() || dst.is_empty() {
            return Err(Error::EmptyRect);
        }
        self.src = self.oriented(src);
        self.dst = dst;
        self.precalc();
        Ok(())
    }

    /// Replaces the input rectangle
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRect`] if `src` is empty.
    pub fn set_input(&mut self, src: Rect) -> Result<(), Error> {
        self.set(src, self.dst)
    }

    /// Replaces the output rectangle
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRect`] if `dst` is empty.
    pub fn set_output(&mut self, dst: Rect) -> Result<(), Error> {
        if dst.is_empty() {
            return Err(Error::EmptyRect);
        }
        self.dst = dst;
        self.precalc();
        Ok(())
    }

    /// The input rectangle, as given to [`Self::new`] or [`Self::set`]
    #[must_use]
    pub const fn input(&self) -> Rect {
        if self.orientation.swap_xy() {
            self.src.transposed()
        } else {
            self.src
        }
    }

    /// The output rectangle
    #[must_use]
    pub const fn output(&self) -> Rect {
        self.dst
    }

    /// The current orientation
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Composes `turns` counter-clockwise quarter turns into the mapping
    pub fn rotate(&mut self, turns: i32) {
        self.reorient(self.orientation.rotated(turns));
    }

    /// Mirrors the mapping horizontally
    pub fn mirror_x(&mut self) {
        self.reorient(self.orientation.mirrored_x());
    }

    /// Mirrors the mapping vertically
    pub fn mirror_y(&mut self) {
        self.reorient(self.orientation.mirrored_y());
    }

    /// Maps the point `(x, y)` of the input rectangle into the output rectangle
    #[must_use]
    pub fn map(&self, x: i32, y: i32) -> (i32, i32) {
        let (mut mx, mut my) = (x, y);
        if self.orientation.swap_xy() {
            mem::swap(&mut mx, &mut my);
        }
        if self.orientation.mirror_x() {
            mx = mirror(mx, self.src.xmin(), self.src.xmax());
        }
        if self.orientation.mirror_y() {
            my = mirror(my, self.src.ymin(), self.src.ymax());
        }
        (
            self.dst
                .xmin()
                .saturating_add(scaled_multiply(mx.saturating_sub(self.src.xmin()), self.rw)),
            self.dst
                .ymin()
                .saturating_add(scaled_multiply(my.saturating_sub(self.src.ymin()), self.rh)),
        )
    }

    /// Maps the point `(x, y)` of the output rectangle back into the input rectangle
    #[must_use]
    pub fn unmap(&self, x: i32, y: i32) -> (i32, i32) {
        let mut mx = self
            .src
            .xmin()
            .saturating_add(scaled_divide(x.saturating_sub(self.dst.xmin()), self.rw));
        let mut my = self
            .src
            .ymin()
            .saturating_add(scaled_divide(y.saturating_sub(self.dst.ymin()), self.rh));
        if self.orientation.mirror_y() {
            my = mirror(my, self.src.ymin(), self.src.ymax());
        }
        if self.orientation.mirror_x() {
            mx = mirror(mx, self.src.xmin(), self.src.xmax());
        }
        if self.orientation.swap_xy() {
            mem::swap(&mut mx, &mut my);
        }
        (mx, my)
    }

    /// Maps both corners of `rect` and puts them back in min/max order
    #[must_use]
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let a = self.map(rect.xmin(), rect.ymin());
        let b = self.map(rect.xmax(), rect.ymax());
        ordered(a, b)
    }

    /// Unmaps both corners of `rect` and puts them back in min/max order
    #[must_use]
    pub fn unmap_rect(&self, rect: &Rect) -> Rect {
        let a = self.unmap(rect.xmin(), rect.ymin());
        let b = self.unmap(rect.xmax(), rect.ymax());
        ordered(a, b)
    }

    fn reorient(&mut self, orientation: Orientation) {
        if orientation.swap_xy() != self.orientation.swap_xy() {
            self.src = self.src.transposed();
        }
        self.orientation = orientation;
        self.precalc();
    }

    /// `rect` laid out the way `self.src` is stored under the current orientation
    const fn oriented(&self, rect: Rect) -> Rect {
        if self.orientation.swap_xy() {
            rect.transposed()
        } else {
            rect
        }
    }

    fn precalc(&mut self) {
        // both rectangles are non-empty here, so neither width nor height is zero
        self.rw = Ratio::new(self.dst.width(), self.src.width());
        self.rh = Ratio::new(self.dst.height(), self.src.height());
    }
}

const fn mirror(v: i32, min: i32, max: i32) -> i32 {
    min.saturating_add(max).saturating_sub(v)
}

fn ordered((x1, y1): (i32, i32), (x2, y2): (i32, i32)) -> Rect {
    Rect::from_bounds(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
}
