/// An axis-aligned rectangle
///
/// The rectangle holds every point `(x, y)` with `xmin <= x < xmax` and `ymin <= y < ymax`,
/// so `(xmax, ymax)` itself is *not* inside it.
///
/// A rectangle is empty when `xmin >= xmax` or `ymin >= ymax`. All empty rectangles compare
/// equal, and every operation producing a degenerate result returns the canonical empty
/// rectangle whose bounds are all zero (which is also [`Rect::default`]).
#[derive(Debug, Default, Clone, Copy)]
pub struct Rect {
    xmin: i32,
    ymin: i32,
    xmax: i32,
    ymax: i32,
}

impl Rect {
    /// Creates a rectangle with corner `(xmin, ymin)` and the given extent.
    ///
    /// Negative extents are allowed: the stored bounds are always the true minimum and maximum.
    #[must_use]
    pub const fn new(xmin: i32, ymin: i32, width: i32, height: i32) -> Self {
        let xend = xmin.saturating_add(width);
        let yend = ymin.saturating_add(height);
        Self {
            xmin: min(xmin, xend),
            ymin: min(ymin, yend),
            xmax: max(xmin, xend),
            ymax: max(ymin, yend),
        }
    }

    /// Creates a rectangle from its bounds, or the empty rectangle if they cross
    #[must_use]
    pub const fn from_bounds(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        sanitize(xmin, ymin, xmax, ymax)
    }

    /// The canonical empty rectangle
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            xmin: 0,
            ymin: 0,
            xmax: 0,
            ymax: 0,
        }
    }

    /// Minimal horizontal coordinate (inclusive)
    #[must_use]
    pub const fn xmin(&self) -> i32 {
        self.xmin
    }

    /// Minimal vertical coordinate (inclusive)
    #[must_use]
    pub const fn ymin(&self) -> i32 {
        self.ymin
    }

    /// Maximal horizontal coordinate (exclusive)
    #[must_use]
    pub const fn xmax(&self) -> i32 {
        self.xmax
    }

    /// Maximal vertical coordinate (exclusive)
    #[must_use]
    pub const fn ymax(&self) -> i32 {
        self.ymax
    }

    /// Returns the width, `0` for an empty rectangle
    #[must_use]
    pub const fn width(&self) -> i32 {
        if self.is_empty() {
            0
        } else {
            self.xmax.saturating_sub(self.xmin)
        }
    }

    /// Returns the height, `0` for an empty rectangle
    #[must_use]
    pub const fn height(&self) -> i32 {
        if self.is_empty() {
            0
        } else {
            self.ymax.saturating_sub(self.ymin)
        }
    }

    /// Returns the area, `0` for an empty rectangle
    #[must_use]
    pub const fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// Returns whether the rectangle holds no point at all
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        is_empty(self.xmin, self.ymin, self.xmax, self.ymax)
    }

    /// Returns whether the point `(x, y)` is inside the rectangle
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.xmin && x < self.xmax && y >= self.ymin && y < self.ymax
    }

    /// Returns whether `other` lies entirely inside the rectangle.
    ///
    /// The empty rectangle is contained in every rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Self) -> bool {
        self.intersect(other) == *other
    }

    /// Moves the vertical sides `dx` away from the centre and the horizontal sides `dy` away
    /// from the centre. Negative values move them closer; sides that meet or cross give the
    /// empty rectangle.
    #[must_use]
    pub const fn inflate(&self, dx: i32, dy: i32) -> Self {
        sanitize(
            self.xmin.saturating_sub(dx),
            self.ymin.saturating_sub(dy),
            self.xmax.saturating_add(dx),
            self.ymax.saturating_add(dy),
        )
    }

    /// Moves the rectangle by `dx` horizontally and `dy` vertically
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Self {
        sanitize(
            self.xmin.saturating_add(dx),
            self.ymin.saturating_add(dy),
            self.xmax.saturating_add(dx),
            self.ymax.saturating_add(dy),
        )
    }

    /// Returns the points common to both rectangles
    #[must_use]
    pub const fn intersect(&self, other: &Self) -> Self {
        sanitize(
            max(self.xmin, other.xmin),
            max(self.ymin, other.ymin),
            min(self.xmax, other.xmax),
            min(self.ymax, other.ymax),
        )
    }

    /// Returns the smallest rectangle holding both rectangles.
    ///
    /// If either rectangle is empty the other one is returned as is.
    #[must_use]
    pub const fn recthull(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            xmin: min(self.xmin, other.xmin),
            ymin: min(self.ymin, other.ymin),
            xmax: max(self.xmax, other.xmax),
            ymax: max(self.ymax, other.ymax),
        }
    }

    /// Scales every bound by `factor` relative to the origin
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        self.scale_xy(factor, factor)
    }

    /// Scales the horizontal bounds by `xfactor` and the vertical bounds by `yfactor`, relative
    /// to the origin. A factor that is not strictly positive gives the empty rectangle.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn scale_xy(&self, xfactor: f64, yfactor: f64) -> Self {
        // written so that NaN factors end up here too
        if !(xfactor > 0.0 && yfactor > 0.0) {
            return Self::empty();
        }
        // float to int casts saturate
        sanitize(
            (f64::from(self.xmin) * xfactor) as i32,
            (f64::from(self.ymin) * yfactor) as i32,
            (f64::from(self.xmax) * xfactor) as i32,
            (f64::from(self.ymax) * yfactor) as i32,
        )
    }

    /// The rectangle mirrored about the diagonal, x bounds and y bounds exchanged
    pub(crate) const fn transposed(&self) -> Self {
        Self {
            xmin: self.ymin,
            ymin: self.xmin,
            xmax: self.ymax,
            ymax: self.xmax,
        }
    }
}

impl PartialEq for Rect {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => true,
            (false, false) => {
                self.xmin == other.xmin
                    && self.ymin == other.ymin
                    && self.xmax == other.xmax
                    && self.ymax == other.ymax
            }
            _ => false,
        }
    }
}

impl Eq for Rect {}

const fn is_empty(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> bool {
    xmin >= xmax || ymin >= ymax
}

const fn sanitize(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Rect {
    if is_empty(xmin, ymin, xmax, ymax) {
        return Rect::empty();
    }
    Rect {
        xmin,
        ymin,
        xmax,
        ymax,
    }
}

const fn min(a: i32, b: i32) -> i32 {
    if a > b {
        b
    } else {
        a
    }
}

const fn max(a: i32, b: i32) -> i32 {
    if a > b {
        a
    } else {
        b
    }
}
