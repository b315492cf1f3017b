use std::{
    fmt::Display,
    ops::{Div, Mul},
};

/// A reduced fraction `p/q` used to scale coordinates without floating-point drift.
///
/// The denominator is always strictly positive, the sign lives in the numerator, and the
/// fraction is kept in lowest terms. Zero is stored as `0/1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
    p: i64,
    q: i64,
}

impl Ratio {
    /// Creates the reduced fraction `p/q`
    ///
    /// # Panics
    ///
    /// Panics if `q` is zero. Ratios are only built from the extents of non-empty rectangles,
    /// so a zero denominator is a bug in the caller.
    #[must_use]
    pub fn new(p: i32, q: i32) -> Self {
        assert!(q != 0, "division by zero in ratio {p}/{q}");
        if p == 0 {
            return Self { p: 0, q: 1 };
        }
        let (mut p, mut q) = (i64::from(p), i64::from(q));
        if q < 0 {
            p = -p;
            q = -q;
        }
        let gcd = gcd(p.abs(), q);
        Self {
            p: p / gcd,
            q: q / gcd,
        }
    }

    /// The numerator, carrying the sign
    #[must_use]
    pub const fn numerator(&self) -> i64 {
        self.p
    }

    /// The denominator, always strictly positive
    #[must_use]
    pub const fn denominator(&self) -> i64 {
        self.q
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Self { p: 1, q: 1 }
    }
}

impl Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.p, self.q)
    }
}

/// Computes `n * ratio` rounded half away from zero
#[must_use]
pub fn scaled_multiply(n: i32, ratio: Ratio) -> i32 {
    rounded_quotient(i64::from(n) * ratio.p, ratio.q)
}

/// Computes `n / ratio` rounded half away from zero
///
/// # Panics
///
/// Panics if the ratio is zero.
#[must_use]
pub fn scaled_divide(n: i32, ratio: Ratio) -> i32 {
    assert!(ratio.p != 0, "division of {n} by a zero ratio");
    // rounded_quotient needs a positive divisor
    let (x, divisor) = if ratio.p < 0 {
        (-(i64::from(n) * ratio.q), -ratio.p)
    } else {
        (i64::from(n) * ratio.q, ratio.p)
    };
    rounded_quotient(x, divisor)
}

/// `x / divisor` for a positive divisor, adding half the (truncated) divisor to the magnitude
fn rounded_quotient(x: i64, divisor: i64) -> i32 {
    let half = divisor / 2;
    let quotient = if x >= 0 {
        (x + half) / divisor
    } else {
        -((half - x) / divisor)
    };
    saturate(quotient)
}

#[allow(clippy::cast_possible_truncation)]
const fn saturate(value: i64) -> i32 {
    if value > i32::MAX as i64 {
        i32::MAX
    } else if value < i32::MIN as i64 {
        i32::MIN
    } else {
        value as i32
    }
}

const fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Mul<Ratio> for i32 {
    type Output = Self;

    fn mul(self, rhs: Ratio) -> Self::Output {
        scaled_multiply(self, rhs)
    }
}

impl Div<Ratio> for i32 {
    type Output = Self;

    fn div(self, rhs: Ratio) -> Self::Output {
        scaled_divide(self, rhs)
    }
}
