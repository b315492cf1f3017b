/// One of the eight ways a [`super::RectMapper`] can flip and turn its input
///
/// Mirroring is applied about the middle of the input rectangle, after the optional swap of
/// the two axes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation {
    mirror_x: bool,
    mirror_y: bool,
    swap_xy: bool,
}

impl Orientation {
    /// Bit of [`Self::code`] set when x is mirrored
    pub const MIRROR_X: u8 = 1;
    /// Bit of [`Self::code`] set when y is mirrored
    pub const MIRROR_Y: u8 = 1 << 1;
    /// Bit of [`Self::code`] set when the axes are swapped
    pub const SWAP_XY: u8 = 1 << 2;

    /// No flip, no turn
    pub const IDENTITY: Self = Self::from_code(0);

    /// Builds the orientation from the low three bits of `code`
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        Self {
            mirror_x: code & Self::MIRROR_X != 0,
            mirror_y: code & Self::MIRROR_Y != 0,
            swap_xy: code & Self::SWAP_XY != 0,
        }
    }

    /// The three flags packed as `MIRROR_X | MIRROR_Y | SWAP_XY`
    #[must_use]
    pub const fn code(self) -> u8 {
        let mut code = 0;
        if self.mirror_x {
            code |= Self::MIRROR_X;
        }
        if self.mirror_y {
            code |= Self::MIRROR_Y;
        }
        if self.swap_xy {
            code |= Self::SWAP_XY;
        }
        code
    }

    /// Whether x is mirrored
    #[must_use]
    pub const fn mirror_x(self) -> bool {
        self.mirror_x
    }

    /// Whether y is mirrored
    #[must_use]
    pub const fn mirror_y(self) -> bool {
        self.mirror_y
    }

    /// Whether the axes are swapped
    #[must_use]
    pub const fn swap_xy(self) -> bool {
        self.swap_xy
    }

    /// The orientation followed by `turns` counter-clockwise quarter turns.
    ///
    /// Only `turns mod 4` matters; negative counts turn clockwise.
    #[must_use]
    pub const fn rotated(self, turns: i32) -> Self {
        match turns.rem_euclid(4) {
            1 => {
                let mirror = if self.swap_xy {
                    Self::MIRROR_Y
                } else {
                    Self::MIRROR_X
                };
                Self::from_code(self.code() ^ mirror ^ Self::SWAP_XY)
            }
            2 => Self::from_code(self.code() ^ (Self::MIRROR_X | Self::MIRROR_Y)),
            3 => {
                let mirror = if self.swap_xy {
                    Self::MIRROR_X
                } else {
                    Self::MIRROR_Y
                };
                Self::from_code(self.code() ^ mirror ^ Self::SWAP_XY)
            }
            _ => self,
        }
    }

    /// The orientation with the x mirror toggled
    #[must_use]
    pub const fn mirrored_x(self) -> Self {
        Self::from_code(self.code() ^ Self::MIRROR_X)
    }

    /// The orientation with the y mirror toggled
    #[must_use]
    pub const fn mirrored_y(self) -> Self {
        Self::from_code(self.code() ^ Self::MIRROR_Y)
    }

    /// All eight orientations, in code order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).map(Self::from_code)
    }
}
