pub(crate) mod mapper;
pub(crate) mod orientation;
pub(crate) mod ratio;
pub(crate) mod rect;

pub use mapper::RectMapper;
pub use orientation::Orientation;
pub use ratio::{scaled_divide, scaled_multiply, Ratio};
pub use rect::Rect;
