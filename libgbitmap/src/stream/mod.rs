pub(crate) mod error;
pub(crate) mod reader;

pub use error::FormatError;
pub use reader::ByteReader;
