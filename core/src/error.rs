use thiserror::Error;

pub type Result<T> = std::result::Result<T, CgaError>;

/// Programming errors raised by the driver core.
///
/// Hardware writes never fail, so everything here is a caller bug: a pixel
/// outside the 320x200 screen, a color that does not fit in two bits, a
/// palette the adapter does not have, or a dump of the wrong size.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CgaError {
    #[error("pixel ({x}, {y}) is outside the 320x200 screen")]
    OutOfRange { x: usize, y: usize },

    #[error("color index {0} does not fit in two bits")]
    InvalidColor(u8),

    #[error("palette {0} does not exist (expected 0, 1 or 2)")]
    InvalidPalette(u8),

    #[error("screen dump is {actual} bytes (expected {expected})")]
    BufferSize { expected: usize, actual: usize },
}
