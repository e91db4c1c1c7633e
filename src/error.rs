use embedded_hal::{digital, spi};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{what} index {index} out of range (0..{len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{field} value {value} does not fit in {bits} bits")]
    ValueOutOfRange {
        field: &'static str,
        value: u32,
        bits: u8,
    },

    #[error("packet must be {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("SPI byte exchange failed: {0:?}")]
    Bus(spi::ErrorKind),

    #[error("select line failed: {0:?}")]
    Select(digital::ErrorKind),
}

/// Fails with [`Error::IndexOutOfRange`] unless `index < len`.
pub(crate) fn check_index(what: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange { what, index, len })
    }
}
