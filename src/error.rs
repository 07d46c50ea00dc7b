//! Error types shared by the descriptor parser, the integral image builders and
//! the detector.
use thiserror::Error;

/// Malformed or truncated cascade descriptor.
///
/// `offset` is the index of the offending element in the flat encoding (or the
/// number of elements consumed so far for structural errors detected after
/// parsing).
#[derive(Clone, Debug, Error, PartialEq)]
#[error("invalid cascade descriptor at element {offset}: {message}")]
pub struct DescriptorFormatError {
    pub offset: usize,
    pub message: String,
}

impl DescriptorFormatError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Integral image accumulation exceeded the accumulator range.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind} integral image overflowed at pixel ({x}, {y})")]
pub struct OverflowError {
    pub kind: &'static str,
    pub x: usize,
    pub y: usize,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    DescriptorFormat(#[from] DescriptorFormatError),

    #[error(transparent)]
    Overflow(#[from] OverflowError),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;
