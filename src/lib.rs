use std::mem::MaybeUninit;

mod bitpack;
mod plain;

pub use bitpack::*;
pub use plain::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecoderError {
    #[error("invalid bitwidth {0}, expected a value in 1..=32")]
    InvalidBitwidth(usize),
    #[error("mask {mask:#x} does not match bitwidth {bitwidth}")]
    InvalidMask { bitwidth: usize, mask: u32 },
    #[error("insufficient input: {required} bytes required, {available} available")]
    BufferUnderrun { available: usize, required: usize },
    #[error("output buffer holds {capacity} values, {required} required")]
    OutputTooSmall { capacity: usize, required: usize },
    #[error("wrong length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("truncated bit-packed run: {required} bytes required, {available} available")]
    TruncatedRun { available: usize, required: usize },
}

/// Decodes bit-packed unsigned integers into caller-provided storage.
///
/// The number of values to decode is `output.len()`. On success the first
/// `n` slots of `output` are initialized, where `n` is the returned count.
pub trait Decoder {
    fn decode(
        &mut self,
        input: &[u8],
        bitwidth: usize,
        output: &mut [MaybeUninit<u32>],
    ) -> Result<usize, DecoderError>;
}
