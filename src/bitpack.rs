use crate::{Decoder, DecoderError};
use std::mem::MaybeUninit;

pub const MAX_BITWIDTH: usize = 32;

/// Returns the mask selecting the low `bitwidth` bits of a value.
#[inline]
pub fn mask_for_bits(bitwidth: usize) -> u32 {
    u32::try_from(bitwidth)
        .ok()
        .and_then(|w| 1u32.checked_shl(w))
        .map_or(u32::MAX, |v| v - 1)
}

/// Number of bytes needed to hold a single value of `bitwidth` bits.
#[inline]
pub fn byte_width(bitwidth: usize) -> usize {
    bitwidth.div_ceil(8)
}

/// Smallest bitwidth able to represent every value in `0..=value`.
#[inline]
pub fn width_from_max_int(value: u32) -> usize {
    (u32::BITS - value.leading_zeros()) as usize
}

fn check_bitwidth(bitwidth: usize) -> Result<(), DecoderError> {
    if bitwidth == 0 || bitwidth > MAX_BITWIDTH {
        log::debug!("rejecting bitwidth {bitwidth}");
        return Err(DecoderError::InvalidBitwidth(bitwidth));
    }
    Ok(())
}

/// Returns the bit budget for `total` values, or the underrun it would cause.
fn check_input(input_len: usize, total: usize, bitwidth: usize) -> Result<usize, DecoderError> {
    let available_bits = input_len.saturating_mul(8);
    match total.checked_mul(bitwidth) {
        Some(bits) if bits <= available_bits => Ok(bits),
        bits => {
            let required = bits.map_or(usize::MAX, |bits| bits.div_ceil(8));
            log::debug!(
                "bit-packed input underrun: {total} values of {bitwidth} bits need {required} bytes, got {input_len}"
            );
            Err(DecoderError::BufferUnderrun {
                available: input_len,
                required,
            })
        }
    }
}

fn check_output(capacity: usize, total: usize) -> Result<(), DecoderError> {
    if capacity < total {
        log::debug!("output holds {capacity} values, {total} requested");
        return Err(DecoderError::OutputTooSmall {
            capacity,
            required: total,
        });
    }
    Ok(())
}

/// LSB-first window over the input bytes.
///
/// `bits_wnd_l` is the number of bits loaded into `b`, `bits_wnd_r` the number
/// of those already consumed. While a value is pending no more than 31 unread
/// bits plus one spent byte are held, so the loaded range never exceeds 48 bits.
struct Window<'a> {
    data: &'a [u8],
    current_byte: usize,
    b: u64,
    bits_wnd_l: usize,
    bits_wnd_r: usize,
}

impl<'a> Window<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            current_byte: 0,
            b: data.first().copied().map_or(0, u64::from),
            bits_wnd_l: 8,
            bits_wnd_r: 0,
        }
    }

    #[inline(always)]
    fn drop_byte(&mut self) {
        self.b >>= 8;
        self.bits_wnd_l -= 8;
        self.bits_wnd_r -= 8;
    }

    #[inline(always)]
    fn unread(&self) -> usize {
        self.bits_wnd_l - self.bits_wnd_r
    }

    #[inline(always)]
    fn take(&mut self, bitwidth: usize, mask: u32) -> u32 {
        let value = (self.b >> self.bits_wnd_r) as u32 & mask;
        self.bits_wnd_r += bitwidth;
        value
    }

    #[inline(always)]
    fn load_next(&mut self) -> bool {
        match self.data.get(self.current_byte + 1) {
            Some(&byte) => {
                self.current_byte += 1;
                self.b |= u64::from(byte) << self.bits_wnd_l;
                self.bits_wnd_l += 8;
                true
            }
            None => false,
        }
    }
}

/// Runs the window until `budget` bits have been emitted, handing each value
/// and its index to `emit`. Callers validate the budget against the input first.
#[inline(always)]
fn unpack_with(
    data: &[u8],
    mask: u32,
    mut budget: usize,
    bitwidth: usize,
    mut emit: impl FnMut(usize, u32),
) -> Result<usize, DecoderError> {
    let mut window = Window::new(data);
    let mut idx = 0;

    while budget >= bitwidth {
        if window.bits_wnd_r >= 8 {
            window.drop_byte();
        } else if window.unread() >= bitwidth {
            emit(idx, window.take(bitwidth, mask));
            idx += 1;
            budget -= bitwidth;
        } else if !window.load_next() {
            return Err(DecoderError::BufferUnderrun {
                available: data.len(),
                required: (idx * bitwidth + budget).div_ceil(8),
            });
        }
    }

    Ok(idx)
}

/// Unpacks `total` values of `bitwidth` bits from `data` into `out[..total]`.
///
/// `mask` must equal [`mask_for_bits`]`(bitwidth)`. All preconditions are
/// checked before anything is written, so on error `out` is left untouched.
pub fn unpack(
    data: &[u8],
    mask: u32,
    out: &mut [u32],
    total: usize,
    bitwidth: usize,
) -> Result<usize, DecoderError> {
    check_bitwidth(bitwidth)?;
    if mask != mask_for_bits(bitwidth) {
        log::debug!("mask {mask:#x} inconsistent with bitwidth {bitwidth}");
        return Err(DecoderError::InvalidMask { bitwidth, mask });
    }
    let budget = check_input(data.len(), total, bitwidth)?;
    check_output(out.len(), total)?;

    unpack_with(data, mask, budget, bitwidth, |i, v| out[i] = v)
}

/// Decodes one bit-packed run of the RLE/bit-packing hybrid encoding.
///
/// `header` is the run's already decoded varint header; its upper bits hold
/// the number of 8-value groups, the low bit only tags the run kind. The run
/// occupies the first `bitwidth * count / 8` bytes of `data`. Returns the
/// number of values written and the number of bytes consumed.
pub fn read_bitpacked_run(
    data: &[u8],
    header: u32,
    bitwidth: usize,
    out: &mut [u32],
) -> Result<(usize, usize), DecoderError> {
    check_bitwidth(bitwidth)?;

    let count = (header >> 1) as usize * 8;
    let byte_count = bitwidth * count / 8;
    let Some(run) = data.get(..byte_count) else {
        log::debug!(
            "bit-packed run of {count} values needs {byte_count} bytes, got {}",
            data.len()
        );
        return Err(DecoderError::TruncatedRun {
            available: data.len(),
            required: byte_count,
        });
    };

    let written = unpack(run, mask_for_bits(bitwidth), out, count, bitwidth)?;
    log::trace!("decoded bit-packed run: {written} values, {byte_count} bytes, bitwidth {bitwidth}");
    Ok((written, byte_count))
}

/// Portable scalar decoder for bitwidths up to 32.
#[derive(Default, Debug, Clone, Copy)]
pub struct BitpackDecoder;

impl Decoder for BitpackDecoder {
    fn decode(
        &mut self,
        input: &[u8],
        bitwidth: usize,
        output: &mut [MaybeUninit<u32>],
    ) -> Result<usize, DecoderError> {
        check_bitwidth(bitwidth)?;

        let num_elements = output.len();
        let budget = check_input(input.len(), num_elements, bitwidth)?;

        unpack_with(input, mask_for_bits(bitwidth), budget, bitwidth, |i, v| {
            output[i].write(v);
        })
    }
}
