use crate::DecoderError;

const I32_WIDTH: usize = 4;

/// Decodes a 4 byte little-endian two's complement integer, sign-extended to `i64`.
pub fn decode_le_i32(data: &[u8]) -> Result<i64, DecoderError> {
    let bytes: &[u8; I32_WIDTH] = data.try_into().map_err(|_| {
        log::debug!("expected {I32_WIDTH} bytes for an int32, got {}", data.len());
        DecoderError::WrongLength {
            expected: I32_WIDTH,
            actual: data.len(),
        }
    })?;

    let x = bytes
        .iter()
        .rev()
        .fold(0u32, |x, &byte| (x << 8) | u32::from(byte));
    Ok(i64::from(x as i32))
}

/// Reads an int32 length prefix, returning it with the bytes that follow it.
pub fn read_le_i32_prefix(data: &[u8]) -> Result<(i64, &[u8]), DecoderError> {
    let Some((prefix, rest)) = data.split_first_chunk::<I32_WIDTH>() else {
        log::debug!("length prefix needs {I32_WIDTH} bytes, got {}", data.len());
        return Err(DecoderError::WrongLength {
            expected: I32_WIDTH,
            actual: data.len(),
        });
    };
    Ok((decode_le_i32(prefix)?, rest))
}
