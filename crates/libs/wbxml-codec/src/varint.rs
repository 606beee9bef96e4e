//! Multi-byte unsigned integers (`mb_u_int32`).
//!
//! Seven data bits per byte, most significant group first, high bit set on
//! every byte except the last.

use crate::buffer::InputBuffer;
use crate::error::{CodecError, Result};

/// Bytes needed for any `u32`.
pub const MAX_U32_LEN: usize = 5;

/// Appends the encoding of `value` to `out` and returns the bytes written.
pub fn write_u32(out: &mut Vec<u8>, value: u32) -> usize {
    let mut groups = [0u8; MAX_U32_LEN];
    let mut len = 0;
    let mut rest = value;
    loop {
        groups[len] = (rest & 0x7F) as u8;
        len += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    for i in (1..len).rev() {
        out.push(groups[i] | 0x80);
    }
    out.push(groups[0]);
    len
}

/// Number of bytes `write_u32` produces for `value`.
pub fn encoded_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Reads one integer, failing after `max_bytes` continuation bytes or on
/// overflow.
pub fn read_u32(input: &mut InputBuffer<'_>, max_bytes: usize) -> Result<u32> {
    let start = input.offset();
    let mut value: u32 = 0;
    for _ in 0..max_bytes.clamp(1, MAX_U32_LEN) {
        let byte = input.read_byte()?;
        if value > (u32::MAX >> 7) {
            return Err(CodecError::MalformedLength { offset: start });
        }
        value = (value << 7) | u32::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(CodecError::MalformedLength { offset: start })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u32) -> Vec<u8> {
        let mut out = Vec::new();
        write_u32(&mut out, value);
        out
    }

    #[test]
    fn single_byte_below_128() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(5), vec![0x05]);
        assert_eq!(encode(127), vec![0x7F]);
    }

    #[test]
    fn most_significant_group_first() {
        assert_eq!(encode(128), vec![0x81, 0x00]);
        assert_eq!(encode(0xA0), vec![0x81, 0x20]);
        assert_eq!(encode(16_383), vec![0xFF, 0x7F]);
        assert_eq!(encode(16_384), vec![0x81, 0x80, 0x00]);
        assert_eq!(encode(u32::MAX), vec![0x8F, 0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn encoded_len_matches_writer() {
        for value in [0, 1, 127, 128, 16_383, 16_384, 2_097_151, 2_097_152, u32::MAX] {
            assert_eq!(encoded_len(value), encode(value).len(), "value {value}");
        }
    }

    #[test]
    fn reads_back_written_values() {
        for value in [0, 127, 128, 300, 70_000, u32::MAX] {
            let bytes = encode(value);
            let mut input = InputBuffer::new(&bytes);
            assert_eq!(read_u32(&mut input, MAX_U32_LEN).expect("read"), value);
            assert_eq!(input.bytes_left(), 0);
        }
    }

    #[test]
    fn rejects_runaway_continuation() {
        let bytes = [0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        let mut input = InputBuffer::new(&bytes);
        assert!(matches!(
            read_u32(&mut input, MAX_U32_LEN),
            Err(CodecError::MalformedLength { offset: 0 })
        ));
    }

    #[test]
    fn honours_smaller_byte_limit() {
        let bytes = encode(16_384);
        let mut input = InputBuffer::new(&bytes);
        assert!(matches!(read_u32(&mut input, 2), Err(CodecError::MalformedLength { .. })));
    }

    #[test]
    fn rejects_overflow() {
        let bytes = [0x9F, 0xFF, 0xFF, 0xFF, 0x7F];
        let mut input = InputBuffer::new(&bytes);
        assert!(matches!(
            read_u32(&mut input, MAX_U32_LEN),
            Err(CodecError::MalformedLength { .. })
        ));
    }

    #[test]
    fn truncated_continuation_is_truncated() {
        let bytes = [0x81];
        let mut input = InputBuffer::new(&bytes);
        assert!(matches!(
            read_u32(&mut input, MAX_U32_LEN),
            Err(CodecError::Truncated { .. })
        ));
    }
}
