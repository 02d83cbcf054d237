//! Fixed-width big-endian primitives and bit manipulation.
//!
//! Every multi-byte integer on the DNS wire is big-endian, and the
//! header packs its flags into two bytes. These helpers are the only
//! place raw offsets are bounds-checked; everything above them works in
//! terms of `DnsError` rather than panics.

use crate::errors::DnsError;

/// Read a big-endian `u16` at `offset`.
///
/// # Arguments
/// * `buf` - The buffer to read from.
/// * `offset` - Byte offset of the most significant byte.
///
/// # Returns
/// The value, or `DnsError::OutOfBounds` if fewer than 2 bytes remain.
pub fn read_u16_be(buf: &[u8], offset: usize) -> Result<u16, DnsError> {
    if offset + 2 > buf.len() {
        return Err(DnsError::OutOfBounds {
            offset,
            width: 2,
            len: buf.len(),
        });
    }
    Ok(u16::from_be_bytes([buf[offset], buf[offset + 1]]))
}

/// Read a big-endian `u32` at `offset`.
///
/// # Arguments
/// * `buf` - The buffer to read from.
/// * `offset` - Byte offset of the most significant byte.
///
/// # Returns
/// The value, or `DnsError::OutOfBounds` if fewer than 4 bytes remain.
pub fn read_u32_be(buf: &[u8], offset: usize) -> Result<u32, DnsError> {
    if offset + 4 > buf.len() {
        return Err(DnsError::OutOfBounds {
            offset,
            width: 4,
            len: buf.len(),
        });
    }
    Ok(u32::from_be_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ]))
}

/// Append a big-endian `u16` to an output buffer.
pub fn put_u16_be(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Append a big-endian `u32` to an output buffer.
pub fn put_u32_be(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Extract one bit from a byte, indexed from the most significant bit.
///
/// # Arguments
/// * `byte` - The byte to inspect.
/// * `index` - Bit index, 0 being the MSB and 7 the LSB.
///
/// # Returns
/// `true` if the bit is set.
pub fn bit(byte: u8, index: u8) -> bool {
    debug_assert!(index < 8);
    byte & (0x80 >> index) != 0
}

/// Compose a byte from ordered `(value, width)` pairs, MSB first.
///
/// Each value is masked to its declared width before packing, matching
/// wire semantics where these are hardware-width fields. The widths
/// should sum to 8; any unused low bits are left zero.
///
/// # Arguments
/// * `fields` - `(value, bit_width)` pairs from most to least significant.
///
/// # Returns
/// The packed byte.
pub fn pack_bits(fields: &[(u8, u8)]) -> u8 {
    let mut out = 0u8;
    let mut remaining = 8u8;
    for &(value, width) in fields {
        debug_assert!(width <= remaining);
        remaining -= width;
        let mask = if width >= 8 { 0xFF } else { (1u8 << width) - 1 };
        out |= (value & mask) << remaining;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_u16() {
        let buf = [0xAB, 0xCD, 0x01];
        assert_eq!(read_u16_be(&buf, 0).unwrap(), 0xABCD);
        assert_eq!(read_u16_be(&buf, 1).unwrap(), 0xCD01);
    }

    #[test]
    fn reads_big_endian_u32() {
        let buf = [0x00, 0x00, 0x0E, 0x10];
        assert_eq!(read_u32_be(&buf, 0).unwrap(), 3600);
    }

    #[test]
    fn read_past_end_is_out_of_bounds() {
        let buf = [0xFF];
        assert!(matches!(
            read_u16_be(&buf, 0),
            Err(DnsError::OutOfBounds { offset: 0, width: 2, len: 1 })
        ));
        assert!(matches!(
            read_u32_be(&buf, 1),
            Err(DnsError::OutOfBounds { offset: 1, width: 4, len: 1 })
        ));
    }

    #[test]
    fn put_is_the_inverse_of_read() {
        let mut out = Vec::new();
        put_u16_be(&mut out, 43981);
        put_u32_be(&mut out, 0xDEADBEEF);
        assert_eq!(read_u16_be(&out, 0).unwrap(), 43981);
        assert_eq!(read_u32_be(&out, 2).unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn bit_indexes_from_msb() {
        assert!(bit(0x80, 0));
        assert!(!bit(0x80, 7));
        assert!(bit(0x01, 7));
        assert!(bit(0b0000_1000, 4));
    }

    #[test]
    fn pack_bits_composes_msb_first() {
        // qr(1) opcode(4) aa(1) tc(1) rd(1) with qr=0, opcode=0, rd=1
        assert_eq!(pack_bits(&[(0, 1), (0, 4), (0, 1), (0, 1), (1, 1)]), 0x01);
        // ra(1) z(3) rcode(4)
        assert_eq!(pack_bits(&[(1, 1), (0, 3), (3, 4)]), 0x83);
    }

    #[test]
    fn pack_bits_masks_overwide_values() {
        // opcode wider than 4 bits is truncated, not rejected
        assert_eq!(pack_bits(&[(0, 1), (0x1F, 4), (0, 1), (0, 1), (0, 1)]), 0x78);
    }
}
