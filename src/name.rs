//! Domain-name label codec.
//!
//! Names use the `www.example.com.` presentation form with a mandatory
//! trailing dot, and the RFC1035 wire form of length-prefixed labels
//! terminated by a zero byte. Compression pointers are not supported:
//! a length byte with its two high bits set is rejected outright rather
//! than silently misparsed.

use crate::errors::DnsError;

/// Maximum length of a single label on the wire.
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum wire length of a whole name, terminator included.
pub const MAX_NAME_LENGTH: usize = 255;

/// Wire marker for a compression pointer (two high bits of a length byte).
const POINTER_MASK: u8 = 0xC0;

/// Encode a domain name to wire format.
///
/// # Arguments
/// * `name` - Dot-terminated name, e.g. `"www.example.com."`. The root
///   name encodes as a single zero byte.
///
/// # Returns
/// The wire-format bytes, or an error if a label exceeds 63 bytes, the
/// whole name exceeds 255 bytes, or an interior label is empty.
pub fn encode_name(name: &str) -> Result<Vec<u8>, DnsError> {
    let trimmed = name.strip_suffix('.').unwrap_or(name);
    let mut out = Vec::with_capacity(trimmed.len() + 2);

    if !trimmed.is_empty() {
        for label in trimmed.split('.') {
            if label.is_empty() {
                return Err(DnsError::InvalidName(format!("empty label in {name:?}")));
            }
            if label.len() > MAX_LABEL_LENGTH {
                return Err(DnsError::LabelTooLong(label.len()));
            }
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
    }
    out.push(0);

    if out.len() > MAX_NAME_LENGTH {
        return Err(DnsError::NameTooLong(out.len()));
    }
    Ok(out)
}

/// Decode a domain name from wire format.
///
/// # Arguments
/// * `buf` - The message buffer.
/// * `offset` - Offset of the first length byte.
///
/// # Returns
/// The dot-terminated name and the number of bytes consumed, terminator
/// included.
pub fn decode_name(buf: &[u8], offset: usize) -> Result<(String, usize), DnsError> {
    let mut name = String::new();
    let mut pos = offset;

    loop {
        let len = *buf.get(pos).ok_or(DnsError::TruncatedName)? as usize;
        if len == 0 {
            pos += 1;
            break;
        }
        if len as u8 & POINTER_MASK == POINTER_MASK {
            return Err(DnsError::UnsupportedNameCompression);
        }
        if len > MAX_LABEL_LENGTH {
            return Err(DnsError::LabelTooLong(len));
        }
        pos += 1;
        let end = pos + len;
        if end > buf.len() {
            return Err(DnsError::TruncatedName);
        }
        if end - offset + 1 > MAX_NAME_LENGTH {
            return Err(DnsError::NameTooLong(end - offset + 1));
        }
        let label = std::str::from_utf8(&buf[pos..end])
            .map_err(|_| DnsError::InvalidName("label is not UTF-8".into()))?;
        name.push_str(label);
        name.push('.');
        pos = end;
    }

    Ok((name, pos - offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_labels_with_length_prefixes() {
        let wire = encode_name("www.example.com.").unwrap();
        assert_eq!(
            wire,
            [
                &[3u8][..],
                b"www",
                &[7],
                b"example",
                &[3],
                b"com",
                &[0]
            ]
            .concat()
        );
    }

    #[test]
    fn root_name_is_a_single_zero_byte() {
        assert_eq!(encode_name(".").unwrap(), vec![0]);
        assert_eq!(encode_name("").unwrap(), vec![0]);
    }

    #[test]
    fn round_trips_and_reports_consumed_length() {
        let wire = encode_name("www.example.com.").unwrap();
        let (name, consumed) = decode_name(&wire, 0).unwrap();
        assert_eq!(name, "www.example.com.");
        assert_eq!(consumed, wire.len());
    }

    #[test]
    fn decodes_at_an_interior_offset() {
        let mut buf = vec![0xFF, 0xFF];
        buf.extend(encode_name("a.bc.").unwrap());
        let (name, consumed) = decode_name(&buf, 2).unwrap();
        assert_eq!(name, "a.bc.");
        assert_eq!(consumed, 6);
    }

    #[test]
    fn rejects_labels_over_63_bytes() {
        let long = format!("{}.com.", "a".repeat(64));
        assert!(matches!(encode_name(&long), Err(DnsError::LabelTooLong(64))));
    }

    #[test]
    fn rejects_names_over_255_bytes() {
        let label = "a".repeat(63);
        let long = format!("{label}.{label}.{label}.{label}.{label}.");
        assert!(matches!(encode_name(&long), Err(DnsError::NameTooLong(_))));
    }

    #[test]
    fn rejects_empty_interior_labels() {
        assert!(matches!(
            encode_name("a..b."),
            Err(DnsError::InvalidName(_))
        ));
    }

    #[test]
    fn decode_rejects_labels_over_63_bytes() {
        // Length byte 64 has the reserved 01 prefix; it must not be
        // read as an ordinary long label.
        let mut buf = vec![64u8];
        buf.extend(std::iter::repeat(b'a').take(64));
        buf.push(0);
        assert!(matches!(
            decode_name(&buf, 0),
            Err(DnsError::LabelTooLong(64))
        ));
    }

    #[test]
    fn decode_rejects_names_over_255_bytes() {
        // Four maximal labels on the wire: 4 * 64 + 1 = 257 bytes.
        let mut buf = Vec::new();
        for _ in 0..4 {
            buf.push(63u8);
            buf.extend(std::iter::repeat(b'a').take(63));
        }
        buf.push(0);
        assert!(matches!(
            decode_name(&buf, 0),
            Err(DnsError::NameTooLong(257))
        ));
    }

    #[test]
    fn rejects_compression_pointers() {
        let buf = [0xC0, 0x0C];
        assert!(matches!(
            decode_name(&buf, 0),
            Err(DnsError::UnsupportedNameCompression)
        ));
    }

    #[test]
    fn rejects_truncated_labels() {
        // Label claims 5 bytes but only 2 remain.
        let buf = [5, b'a', b'b'];
        assert!(matches!(decode_name(&buf, 0), Err(DnsError::TruncatedName)));
        // Missing terminator.
        let buf = [1, b'a'];
        assert!(matches!(decode_name(&buf, 0), Err(DnsError::TruncatedName)));
    }
}
