//! DNS header codec.
//!
//! The header is exactly 12 bytes: the transaction id, two bytes of
//! bit-packed flags, and the four section counts, all big-endian.

use crate::bytes::{bit, pack_bits, put_u16_be, read_u16_be};
use crate::errors::DnsError;

/// Number of bytes in the DNS header.
pub const HEADER_LENGTH: usize = 12;

/// Structured DNS header, as defined in RFC1035 §4.1.1.
///
/// `opcode` and `rcode` are 4-bit fields and `z` is the 3-bit reserved
/// field; they are masked to width on encode. `z` must be zero on the
/// wire but a nonzero value seen on decode is carried through for
/// fidelity rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Transaction id of the query.
    pub id: u16,
    /// False for a query, true for a response.
    pub qr: bool,
    /// Kind of query: 0 standard, 1 inverse, 2 server status.
    pub opcode: u8,
    /// Authoritative answer.
    pub aa: bool,
    /// Message was truncated.
    pub tc: bool,
    /// Recursion desired.
    pub rd: bool,
    /// Recursion available.
    pub ra: bool,
    /// Reserved bits.
    pub z: u8,
    /// Response code.
    pub rcode: u8,
    /// Number of questions.
    pub qdcount: u16,
    /// Number of answer records.
    pub ancount: u16,
    /// Number of authority records.
    pub nscount: u16,
    /// Number of additional records.
    pub arcount: u16,
}

/// Decode the 12-byte DNS header.
///
/// # Arguments
/// * `buf` - At least 12 bytes; extra bytes are ignored.
///
/// # Returns
/// The structured header, or `TruncatedHeader` if fewer than 12 bytes
/// are supplied.
pub fn decode_header(buf: &[u8]) -> Result<Header, DnsError> {
    if buf.len() < HEADER_LENGTH {
        return Err(DnsError::TruncatedHeader(buf.len()));
    }

    // Byte 2 packs qr(1) opcode(4) aa(1) tc(1) rd(1), byte 3 packs
    // ra(1) z(3) rcode(4), both MSB first.
    let flags1 = buf[2];
    let flags2 = buf[3];

    Ok(Header {
        id: read_u16_be(buf, 0)?,
        qr: bit(flags1, 0),
        opcode: (flags1 >> 3) & 0x0F,
        aa: bit(flags1, 5),
        tc: bit(flags1, 6),
        rd: bit(flags1, 7),
        ra: bit(flags2, 0),
        z: (flags2 >> 4) & 0x07,
        rcode: flags2 & 0x0F,
        qdcount: read_u16_be(buf, 4)?,
        ancount: read_u16_be(buf, 6)?,
        nscount: read_u16_be(buf, 8)?,
        arcount: read_u16_be(buf, 10)?,
    })
}

/// Encode a header to its 12-byte wire form.
pub fn encode_header(header: &Header) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LENGTH);
    put_u16_be(&mut out, header.id);
    out.push(pack_bits(&[
        (header.qr as u8, 1),
        (header.opcode, 4),
        (header.aa as u8, 1),
        (header.tc as u8, 1),
        (header.rd as u8, 1),
    ]));
    out.push(pack_bits(&[
        (header.ra as u8, 1),
        (header.z, 3),
        (header.rcode, 4),
    ]));
    put_u16_be(&mut out, header.qdcount);
    put_u16_be(&mut out, header.ancount);
    put_u16_be(&mut out, header.nscount);
    put_u16_be(&mut out, header.arcount);
    out
}
