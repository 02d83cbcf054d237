//! Per-record-type RDATA codec.
//!
//! RDATA is the type-specific payload of a resource record. This module
//! translates between the wire bytes and the decoded semantic value:
//! dotted-decimal for A, RFC5952 text for AAAA, raw text for TXT, a
//! dot-terminated name for CNAME, structured fields for SOA, and an
//! empty payload for the OPT pseudo-record. Any other type is a typed
//! `UnimplementedType` error in both directions.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::bytes::{put_u32_be, read_u32_be};
use crate::errors::DnsError;
use crate::name::{decode_name, encode_name};
use crate::types::RecordType;

/// Structured SOA payload, RFC1035 §3.3.13.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Soa {
    /// Primary name server for the zone.
    pub mname: String,
    /// Mailbox of the person responsible for the zone.
    pub rname: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

/// Decoded RDATA value, tagged by record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    /// Dotted-decimal IPv4 address.
    A(String),
    /// IPv6 address in RFC5952 text form.
    Aaaa(String),
    /// Raw text of a single `<character-string>`.
    Txt(String),
    /// Dot-terminated canonical name.
    Cname(String),
    /// Structured start-of-authority record.
    Soa(Soa),
    /// OPT pseudo-record payload, treated as opaque and empty.
    Opt,
}

impl RData {
    /// The record type this payload belongs to.
    pub fn record_type(&self) -> RecordType {
        match self {
            RData::A(_) => RecordType::A,
            RData::Aaaa(_) => RecordType::Aaaa,
            RData::Txt(_) => RecordType::Txt,
            RData::Cname(_) => RecordType::Cname,
            RData::Soa(_) => RecordType::Soa,
            RData::Opt => RecordType::Opt,
        }
    }
}

/// Decode an RDATA payload for the given record type.
///
/// # Arguments
/// * `rtype` - The record type, already read from the record framing.
/// * `buf` - Exactly the `rdlength` bytes of the payload.
///
/// # Returns
/// The decoded value, or `UnimplementedType` for types with no codec.
pub fn decode_rdata(rtype: RecordType, buf: &[u8]) -> Result<RData, DnsError> {
    match rtype {
        RecordType::A => {
            let octets: [u8; 4] = buf
                .try_into()
                .map_err(|_| DnsError::InvalidRecord(format!("A RDATA of {} bytes", buf.len())))?;
            Ok(RData::A(Ipv4Addr::from(octets).to_string()))
        }
        RecordType::Aaaa => {
            let octets: [u8; 16] = buf.try_into().map_err(|_| {
                DnsError::InvalidRecord(format!("AAAA RDATA of {} bytes", buf.len()))
            })?;
            // Ipv6Addr's display is the RFC5952 canonical form: the
            // longest run of zero groups collapses to `::`, a lone zero
            // group does not.
            Ok(RData::Aaaa(Ipv6Addr::from(octets).to_string()))
        }
        RecordType::Txt => {
            if buf.is_empty() {
                return Err(DnsError::InvalidRecord("empty TXT RDATA".into()));
            }
            // A single <character-string>: one length byte, then text.
            if buf[0] as usize != buf.len() - 1 {
                return Err(DnsError::InvalidRecord(format!(
                    "TXT length byte {} disagrees with {} data bytes",
                    buf[0],
                    buf.len() - 1
                )));
            }
            let text = std::str::from_utf8(&buf[1..])
                .map_err(|_| DnsError::InvalidRecord("TXT RDATA is not UTF-8".into()))?;
            Ok(RData::Txt(text.to_string()))
        }
        RecordType::Cname => {
            let (target, _) = decode_name(buf, 0)?;
            Ok(RData::Cname(target))
        }
        RecordType::Soa => {
            let (mname, mname_len) = decode_name(buf, 0)?;
            let (rname, rname_len) = decode_name(buf, mname_len)?;
            let fields = mname_len + rname_len;
            Ok(RData::Soa(Soa {
                mname,
                rname,
                serial: read_u32_be(buf, fields)?,
                refresh: read_u32_be(buf, fields + 4)?,
                retry: read_u32_be(buf, fields + 8)?,
                expire: read_u32_be(buf, fields + 12)?,
                minimum: read_u32_be(buf, fields + 16)?,
            }))
        }
        RecordType::Opt => Ok(RData::Opt),
        other => Err(DnsError::UnimplementedType(other)),
    }
}

/// Encode an RDATA payload to wire bytes.
///
/// The result never includes the 2-byte RDLENGTH prefix; the record
/// framing derives that from the returned length.
pub fn encode_rdata(rdata: &RData) -> Result<Vec<u8>, DnsError> {
    match rdata {
        RData::A(text) => {
            let addr: Ipv4Addr = text
                .parse()
                .map_err(|_| DnsError::InvalidRecord(format!("invalid IPv4 address {text:?}")))?;
            Ok(addr.octets().to_vec())
        }
        RData::Aaaa(text) => {
            let addr: Ipv6Addr = text
                .parse()
                .map_err(|_| DnsError::InvalidRecord(format!("invalid IPv6 address {text:?}")))?;
            Ok(addr.octets().to_vec())
        }
        RData::Txt(text) => {
            if text.len() > u8::MAX as usize {
                return Err(DnsError::InvalidRecord(format!(
                    "TXT data of {} bytes exceeds a character-string",
                    text.len()
                )));
            }
            let mut out = Vec::with_capacity(text.len() + 1);
            out.push(text.len() as u8);
            out.extend_from_slice(text.as_bytes());
            Ok(out)
        }
        RData::Cname(target) => encode_name(target),
        RData::Soa(soa) => {
            let mut out = encode_name(&soa.mname)?;
            out.extend(encode_name(&soa.rname)?);
            put_u32_be(&mut out, soa.serial);
            put_u32_be(&mut out, soa.refresh);
            put_u32_be(&mut out, soa.retry);
            put_u32_be(&mut out, soa.expire);
            put_u32_be(&mut out, soa.minimum);
            Ok(out)
        }
        RData::Opt => Ok(Vec::new()),
    }
}
