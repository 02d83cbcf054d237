//! Question and resource-record framing.
//!
//! A question is `name ++ type ++ class`; a resource record adds
//! `ttl ++ rdlength ++ rdata`. RDLENGTH is a wire-only quantity: it is
//! recomputed from the encoded payload on encode and validated against
//! the buffer on decode, never stored in the model.

use crate::bytes::{put_u16_be, put_u32_be, read_u16_be, read_u32_be};
use crate::errors::DnsError;
use crate::name::{decode_name, encode_name};
use crate::rdata::{decode_rdata, encode_rdata, RData};
use crate::types::RecordType;

/// One entry of the question section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Dot-terminated name being queried.
    pub name: String,
    /// Record type requested.
    pub qtype: RecordType,
    /// Record class requested, normally `CLASS_IN`.
    pub class: u16,
}

/// One resource record of the answer, authority or additional section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Dot-terminated owner name.
    pub name: String,
    /// Record type of the payload.
    pub rtype: RecordType,
    /// Record class, normally `CLASS_IN`.
    pub class: u16,
    /// Seconds the record may be cached.
    pub ttl: u32,
    /// Decoded payload.
    pub rdata: RData,
}

/// Decode one question at `offset`.
///
/// # Returns
/// The question and the number of bytes consumed.
pub fn decode_question(buf: &[u8], offset: usize) -> Result<(Question, usize), DnsError> {
    let (name, name_len) = decode_name(buf, offset)?;
    let qtype = read_u16_be(buf, offset + name_len)?;
    let class = read_u16_be(buf, offset + name_len + 2)?;
    Ok((
        Question {
            name,
            qtype: RecordType::from(qtype),
            class,
        },
        name_len + 4,
    ))
}

/// Encode one question to wire bytes.
pub fn encode_question(question: &Question) -> Result<Vec<u8>, DnsError> {
    let mut out = encode_name(&question.name)?;
    put_u16_be(&mut out, question.qtype.value());
    put_u16_be(&mut out, question.class);
    Ok(out)
}

/// Decode one resource record at `offset`.
///
/// # Returns
/// The record and the number of bytes consumed, or `InvalidRecord` when
/// the buffer is exhausted at entry or RDLENGTH runs past its end.
pub fn decode_resource_record(
    buf: &[u8],
    offset: usize,
) -> Result<(ResourceRecord, usize), DnsError> {
    if offset >= buf.len() {
        return Err(DnsError::InvalidRecord("no bytes left for record".into()));
    }

    let (name, name_len) = decode_name(buf, offset)?;
    let fields = offset + name_len;
    let rtype = RecordType::from(read_u16_be(buf, fields)?);
    let class = read_u16_be(buf, fields + 2)?;
    let ttl = read_u32_be(buf, fields + 4)?;
    let rdlength = read_u16_be(buf, fields + 8)? as usize;

    let rdata_start = fields + 10;
    let rdata_end = rdata_start + rdlength;
    if rdata_end > buf.len() {
        return Err(DnsError::InvalidRecord(format!(
            "RDLENGTH {rdlength} runs past the buffer end"
        )));
    }
    let rdata = decode_rdata(rtype, &buf[rdata_start..rdata_end])?;

    Ok((
        ResourceRecord {
            name,
            rtype,
            class,
            ttl,
            rdata,
        },
        name_len + 10 + rdlength,
    ))
}

/// Encode one resource record to wire bytes.
///
/// The payload is encoded first so its length can be written as
/// RDLENGTH.
pub fn encode_resource_record(record: &ResourceRecord) -> Result<Vec<u8>, DnsError> {
    let rdata = encode_rdata(&record.rdata)?;
    let mut out = encode_name(&record.name)?;
    put_u16_be(&mut out, record.rtype.value());
    put_u16_be(&mut out, record.class);
    put_u32_be(&mut out, record.ttl);
    put_u16_be(&mut out, rdata.len() as u16);
    out.extend(rdata);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CLASS_IN;

    fn a_record() -> ResourceRecord {
        ResourceRecord {
            name: "www.example.com.".into(),
            rtype: RecordType::A,
            class: CLASS_IN,
            ttl: 3600,
            rdata: RData::A("93.184.216.34".into()),
        }
    }

    #[test]
    fn question_round_trips() {
        let question = Question {
            name: "www.example.com.".into(),
            qtype: RecordType::A,
            class: CLASS_IN,
        };
        let wire = encode_question(&question).unwrap();
        let (decoded, consumed) = decode_question(&wire, 0).unwrap();
        assert_eq!(decoded, question);
        assert_eq!(consumed, wire.len());
    }

    #[test]
    fn question_decodes_at_an_offset() {
        let mut buf = vec![0u8; 12];
        let question = Question {
            name: "eth.link.".into(),
            qtype: RecordType::Txt,
            class: CLASS_IN,
        };
        buf.extend(encode_question(&question).unwrap());
        let (decoded, consumed) = decode_question(&buf, 12).unwrap();
        assert_eq!(decoded, question);
        assert_eq!(consumed, buf.len() - 12);
    }

    #[test]
    fn resource_record_round_trips() {
        let record = a_record();
        let wire = encode_resource_record(&record).unwrap();
        let (decoded, consumed) = decode_resource_record(&wire, 0).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(consumed, wire.len());
    }

    #[test]
    fn rdlength_is_derived_from_the_payload() {
        let wire = encode_resource_record(&a_record()).unwrap();
        // name(17) + type(2) + class(2) + ttl(4) then RDLENGTH
        let rdlength = read_u16_be(&wire, 25).unwrap();
        assert_eq!(rdlength, 4);
    }

    #[test]
    fn empty_buffer_is_an_invalid_record() {
        assert!(matches!(
            decode_resource_record(&[], 0),
            Err(DnsError::InvalidRecord(_))
        ));
        let wire = encode_resource_record(&a_record()).unwrap();
        assert!(matches!(
            decode_resource_record(&wire, wire.len()),
            Err(DnsError::InvalidRecord(_))
        ));
    }

    #[test]
    fn overlong_rdlength_is_an_invalid_record() {
        let mut wire = encode_resource_record(&a_record()).unwrap();
        wire[26] = 0xFF; // inflate RDLENGTH past the buffer end
        assert!(matches!(
            decode_resource_record(&wire, 0),
            Err(DnsError::InvalidRecord(_))
        ));
    }

    #[test]
    fn unknown_record_types_fail_with_a_typed_error() {
        let mut wire = encode_resource_record(&a_record()).unwrap();
        wire[18] = 50; // rewrite the type field to NSEC3
        assert!(matches!(
            decode_resource_record(&wire, 0),
            Err(DnsError::UnimplementedType(RecordType::Unknown(50)))
        ));
    }
}
