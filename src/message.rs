//! Whole-message assembly.
//!
//! A message is the 12-byte header followed by the question, answer,
//! authority and additional sections, with the header counts driving
//! how many entries each section holds.

use crate::errors::DnsError;
use crate::header::{decode_header, encode_header, Header, HEADER_LENGTH};
use crate::record::{
    decode_question, decode_resource_record, encode_question, encode_resource_record, Question,
    ResourceRecord,
};

/// A complete DNS message.
///
/// Immutable value object: decode builds it fresh from a buffer, encode
/// reads it without mutation. After decode, each section length equals
/// the corresponding header count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    /// Authority section.
    pub name_servers: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

/// Decode a complete DNS message.
///
/// # Arguments
/// * `buf` - One complete message in wire format.
///
/// # Returns
/// The decoded message, or `TruncatedMessage` when a section count
/// claims records the buffer does not hold.
pub fn decode(buf: &[u8]) -> Result<Message, DnsError> {
    let header = decode_header(buf)?;
    let mut cursor = HEADER_LENGTH;

    let mut questions = Vec::with_capacity(header.qdcount as usize);
    for _ in 0..header.qdcount {
        if cursor >= buf.len() {
            return Err(DnsError::TruncatedMessage);
        }
        let (question, consumed) = decode_question(buf, cursor)?;
        questions.push(question);
        cursor += consumed;
    }

    let mut sections = [
        (header.ancount, Vec::new()),
        (header.nscount, Vec::new()),
        (header.arcount, Vec::new()),
    ];
    for (count, records) in sections.iter_mut() {
        for _ in 0..*count {
            if cursor >= buf.len() {
                return Err(DnsError::TruncatedMessage);
            }
            let (record, consumed) = decode_resource_record(buf, cursor)?;
            records.push(record);
            cursor += consumed;
        }
    }
    let [(_, answers), (_, name_servers), (_, additionals)] = sections;

    Ok(Message {
        header,
        questions,
        answers,
        name_servers,
        additionals,
    })
}

/// Encode a complete DNS message.
///
/// The four section counts are recomputed from the actual list lengths
/// rather than trusted from a possibly stale header.
pub fn encode(message: &Message) -> Result<Vec<u8>, DnsError> {
    let header = Header {
        qdcount: message.questions.len() as u16,
        ancount: message.answers.len() as u16,
        nscount: message.name_servers.len() as u16,
        arcount: message.additionals.len() as u16,
        ..message.header.clone()
    };

    let mut out = encode_header(&header);
    for question in &message.questions {
        out.extend(encode_question(question)?);
    }
    for record in message
        .answers
        .iter()
        .chain(&message.name_servers)
        .chain(&message.additionals)
    {
        out.extend(encode_resource_record(record)?);
    }
    Ok(out)
}
