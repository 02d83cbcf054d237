//! Record types, classes and response codes from the IANA DNS registry.

use std::fmt;

/// The Internet class. The only class this resolver serves.
pub const CLASS_IN: u16 = 1;

/// Response code: no error condition.
pub const RCODE_NOERROR: u8 = 0;
/// Response code: the name server was unable to interpret the query.
pub const RCODE_FORMERR: u8 = 1;
/// Response code: server failure.
pub const RCODE_SERVFAIL: u8 = 2;
/// Response code: the domain name referenced in the query does not exist.
pub const RCODE_NXDOMAIN: u8 = 3;
/// Response code: the requested kind of query is not implemented.
pub const RCODE_NOTIMP: u8 = 4;
/// Response code: the server refuses to answer for policy reasons.
pub const RCODE_REFUSED: u8 = 5;

/// Resource record type, per the IANA DNS parameters registry.
///
/// The registry keeps growing, so values without a named variant are
/// carried opaquely in `Unknown` and round-trip unchanged instead of
/// failing decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    Ns,
    Cname,
    Soa,
    Ptr,
    Mx,
    Txt,
    Aaaa,
    Opt,
    Unknown(u16),
}

impl RecordType {
    /// The numeric wire value of this record type.
    pub fn value(self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Ns => 2,
            RecordType::Cname => 5,
            RecordType::Soa => 6,
            RecordType::Ptr => 12,
            RecordType::Mx => 15,
            RecordType::Txt => 16,
            RecordType::Aaaa => 28,
            RecordType::Opt => 41,
            RecordType::Unknown(value) => value,
        }
    }

    /// Parse a record type from its presentation name, as used by the
    /// dns-json `type` query parameter. Numeric strings are accepted for
    /// types without a mnemonic.
    pub fn from_name(name: &str) -> Option<RecordType> {
        match name.to_ascii_uppercase().as_str() {
            "A" => Some(RecordType::A),
            "NS" => Some(RecordType::Ns),
            "CNAME" => Some(RecordType::Cname),
            "SOA" => Some(RecordType::Soa),
            "PTR" => Some(RecordType::Ptr),
            "MX" => Some(RecordType::Mx),
            "TXT" => Some(RecordType::Txt),
            "AAAA" => Some(RecordType::Aaaa),
            "OPT" => Some(RecordType::Opt),
            other => other.parse::<u16>().ok().map(RecordType::from),
        }
    }
}

impl From<u16> for RecordType {
    fn from(value: u16) -> Self {
        match value {
            1 => RecordType::A,
            2 => RecordType::Ns,
            5 => RecordType::Cname,
            6 => RecordType::Soa,
            12 => RecordType::Ptr,
            15 => RecordType::Mx,
            16 => RecordType::Txt,
            28 => RecordType::Aaaa,
            41 => RecordType::Opt,
            other => RecordType::Unknown(other),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => write!(f, "A"),
            RecordType::Ns => write!(f, "NS"),
            RecordType::Cname => write!(f, "CNAME"),
            RecordType::Soa => write!(f, "SOA"),
            RecordType::Ptr => write!(f, "PTR"),
            RecordType::Mx => write!(f, "MX"),
            RecordType::Txt => write!(f, "TXT"),
            RecordType::Aaaa => write!(f, "AAAA"),
            RecordType::Opt => write!(f, "OPT"),
            RecordType::Unknown(value) => write!(f, "TYPE{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_round_trip() {
        for value in [1u16, 2, 5, 6, 12, 15, 16, 28, 41] {
            assert_eq!(RecordType::from(value).value(), value);
        }
    }

    #[test]
    fn unknown_values_are_carried_opaquely() {
        let nsec3 = RecordType::from(50);
        assert_eq!(nsec3, RecordType::Unknown(50));
        assert_eq!(nsec3.value(), 50);
        assert_eq!(nsec3.to_string(), "TYPE50");
    }

    #[test]
    fn parses_presentation_names() {
        assert_eq!(RecordType::from_name("aaaa"), Some(RecordType::Aaaa));
        assert_eq!(RecordType::from_name("TXT"), Some(RecordType::Txt));
        assert_eq!(RecordType::from_name("50"), Some(RecordType::Unknown(50)));
        assert_eq!(RecordType::from_name("bogus"), None);
    }
}
