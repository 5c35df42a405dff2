#[cfg(test)]
mod message_test;

pub(crate) mod writer;

use std::fmt;

// DNS message constants

/// Flags of a standard query: QR=0, OPCODE=0, no other bits set.
pub(crate) const FLAGS_QUERY: u16 = 0x0000;

/// Internet class (IN).
pub(crate) const QCLASS_INTERNET: u16 = 0x0001;

/// Top bit of `qclass`; set when a unicast response is requested.
pub(crate) const QCLASS_UNICAST_RESPONSE: u16 = 0x8000;

/// The label marking a service subtype in a discovery name.
pub(crate) const SUBTYPE_LABEL: &str = "_sub";

/// Leading character of subtype discovery labels.
pub(crate) const SUBTYPE_PREFIX: char = '_';

/// Maximum length of a single label, in bytes.
pub(crate) const MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of an encoded name, in bytes.
pub(crate) const MAX_NAME_LENGTH: usize = 255;

/// Marker bits of a 2-byte compression pointer.
pub(crate) const COMPRESSION_POINTER_MASK: u16 = 0xC000;

/// Offsets at or above this value cannot be expressed in a pointer.
pub(crate) const MAX_POINTER_OFFSET: usize = 0x4000;

// A DnsType is a type of DNS request and response.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DnsType {
    A = 1,
    Ptr = 12,
    Txt = 16,
    Aaaa = 28,
    Srv = 33,
    Any = 255,

    #[default]
    Unsupported = 0,
}

impl From<u16> for DnsType {
    fn from(v: u16) -> Self {
        match v {
            1 => DnsType::A,
            12 => DnsType::Ptr,
            16 => DnsType::Txt,
            28 => DnsType::Aaaa,
            33 => DnsType::Srv,
            255 => DnsType::Any,
            _ => DnsType::Unsupported,
        }
    }
}

impl fmt::Display for DnsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            DnsType::A => "A",
            DnsType::Ptr => "PTR",
            DnsType::Txt => "TXT",
            DnsType::Aaaa => "AAAA",
            DnsType::Srv => "SRV",
            DnsType::Any => "ANY",
            _ => "Unsupported",
        };
        write!(f, "{s}")
    }
}
