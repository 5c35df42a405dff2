use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use bytes::{BufMut, BytesMut};

use shared::error::{Error, Result};
use shared::{TaggedBytesMut, TransportContext, TransportProtocol};

use super::{COMPRESSION_POINTER_MASK, MAX_LABEL_LENGTH, MAX_NAME_LENGTH, MAX_POINTER_OFFSET};
use crate::config::DEFAULT_PACKET_SIZE;
use crate::utils::to_dns_lowercase;

/// Append-only DNS datagram assembler with back-reference label
/// compression.
///
/// A writer belongs to exactly one query build: header fields and
/// questions are appended in order, then [`get_packet`](Self::get_packet)
/// consumes the writer and yields the finished datagram. Any write that
/// would exceed the capacity fails with
/// [`ErrBufferFull`](shared::error::Error::ErrBufferFull) and the
/// enclosing build is expected to abort; no partial packet is ever
/// emitted.
pub struct PacketWriter {
    buf: BytesMut,
    capacity: usize,
    // DNS-lowercased dotted label suffix -> byte offset of its first
    // occurrence in the packet. Offsets are only recorded below 0x4000,
    // the largest value a 14-bit pointer can carry.
    name_offsets: HashMap<String, usize>,
}

impl Default for PacketWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketWriter {
    /// Create a writer with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_PACKET_SIZE)
    }

    /// Create a writer bounded at `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
            name_offsets: HashMap::new(),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    /// Append `v` in network byte order.
    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        if self.remaining() < 2 {
            return Err(Error::ErrBufferFull);
        }
        self.buf.put_u16(v);
        Ok(())
    }

    fn write_u8(&mut self, v: u8) -> Result<()> {
        if self.remaining() < 1 {
            return Err(Error::ErrBufferFull);
        }
        self.buf.put_u8(v);
        Ok(())
    }

    fn write_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if self.remaining() < bytes.len() {
            return Err(Error::ErrBufferFull);
        }
        self.buf.put_slice(bytes);
        Ok(())
    }

    /// Encode a label sequence.
    ///
    /// Every suffix of the sequence that is already present in the packet
    /// (compared DNS-case-insensitively) is shared through a 2-byte
    /// backward pointer; the name is terminated by a zero byte only when
    /// no pointer was emitted. Label bytes are written verbatim, without
    /// case folding.
    pub fn write_labels<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<()> {
        if labels.is_empty() {
            return Err(Error::ErrEmptyLabels);
        }
        let mut encoded_len = 1; // terminating zero byte
        for label in labels {
            let label = label.as_ref();
            if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
                return Err(Error::ErrLabelTooLong);
            }
            encoded_len += 1 + label.len();
        }
        if encoded_len > MAX_NAME_LENGTH {
            return Err(Error::ErrNameTooLong);
        }

        for i in 0..labels.len() {
            let key = suffix_key(&labels[i..]);
            if let Some(&offset) = self.name_offsets.get(&key) {
                return self.write_u16(COMPRESSION_POINTER_MASK | offset as u16);
            }
            if self.buf.len() < MAX_POINTER_OFFSET {
                self.name_offsets.insert(key, self.buf.len());
            }
            let label = labels[i].as_ref();
            self.write_u8(label.len() as u8)?;
            self.write_slice(label.as_bytes())?;
        }
        self.write_u8(0)
    }

    /// Finalize into a datagram addressed to `destination`, consuming the
    /// writer.
    pub fn get_packet(self, destination: SocketAddr) -> TaggedBytesMut {
        let local_addr = match destination {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        TaggedBytesMut {
            transport: TransportContext {
                local_addr,
                peer_addr: destination,
                transport_protocol: TransportProtocol::UDP,
            },
            message: self.buf,
        }
    }
}

fn suffix_key<S: AsRef<str>>(labels: &[S]) -> String {
    let joined = labels
        .iter()
        .map(|label| label.as_ref())
        .collect::<Vec<_>>()
        .join(".");
    to_dns_lowercase(&joined)
}
