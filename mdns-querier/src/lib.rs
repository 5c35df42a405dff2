//! # mdns-querier
//!
//! An mDNS (Multicast DNS, [RFC 6762]) query engine for service discovery.
//!
//! On behalf of a service-discovery client, this crate builds compliant DNS
//! query packets that discover services of a given type (and optional
//! subtypes, [RFC 6763]) on the local link, and that refresh known-answer
//! records (TXT, SRV, A, AAAA) for services whose cached entries are near
//! expiry. Finished packets are emitted on both the IPv4 (224.0.0.251) and
//! IPv6 (ff02::fb) mDNS groups, on the standard port 5353 plus any
//! configured auxiliary ports, requesting either unicast or multicast
//! responses.
//!
//! The crate is a querier only: it neither answers questions nor decodes
//! responses. The socket layer is abstracted behind the [`SocketClient`]
//! trait so the engine can be driven by any I/O setup (or none, in tests).
//!
//! ## Building a query
//!
//! A [`QueryBuilder`] is single-use: construct it with a weakly-held
//! transport, a fresh [`PacketWriter`], and a snapshot of the cached
//! services to refresh, then invoke it once.
//!
//! ```rust,ignore
//! let client: Arc<dyn SocketClient + Send + Sync> =
//!     Arc::new(UdpSocketClient::new(Some(v4_socket), Some(v6_socket)));
//!
//! let config = QuerierConfig::default();
//! let writer = PacketWriter::with_capacity(config.packet_size);
//! let builder = QueryBuilder::new(
//!     config,
//!     Arc::downgrade(&client),
//!     writer,
//!     "_printer._tcp",
//!     vec![],
//!     transaction_id,
//!     SocketKey::default(),
//!     services_to_resolve,
//!     Arc::new(MonotonicClock::new()),
//! );
//!
//! match builder.call() {
//!     Some(sent) => println!("query {:#06x} sent", sent.transaction_id),
//!     None => println!("nothing sent"),
//! }
//! ```
//!
//! `None` means no packet left the machine: the transport was already
//! released, the planner found nothing to ask, or encoding failed.
//!
//! ## Wire format
//!
//! Packets follow RFC 1035 §4 with the mDNS extensions of RFC 6762: a
//! 12-byte header with flags 0 and only `qdcount` non-zero, followed by
//! the questions. Names are encoded with backward compression pointers
//! (`0xC000 | offset`), sharing suffixes case-insensitively. The top bit
//! of `qclass` is set when a unicast response is requested.
//!
//! ```rust
//! use mdns_querier::PacketWriter;
//!
//! let mut writer = PacketWriter::new();
//! writer.write_u16(0x1234).unwrap();
//! writer.write_labels(&["_printer", "_tcp"]).unwrap();
//! // "_tcp" is now shared via a 2-byte back-pointer
//! let before = writer.len();
//! writer.write_labels(&["printer", "_tcp"]).unwrap();
//! assert_eq!(writer.len(), before + 1 + "printer".len() + 2);
//! ```
//!
//! [RFC 6762]: https://datatracker.ietf.org/doc/html/rfc6762
//! [RFC 6763]: https://datatracker.ietf.org/doc/html/rfc6763

#![warn(rust_2018_idioms)]

pub(crate) mod config;
pub(crate) mod message;
pub(crate) mod proto;
pub(crate) mod response;
pub(crate) mod socket;
pub mod utils;

pub use config::QuerierConfig;
pub use message::writer::PacketWriter;
pub use proto::{
    MDNS_DEST_ADDR_V4, MDNS_DEST_ADDR_V6, MDNS_MULTICAST_IPV4, MDNS_MULTICAST_IPV6, MDNS_PORT,
    QueryBuilder, SentQuery,
};
pub use response::{CachedResponse, RecordExpiry, SrvRecord, DEFAULT_RENEWAL_PERCENT};
pub use socket::{MulticastSocket, SocketClient, SocketKey, UdpSocketClient};

// Re-export the injected clock types for convenience
pub use shared::{Clock, MonotonicClock};
