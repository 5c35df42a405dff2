//! The query engine: question planning, packet assembly and multicast
//! dispatch.
//!
//! [`QueryBuilder`] is the one-shot orchestrator. It plans the question
//! list from the cached-response snapshots and the discovery flag, writes
//! the header and questions through a [`PacketWriter`], and hands the
//! finished datagram to the transport for every target port on both
//! address families. It never blocks beyond the transport's non-blocking
//! datagram sends, and it never panics on I/O: `None` is the sole failure
//! signal to the caller.


pub(crate) mod planner;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::{Arc, Weak};

use shared::error::Result;
use shared::{Clock, TaggedBytesMut, TransportContext, TransportProtocol};

use crate::config::QuerierConfig;
use crate::message::writer::PacketWriter;
use crate::message::{FLAGS_QUERY, QCLASS_INTERNET, QCLASS_UNICAST_RESPONSE};
use crate::response::CachedResponse;
use crate::socket::{SocketClient, SocketKey};
use planner::{Question, plan_questions};

/// The mDNS IPv4 multicast group address (224.0.0.251).
pub const MDNS_MULTICAST_IPV4: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);

/// The mDNS IPv6 multicast group address (ff02::fb).
pub const MDNS_MULTICAST_IPV6: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 0xfb);

/// The standard mDNS port (5353).
pub const MDNS_PORT: u16 = 5353;

/// mDNS IPv4 multicast destination (224.0.0.251:5353).
pub const MDNS_DEST_ADDR_V4: SocketAddr =
    SocketAddr::new(IpAddr::V4(MDNS_MULTICAST_IPV4), MDNS_PORT);

/// mDNS IPv6 multicast destination ([ff02::fb]:5353).
pub const MDNS_DEST_ADDR_V6: SocketAddr =
    SocketAddr::new(IpAddr::V6(MDNS_MULTICAST_IPV6), MDNS_PORT);

/// Outcome of a successful query build: the transaction ID that went on
/// the wire, and the subtypes the discovery questions covered, so the
/// caller can associate subsequent responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentQuery {
    pub transaction_id: u16,
    pub subtypes: Vec<String>,
}

/// One-shot builder that assembles and sends a single mDNS query.
///
/// Construct, invoke [`call`](Self::call) once, discard. The transport is
/// weakly held: when it has been released before invocation the build is
/// silently dropped. The cached-response views are borrowed immutably for
/// the duration of the call.
pub struct QueryBuilder {
    config: QuerierConfig,
    socket_client: Weak<dyn SocketClient + Send + Sync>,
    writer: PacketWriter,
    service_type_labels: Vec<String>,
    subtypes: Vec<String>,
    transaction_id: u16,
    socket_key: SocketKey,
    services_to_resolve: Vec<CachedResponse>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl QueryBuilder {
    /// Set up a query build.
    ///
    /// `service_type` is split into labels on the literal dot. The
    /// transaction ID is caller-allocated; the builder writes it verbatim.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: QuerierConfig,
        socket_client: Weak<dyn SocketClient + Send + Sync>,
        writer: PacketWriter,
        service_type: &str,
        subtypes: Vec<String>,
        transaction_id: u16,
        socket_key: SocketKey,
        services_to_resolve: Vec<CachedResponse>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let service_type_labels = service_type
            .split('.')
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            config,
            socket_client,
            writer,
            service_type_labels,
            subtypes,
            transaction_id,
            socket_key,
            services_to_resolve,
            clock,
        }
    }

    /// Build the query and send it to every configured destination.
    ///
    /// Returns `None` when the transport has been released, when the
    /// planner produced no questions, or when the packet failed to encode.
    /// In every such case nothing was sent and the caller must not expect
    /// a response. Per-destination send failures are logged and do not
    /// fail the call.
    pub fn call(self) -> Option<SentQuery> {
        let Some(socket_client) = self.socket_client.upgrade() else {
            log::debug!("socket client released before query build, dropping query");
            return None;
        };

        let now = self.clock.elapsed_millis();
        let questions = plan_questions(
            &self.services_to_resolve,
            now,
            self.config.send_discovery_queries,
            &self.subtypes,
            &self.service_type_labels,
        );
        if questions.is_empty() {
            return None;
        }

        let QueryBuilder {
            config,
            writer,
            subtypes,
            transaction_id,
            socket_key,
            ..
        } = self;

        let packet = match build_packet(
            writer,
            transaction_id,
            &questions,
            config.expect_unicast_response,
        ) {
            Ok(packet) => packet,
            Err(err) => {
                log::error!(
                    "failed to build mDNS query packet for subtypes {}: {err}",
                    subtypes.join(",")
                );
                return None;
            }
        };

        for port in std::iter::once(MDNS_PORT).chain(config.alt_ports.iter().copied()) {
            send_to_ipv4_and_ipv6(&*socket_client, &config, &socket_key, &packet, port);
        }

        Some(SentQuery {
            transaction_id,
            subtypes,
        })
    }
}

fn build_packet(
    mut writer: PacketWriter,
    transaction_id: u16,
    questions: &[Question],
    expect_unicast_response: bool,
) -> Result<TaggedBytesMut> {
    writer.write_u16(transaction_id)?;
    writer.write_u16(FLAGS_QUERY)?;
    writer.write_u16(questions.len() as u16)?;
    writer.write_u16(0)?; // answers
    writer.write_u16(0)?; // authority entries
    writer.write_u16(0)?; // additional records

    let qclass = QCLASS_INTERNET
        | if expect_unicast_response {
            QCLASS_UNICAST_RESPONSE
        } else {
            0
        };
    for question in questions {
        writer.write_labels(&question.labels)?;
        writer.write_u16(question.typ as u16)?;
        writer.write_u16(qclass)?;
    }

    Ok(writer.get_packet(MDNS_DEST_ADDR_V4))
}

fn send_to_ipv4_and_ipv6(
    socket_client: &(dyn SocketClient + Send + Sync),
    config: &QuerierConfig,
    socket_key: &SocketKey,
    packet: &TaggedBytesMut,
    port: u16,
) {
    let to_v4 = retarget(packet, SocketAddr::new(IpAddr::V4(MDNS_MULTICAST_IPV4), port));
    if let Err(err) = send_packet(socket_client, config, socket_key, &to_v4) {
        log::info!("can't send packet to IPv4: {err}");
    }
    let to_v6 = retarget(packet, SocketAddr::new(IpAddr::V6(MDNS_MULTICAST_IPV6), port));
    if let Err(err) = send_packet(socket_client, config, socket_key, &to_v6) {
        log::info!("can't send packet to IPv6: {err}");
    }
}

fn send_packet(
    socket_client: &(dyn SocketClient + Send + Sync),
    config: &QuerierConfig,
    socket_key: &SocketKey,
    packet: &TaggedBytesMut,
) -> Result<()> {
    if config.expect_unicast_response {
        socket_client.send_requesting_unicast_response(
            packet,
            socket_key,
            config.only_use_ipv6_on_ipv6_only_networks,
        )
    } else {
        socket_client.send_requesting_multicast_response(
            packet,
            socket_key,
            config.only_use_ipv6_on_ipv6_only_networks,
        )
    }
}

fn retarget(packet: &TaggedBytesMut, destination: SocketAddr) -> TaggedBytesMut {
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
        message: packet.message.clone(),
    }
}
