//! Socket layer: the transport contract consumed by the query builder,
//! plus concrete UDP implementations.

use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};

use shared::TaggedBytesMut;
use shared::error::{Error, Result};

use crate::proto::{MDNS_MULTICAST_IPV4, MDNS_MULTICAST_IPV6, MDNS_PORT};

/// Opaque identifier of the socket a query should leave through when a
/// multi-network transport is in use. Single-network transports ignore it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SocketKey(pub u64);

impl fmt::Display for SocketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport used by the query builder to emit finished datagrams.
///
/// Implementations distinguish sends that request a unicast response from
/// sends that request a multicast response, and must be safe for
/// concurrent datagram sends. The `only_use_ipv6_on_ipv6_only_networks`
/// policy flag is forwarded verbatim from the builder and interpreted
/// here.
pub trait SocketClient {
    /// Send `packet`, requesting that responders reply to the querier's
    /// unicast address.
    fn send_requesting_unicast_response(
        &self,
        packet: &TaggedBytesMut,
        socket_key: &SocketKey,
        only_use_ipv6_on_ipv6_only_networks: bool,
    ) -> Result<()>;

    /// Send `packet`, requesting that responders reply to the multicast
    /// group.
    fn send_requesting_multicast_response(
        &self,
        packet: &TaggedBytesMut,
        socket_key: &SocketKey,
        only_use_ipv6_on_ipv6_only_networks: bool,
    ) -> Result<()>;
}

/// A builder for multicast UDP sockets suitable for mDNS, on either
/// address family.
///
/// The resulting socket is bound to the mDNS port, configured with
/// `SO_REUSEADDR` (and `SO_REUSEPORT` on supported platforms), set to
/// non-blocking mode for async compatibility, and joined to the mDNS
/// multicast group of its family.
///
/// ```rust,ignore
/// let v4 = MulticastSocket::ipv4().into_std()?;
/// let v6 = MulticastSocket::ipv6().into_std()?;
/// let client = UdpSocketClient::new(Some(v4), Some(v6));
/// ```
#[derive(Debug, Clone)]
pub struct MulticastSocket {
    domain: Domain,
    local_ip: Option<IpAddr>,
    local_port: Option<u16>,
    interface_v4: Option<Ipv4Addr>,
    interface_index_v6: u32,
}

impl MulticastSocket {
    /// A builder for an IPv4 socket joined to 224.0.0.251.
    pub fn ipv4() -> Self {
        Self {
            domain: Domain::IPV4,
            local_ip: None,
            local_port: None,
            interface_v4: None,
            interface_index_v6: 0,
        }
    }

    /// A builder for an IPv6 socket joined to ff02::fb.
    pub fn ipv6() -> Self {
        Self {
            domain: Domain::IPV6,
            ..Self::ipv4()
        }
    }

    /// Bind to a specific local address instead of the family default.
    pub fn with_local_ip(mut self, local_ip: IpAddr) -> Self {
        self.local_ip = Some(local_ip);
        self
    }

    /// Bind to a specific local port instead of 5353.
    pub fn with_local_port(mut self, local_port: u16) -> Self {
        self.local_port = Some(local_port);
        self
    }

    /// Join the IPv4 group on a specific interface instead of `INADDR_ANY`.
    pub fn with_interface(mut self, interface: Ipv4Addr) -> Self {
        self.interface_v4 = Some(interface);
        self
    }

    /// Join the IPv6 group on a specific interface index instead of 0.
    pub fn with_interface_index(mut self, index: u32) -> Self {
        self.interface_index_v6 = index;
        self
    }

    /// Build the configured `std::net::UdpSocket`.
    pub fn into_std(self) -> io::Result<UdpSocket> {
        let socket = Socket::new(self.domain, Type::DGRAM, Some(Protocol::UDP))?;

        socket.set_reuse_address(true)?;
        #[cfg(all(unix, not(target_os = "solaris"), not(target_os = "illumos")))]
        socket.set_reuse_port(true)?;
        socket.set_nonblocking(true)?;

        let local_ip = self.local_ip.unwrap_or_else(|| self.default_local_ip());
        let local_port = self.local_port.unwrap_or(MDNS_PORT);
        socket.bind(&SocketAddr::new(local_ip, local_port).into())?;

        if self.domain == Domain::IPV6 {
            socket.set_only_v6(true)?;
            socket.join_multicast_v6(&MDNS_MULTICAST_IPV6, self.interface_index_v6)?;
        } else {
            let interface = self.interface_v4.unwrap_or(Ipv4Addr::UNSPECIFIED);
            socket.join_multicast_v4(&MDNS_MULTICAST_IPV4, &interface)?;
        }

        Ok(socket.into())
    }

    fn default_local_ip(&self) -> IpAddr {
        if self.domain == Domain::IPV6 {
            IpAddr::V6(Ipv6Addr::UNSPECIFIED)
        } else if cfg!(target_os = "linux") {
            // Binding the group address filters unrelated traffic on Linux;
            // only 0.0.0.0 works on Mac/Win, even 127.0.0.1 doesn't work.
            IpAddr::V4(MDNS_MULTICAST_IPV4)
        } else {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        }
    }
}

/// [`SocketClient`] over plain UDP sockets, one per address family.
///
/// Datagrams are routed by destination family. When
/// `only_use_ipv6_on_ipv6_only_networks` is set and an IPv4 socket is
/// bound, the network is not IPv6-only and IPv6 sends are skipped. The
/// unicast/multicast response mode is already encoded in the datagram's
/// `qclass` bit, so both send variants transmit the bytes unchanged.
pub struct UdpSocketClient {
    ipv4: Option<UdpSocket>,
    ipv6: Option<UdpSocket>,
}

impl UdpSocketClient {
    pub fn new(ipv4: Option<UdpSocket>, ipv6: Option<UdpSocket>) -> Self {
        Self { ipv4, ipv6 }
    }

    fn send(&self, packet: &TaggedBytesMut, only_use_ipv6_on_ipv6_only_networks: bool) -> Result<()> {
        let destination = packet.transport.peer_addr;
        let socket = match destination {
            SocketAddr::V4(_) => self.ipv4.as_ref(),
            SocketAddr::V6(_) => {
                if only_use_ipv6_on_ipv6_only_networks && self.ipv4.is_some() {
                    log::trace!("skipping IPv6 send to {destination}: network is not IPv6-only");
                    return Ok(());
                }
                self.ipv6.as_ref()
            }
        };
        let Some(socket) = socket else {
            return Err(Error::ErrNoSocket);
        };
        socket.send_to(&packet.message, destination)?;
        Ok(())
    }
}

impl SocketClient for UdpSocketClient {
    fn send_requesting_unicast_response(
        &self,
        packet: &TaggedBytesMut,
        _socket_key: &SocketKey,
        only_use_ipv6_on_ipv6_only_networks: bool,
    ) -> Result<()> {
        self.send(packet, only_use_ipv6_on_ipv6_only_networks)
    }

    fn send_requesting_multicast_response(
        &self,
        packet: &TaggedBytesMut,
        _socket_key: &SocketKey,
        only_use_ipv6_on_ipv6_only_networks: bool,
    ) -> Result<()> {
        self.send(packet, only_use_ipv6_on_ipv6_only_networks)
    }
}
