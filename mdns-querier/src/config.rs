//! Configuration for a query build.
//!
//! This module provides the [`QuerierConfig`] struct holding the knobs of
//! a single query build: the packet capacity, the auxiliary port list and
//! the response-mode, address-family and discovery flags.
//!
//! # Examples
//!
//! ## Discovery configuration
//!
//! For a plain discovery query (PTR questions only):
//!
//! ```rust
//! use mdns_querier::QuerierConfig;
//!
//! let config = QuerierConfig::default();
//! assert!(config.send_discovery_queries);
//! ```
//!
//! ## Known-answer refresh configuration
//!
//! For a refresh pass over cached services, with no discovery questions
//! and responses requested over unicast:
//!
//! ```rust
//! use mdns_querier::QuerierConfig;
//!
//! let config = QuerierConfig::default()
//!     .with_send_discovery_queries(false)
//!     .with_expect_unicast_response(true);
//! ```
//!
//! ## Reaching emulators
//!
//! Emulators listen on non-standard ports; list them and they are tried
//! after port 5353, on both address families:
//!
//! ```rust
//! use mdns_querier::QuerierConfig;
//!
//! let config = QuerierConfig::default()
//!     .with_alt_ports(vec![16386, 16387]);
//! ```

/// Default capacity of a query packet writer, in bytes (a typical MTU).
pub(crate) const DEFAULT_PACKET_SIZE: usize = 1500;

/// Knobs for a single query build.
///
/// Use the builder pattern to construct a configuration:
///
/// ```rust
/// use mdns_querier::QuerierConfig;
///
/// let config = QuerierConfig::new()
///     .with_alt_ports(vec![16386])
///     .with_expect_unicast_response(true);
/// ```
///
/// # Fields
///
/// - `packet_size`: capacity of the packet writer (default: 1500 bytes)
/// - `alt_ports`: auxiliary query ports tried after 5353 (default: empty)
/// - `expect_unicast_response`: request unicast replies (default: `false`)
/// - `only_use_ipv6_on_ipv6_only_networks`: address-family policy flag
///   forwarded to the transport (default: `false`)
/// - `send_discovery_queries`: emit PTR discovery questions (default: `true`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerierConfig {
    /// Capacity, in bytes, of the [`PacketWriter`](crate::PacketWriter)
    /// handed to the query builder for this configuration.
    ///
    /// A build whose questions exceed this capacity fails as a whole and
    /// emits nothing.
    ///
    /// Default: 1500
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::{PacketWriter, QuerierConfig};
    ///
    /// let config = QuerierConfig::default().with_packet_size(9000);
    /// let writer = PacketWriter::with_capacity(config.packet_size);
    /// ```
    pub packet_size: usize,

    /// Auxiliary query ports, tried after the standard mDNS port in the
    /// configured order, on both address families.
    ///
    /// Used to reach emulators that listen on non-standard ports.
    ///
    /// Default: empty
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::QuerierConfig;
    ///
    /// let config = QuerierConfig::default()
    ///     .with_alt_ports(vec![16386, 16387]);
    /// ```
    pub alt_ports: Vec<u16>,

    /// Request unicast responses by setting the top bit of `qclass` on
    /// every question, and send through the transport's unicast-response
    /// variant.
    ///
    /// Default: `false` (multicast responses)
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::QuerierConfig;
    ///
    /// let config = QuerierConfig::default()
    ///     .with_expect_unicast_response(true);
    /// ```
    pub expect_unicast_response: bool,

    /// Forwarded verbatim to the transport, which skips IPv6 sends on
    /// networks that also carry IPv4.
    ///
    /// Default: `false`
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::QuerierConfig;
    ///
    /// let config = QuerierConfig::default()
    ///     .with_only_use_ipv6_on_ipv6_only_networks(true);
    /// ```
    pub only_use_ipv6_on_ipv6_only_networks: bool,

    /// Emit PTR discovery questions for the service type and each subtype,
    /// in addition to any known-answer refresh questions.
    ///
    /// Disable for a pure refresh pass over already-discovered services.
    ///
    /// Default: `true`
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::QuerierConfig;
    ///
    /// let config = QuerierConfig::default()
    ///     .with_send_discovery_queries(false);
    /// ```
    pub send_discovery_queries: bool,
}

impl Default for QuerierConfig {
    fn default() -> Self {
        Self {
            packet_size: DEFAULT_PACKET_SIZE,
            alt_ports: Vec::new(),
            expect_unicast_response: false,
            only_use_ipv6_on_ipv6_only_networks: false,
            send_discovery_queries: true,
        }
    }
}

impl QuerierConfig {
    /// Create a new configuration with default values.
    ///
    /// Equivalent to [`QuerierConfig::default()`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::QuerierConfig;
    ///
    /// let config = QuerierConfig::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the packet writer capacity.
    ///
    /// # Arguments
    ///
    /// * `packet_size` - Capacity in bytes
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::QuerierConfig;
    ///
    /// // jumbo-frame network
    /// let config = QuerierConfig::default().with_packet_size(9000);
    /// ```
    pub fn with_packet_size(mut self, packet_size: usize) -> Self {
        self.packet_size = packet_size;
        self
    }

    /// Set the auxiliary port list.
    ///
    /// Ports are attempted in the given order, after the standard mDNS
    /// port, on both address families.
    ///
    /// # Arguments
    ///
    /// * `alt_ports` - Port numbers, e.g. the ports emulators listen on
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::QuerierConfig;
    ///
    /// let config = QuerierConfig::default()
    ///     .with_alt_ports(vec![16386]);
    /// ```
    pub fn with_alt_ports(mut self, alt_ports: Vec<u16>) -> Self {
        self.alt_ports = alt_ports;
        self
    }

    /// Set the auxiliary port list from textual port numbers, silently
    /// discarding entries that do not parse.
    ///
    /// # Arguments
    ///
    /// * `alt_ports` - Anything iterable over string-like port numbers
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::QuerierConfig;
    ///
    /// let config = QuerierConfig::default()
    ///     .with_alt_ports_from_strings(["5354", "bogus", "16386"]);
    /// assert_eq!(config.alt_ports, vec![5354, 16386]);
    /// ```
    pub fn with_alt_ports_from_strings<I, S>(mut self, alt_ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.alt_ports = alt_ports
            .into_iter()
            .filter_map(|port| port.as_ref().trim().parse().ok())
            .collect();
        self
    }

    /// Request unicast (`true`) or multicast (`false`) responses.
    ///
    /// When enabled, every question carries the unicast-response bit and
    /// the transport's unicast-response send variant is used.
    ///
    /// # Arguments
    ///
    /// * `expect_unicast_response` - Whether replies should go to the
    ///   querier's unicast address
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::QuerierConfig;
    ///
    /// let config = QuerierConfig::default()
    ///     .with_expect_unicast_response(true);
    /// ```
    pub fn with_expect_unicast_response(mut self, expect_unicast_response: bool) -> Self {
        self.expect_unicast_response = expect_unicast_response;
        self
    }

    /// Set the address-family policy forwarded to the transport.
    ///
    /// # Arguments
    ///
    /// * `only` - When `true`, the transport sends over IPv6 only on
    ///   networks without IPv4
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::QuerierConfig;
    ///
    /// let config = QuerierConfig::default()
    ///     .with_only_use_ipv6_on_ipv6_only_networks(true);
    /// ```
    pub fn with_only_use_ipv6_on_ipv6_only_networks(mut self, only: bool) -> Self {
        self.only_use_ipv6_on_ipv6_only_networks = only;
        self
    }

    /// Enable or disable PTR discovery questions.
    ///
    /// # Arguments
    ///
    /// * `send_discovery_queries` - Whether to append discovery questions
    ///   for the service type and its subtypes
    ///
    /// # Example
    ///
    /// ```rust
    /// use mdns_querier::QuerierConfig;
    ///
    /// // refresh known services only
    /// let config = QuerierConfig::default()
    ///     .with_send_discovery_queries(false);
    /// ```
    pub fn with_send_discovery_queries(mut self, send_discovery_queries: bool) -> Self {
        self.send_discovery_queries = send_discovery_queries;
        self
    }
}
