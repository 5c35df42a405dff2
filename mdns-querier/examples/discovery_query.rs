//! mDNS Service Discovery Query Example
//!
//! Sends a PTR discovery query for a service type (and optional subtypes)
//! to the IPv4 and IPv6 mDNS groups, then listens for raw responses for a
//! few seconds. Responses are not decoded, only counted.
//!
//! ```text
//! cargo run --package mdns-querier --example discovery_query -- \
//!     --service-type _googlecast._tcp.local --subtype audio
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mdns_querier::{
    MonotonicClock, MulticastSocket, PacketWriter, QuerierConfig, QueryBuilder, SocketClient,
    SocketKey, UdpSocketClient,
};
use tokio::net::UdpSocket;

#[derive(Parser, Debug)]
#[command(name = "mDNS Discovery Query")]
#[command(about = "Send an mDNS PTR discovery query for a service type")]
struct Args {
    /// Service type to discover
    #[arg(long, default_value = "_googlecast._tcp.local")]
    service_type: String,

    /// Subtype names to include, may be repeated
    #[arg(long)]
    subtype: Vec<String>,

    /// Request unicast responses
    #[arg(long)]
    unicast: bool,

    /// Auxiliary query ports, may be repeated
    #[arg(long)]
    alt_port: Vec<u16>,

    /// Seconds to listen for raw responses before exiting
    #[arg(long, default_value = "5")]
    listen: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let v4_socket = MulticastSocket::ipv4().into_std()?;
    let listener = UdpSocket::from_std(v4_socket.try_clone()?)?;
    let v6_socket = match MulticastSocket::ipv6().into_std() {
        Ok(socket) => Some(socket),
        Err(err) => {
            log::warn!("IPv6 mDNS socket unavailable: {err}");
            None
        }
    };

    let client: Arc<dyn SocketClient + Send + Sync> =
        Arc::new(UdpSocketClient::new(Some(v4_socket), v6_socket));

    let config = QuerierConfig::default()
        .with_expect_unicast_response(args.unicast)
        .with_alt_ports(args.alt_port.clone());
    let writer = PacketWriter::with_capacity(config.packet_size);

    let transaction_id = rand::random::<u16>();
    let builder = QueryBuilder::new(
        config,
        Arc::downgrade(&client),
        writer,
        &args.service_type,
        args.subtype.clone(),
        transaction_id,
        SocketKey::default(),
        Vec::new(),
        Arc::new(MonotonicClock::new()),
    );

    match builder.call() {
        Some(sent) => log::info!(
            "sent query {:#06x} for '{}' (subtypes: {:?})",
            sent.transaction_id,
            args.service_type,
            sent.subtypes
        ),
        None => return Err("no query was sent".into()),
    }

    let mut buf = vec![0u8; 1500];
    let deadline = tokio::time::Instant::now() + Duration::from_secs(args.listen);
    let mut responses = 0usize;
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            break;
        }
        match tokio::time::timeout(remaining, listener.recv_from(&mut buf)).await {
            Ok(Ok((len, src))) => {
                responses += 1;
                log::info!("received {len} bytes from {src}");
            }
            Ok(Err(err)) => log::warn!("socket recv error: {err}"),
            Err(_) => break,
        }
    }

    println!(
        "query {transaction_id:#06x}: {responses} raw response packet(s) within {}s",
        args.listen
    );
    Ok(())
}
