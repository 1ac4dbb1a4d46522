use anyhow::{Context, Result};
use clap::Args;
use holo_codec::EncodeOptions;
use holo_transport::TransmitOptions;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::path::PathBuf;
use std::time::Duration;

/// `tx <path> <host> --port --chunk-kb --loops --payload --delay`
#[derive(Args)]
pub struct TxArgs {
    /// File to encode and transmit.
    pub path: PathBuf,
    /// Destination host or IP.
    pub host: String,
    #[arg(long, default_value_t = 9999)]
    pub port: u16,
    #[arg(long)]
    pub chunk_kb: Option<u32>,
    /// Number of reshuffled retransmission passes.
    #[arg(long, default_value_t = 3)]
    pub loops: u32,
    /// Maximum DATA payload in bytes.
    #[arg(long, default_value_t = 1024)]
    pub payload: usize,
    /// Sleep between packets, in milliseconds.
    #[arg(long, default_value_t = 2)]
    pub delay: u64,
}

pub fn handle(args: TxArgs) -> Result<()> {
    let dest: SocketAddr = (args.host.as_str(), args.port)
        .to_socket_addrs()
        .with_context(|| format!("resolving {}:{}", args.host, args.port))?
        .next()
        .with_context(|| format!("{} resolved to no addresses", args.host))?;

    let socket = UdpSocket::bind("0.0.0.0:0")?;
    let mut codec_options = EncodeOptions::default();
    if let Some(kb) = args.chunk_kb {
        codec_options.target_kb = kb;
    }
    let transmit_options = TransmitOptions {
        loops: args.loops,
        max_payload: args.payload,
        delay: Duration::from_millis(args.delay),
        seed: 0,
    };
    // Host-local and increasing per process, per spec.md §5's transfer_id contract.
    let transfer_id = std::process::id();
    holo_transport::transmit(&socket, dest, &args.path, transfer_id, &codec_options, &transmit_options)?;
    log::info!("transmitted {:?} to {dest} as transfer {transfer_id}", args.path);
    Ok(())
}
