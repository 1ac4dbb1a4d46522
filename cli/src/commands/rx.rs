use anyhow::Result;
use clap::{Args, ValueEnum};
use holo_transport::{DecodeMode, Receiver};
use std::net::UdpSocket;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Copy, ValueEnum)]
pub enum DecodeModeArg {
    Best,
    Strict,
}

impl From<DecodeModeArg> for DecodeMode {
    fn from(value: DecodeModeArg) -> Self {
        match value {
            DecodeModeArg::Best => DecodeMode::Best,
            DecodeModeArg::Strict => DecodeMode::Strict,
        }
    }
}

/// `rx --port --base-dir --idle-timeout --payload --decode-mode {best|strict}`
#[derive(Args)]
pub struct RxArgs {
    #[arg(long, default_value_t = 9999)]
    pub port: u16,
    #[arg(long, default_value = ".")]
    pub base_dir: PathBuf,
    /// Idle window, in milliseconds, before a transfer is finalized.
    #[arg(long, default_value_t = 5000)]
    pub idle_timeout: u64,
    /// Upper bound on an inbound DATA payload; informational, since the
    /// receive buffer already covers the full UDP datagram ceiling.
    #[arg(long, default_value_t = 1024)]
    pub payload: usize,
    #[arg(long, value_enum, default_value_t = DecodeModeArg::Best)]
    pub decode_mode: DecodeModeArg,
}

pub fn handle(args: RxArgs) -> Result<()> {
    std::fs::create_dir_all(&args.base_dir)?;
    let socket = UdpSocket::bind(("0.0.0.0", args.port))?;
    log::info!(
        "listening on port {} -> {:?} (payload bound {} bytes, {} mode)",
        args.port,
        args.base_dir,
        args.payload,
        if matches!(args.decode_mode, DecodeModeArg::Best) { "best" } else { "strict" }
    );
    let receiver = Receiver::new(args.base_dir, args.decode_mode.into());
    receiver.listen(&socket, Duration::from_millis(args.idle_timeout))?;
    Ok(())
}
