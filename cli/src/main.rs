use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{codec, rx, stack, tx};

#[derive(Parser)]
#[command(name = "holo")]
#[command(about = "Holographic media codec and HNET datagram transport", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a file, or decode a `.holo` directory.
    Codec(codec::CodecArgs),
    /// Average frames pixel-wise, then encode the result.
    Stack(stack::StackArgs),
    /// Transmit an encoded object over HNET.
    Tx(tx::TxArgs),
    /// Receive an HNET transfer and decode it.
    Rx(rx::RxArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Codec(args) => codec::handle(args),
        Commands::Stack(args) => stack::handle(args),
        Commands::Tx(args) => tx::handle(args),
        Commands::Rx(args) => rx::handle(args),
    };

    if let Err(err) = &result {
        log::error!("{err:#}");
    }
    result
}
