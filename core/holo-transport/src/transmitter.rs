use crate::error::Result;
use crate::packet::{Packet, PacketType, HEADER_LEN, MAX_UDP_PAYLOAD};
use holo_codec::EncodeOptions;
use holo_container::chunk_file_name;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fs;
use std::net::{SocketAddr, UdpSocket};
use std::path::Path;
use std::time::Duration;

/// Tunables for one transmit run, per spec.md §4.7's transmit state machine.
#[derive(Debug, Clone)]
pub struct TransmitOptions {
    /// How many times the full chunk set is re-sent, each in a fresh shuffle.
    pub loops: u32,
    /// Upper bound on one DATA packet's payload; segments never exceed it.
    pub max_payload: usize,
    /// Sleep between consecutive packets, pacing the outbound stream.
    pub delay: Duration,
    /// Seeds the per-loop shuffle so a run is reproducible end to end.
    pub seed: u64,
}

impl Default for TransmitOptions {
    fn default() -> Self {
        Self {
            loops: 3,
            max_payload: 1024,
            delay: Duration::from_millis(2),
            seed: 0,
        }
    }
}

/// Encodes `path` to a temporary chunk directory, announces it with one
/// META packet, then streams every chunk's segments `options.loops` times,
/// reshuffling chunk order each pass so a receiver gets broad subset
/// coverage early even under loss (spec.md §4.7).
pub fn transmit(
    socket: &UdpSocket,
    dest: SocketAddr,
    path: &Path,
    transfer_id: u32,
    codec_options: &EncodeOptions,
    options: &TransmitOptions,
) -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let (mode, chunks) = holo_codec::encode_file(path, codec_options)?;
    let block_count = chunks.len() as u32;
    holo_codec::write_chunks(tmp.path(), &chunks)?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("transfer_{transfer_id}"));

    let meta = Packet {
        packet_type: PacketType::Meta,
        transfer_id,
        chunk_total: block_count,
        chunk_index: 0,
        seg_index: 0,
        seg_count: 1,
        payload: stem.into_bytes(),
    };
    socket.send_to(&meta.to_bytes()?, dest)?;
    std::thread::sleep(options.delay);

    let max_payload = options.max_payload.min(MAX_UDP_PAYLOAD - HEADER_LEN).max(1);
    let mut rng = SmallRng::seed_from_u64(options.seed);

    for loop_index in 0..options.loops {
        let mut order: Vec<u32> = (0..block_count).collect();
        order.shuffle(&mut rng);

        for chunk_index in order {
            let file_path = tmp.path().join(chunk_file_name(chunk_index, block_count));
            let bytes = fs::read(&file_path)?;
            let seg_count = bytes.len().div_ceil(max_payload).max(1) as u16;

            for (seg_index, segment) in bytes.chunks(max_payload).enumerate() {
                let packet = Packet {
                    packet_type: PacketType::Data,
                    transfer_id,
                    chunk_total: block_count,
                    chunk_index,
                    seg_index: seg_index as u16,
                    seg_count,
                    payload: segment.to_vec(),
                };
                socket.send_to(&packet.to_bytes()?, dest)?;
                std::thread::sleep(options.delay);
            }
        }
        log::debug!("transmit loop {loop_index}/{} of {mode} object complete", options.loops);
    }

    log::info!("transmitted {path:?} as transfer {transfer_id}: {block_count} chunks x {} loops", options.loops);
    Ok(())
}
