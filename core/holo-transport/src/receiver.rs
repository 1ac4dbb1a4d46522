use crate::error::{Result, TransportError};
use crate::packet::{Packet, PacketType, MAX_UDP_PAYLOAD};
use crate::reassembly::TransferState;
use holo_codec::DecodedObject;
use std::collections::HashMap;
use std::net::UdpSocket;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Whether `finalize_transfer` requires every chunk to have arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Decode from whatever chunk subset has arrived (holographic subset
    /// decoding, spec.md §4.7).
    Best,
    /// Refuse to decode unless every announced chunk has arrived.
    Strict,
}

/// Receive-side protocol state machine. `handle_packet`/`finalize_transfer`
/// are pure and independently testable; `listen` drives them from a real
/// `UdpSocket` with idle-timeout detection.
pub struct Receiver {
    base_dir: PathBuf,
    decode_mode: DecodeMode,
    transfers: HashMap<u32, TransferState>,
}

impl Receiver {
    pub fn new(base_dir: PathBuf, decode_mode: DecodeMode) -> Self {
        Self {
            base_dir,
            decode_mode,
            transfers: HashMap::new(),
        }
    }

    /// Applies one inbound packet to receive state. Never decodes; decoding
    /// happens at `finalize_transfer`, typically triggered by an idle timer.
    pub fn handle_packet(&mut self, packet: Packet) -> Result<()> {
        let transfer_id = packet.transfer_id;
        let base_dir = self.base_dir.clone();
        let transfer = self.transfers.entry(transfer_id).or_insert_with(|| {
            let dir_path = base_dir.join(format!("transfer_{transfer_id}.holo"));
            TransferState::new(transfer_id, packet.chunk_total, dir_path)
        });

        match packet.packet_type {
            PacketType::Meta => {
                let name = String::from_utf8_lossy(&packet.payload).into_owned();
                transfer.set_name(name, &base_dir)?;
            }
            PacketType::Data => {
                transfer.on_data(
                    packet.chunk_total,
                    packet.chunk_index,
                    packet.seg_index,
                    packet.seg_count,
                    packet.payload,
                )?;
            }
        }
        transfer.touch();
        Ok(())
    }

    /// Every transfer whose last packet is older than `idle_timeout`,
    /// oldest-touched first.
    pub fn expired_transfers(&self, idle_timeout: Duration, now: Instant) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .transfers
            .iter()
            .filter(|(_, t)| now.saturating_duration_since(t.last_activity) >= idle_timeout)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_by_key(|id| self.transfers[id].last_activity);
        ids
    }

    pub fn pending_transfer_ids(&self) -> Vec<u32> {
        self.transfers.keys().copied().collect()
    }

    /// Decodes and writes out `transfer_id`'s object, then drops its
    /// reassembly state and temp directory. In `Strict` mode, refuses when
    /// any announced chunk is still missing.
    pub fn finalize_transfer(&mut self, transfer_id: u32) -> Result<PathBuf> {
        let transfer = self
            .transfers
            .remove(&transfer_id)
            .ok_or_else(|| TransportError::MalformedPacket(format!("unknown transfer {transfer_id}")))?;

        let completed = transfer.completed_chunk_count();
        if self.decode_mode == DecodeMode::Strict && completed < transfer.chunk_total {
            return Err(TransportError::Incomplete {
                transfer_id,
                missing: transfer.chunk_total - completed,
                total: transfer.chunk_total,
            });
        }
        let decoded = holo_codec::decode_dir(&transfer.dir_path)?;
        let stem = transfer
            .name
            .clone()
            .unwrap_or_else(|| format!("transfer_{transfer_id}"));
        let out_path = write_decoded_object(&self.base_dir, &stem, decoded)?;
        let _ = std::fs::remove_dir_all(&transfer.dir_path);
        log::info!(
            "finalized transfer {transfer_id}: {completed}/{} chunks -> {out_path:?}",
            transfer.chunk_total
        );
        Ok(out_path)
    }

    /// Blocking receive loop over a real socket: applies every inbound
    /// packet and finalizes a transfer once it has gone `idle_timeout`
    /// without traffic.
    pub fn listen(mut self, socket: &UdpSocket, idle_timeout: Duration) -> Result<()> {
        socket.set_read_timeout(Some(idle_timeout))?;
        let mut buf = vec![0u8; MAX_UDP_PAYLOAD];
        loop {
            match socket.recv_from(&mut buf) {
                Ok((len, _src)) => match Packet::from_bytes(&buf[..len]) {
                    Ok(packet) => {
                        if let Err(err) = self.handle_packet(packet) {
                            log::warn!("dropping packet: {err}");
                        }
                    }
                    Err(err) => log::warn!("dropping malformed packet: {err}"),
                },
                Err(err) if matches!(err.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut) => {
                    for transfer_id in self.expired_transfers(idle_timeout, Instant::now()) {
                        match self.finalize_transfer(transfer_id) {
                            Ok(path) => log::info!("decoded {path:?}"),
                            Err(err) => log::warn!("transfer {transfer_id} not decoded: {err}"),
                        }
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn write_decoded_object(base_dir: &Path, stem: &str, decoded: DecodedObject) -> Result<PathBuf> {
    match decoded {
        DecodedObject::Image(image) => {
            let path = base_dir.join(format!("{stem}.png"));
            image.save(&path).map_err(|e| TransportError::MalformedPacket(e.to_string()))?;
            Ok(path)
        }
        DecodedObject::Audio(audio) => {
            let path = base_dir.join(format!("{stem}.wav"));
            let spec = hound::WavSpec {
                channels: audio.channels,
                sample_rate: audio.sample_rate,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            };
            let mut writer = hound::WavWriter::create(&path, spec)
                .map_err(|e| TransportError::MalformedPacket(e.to_string()))?;
            for sample in audio.samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| TransportError::MalformedPacket(e.to_string()))?;
            }
            writer.finalize().map_err(|e| TransportError::MalformedPacket(e.to_string()))?;
            Ok(path)
        }
        DecodedObject::Binary(bytes) => {
            let path = base_dir.join(stem);
            std::fs::write(&path, bytes)?;
            Ok(path)
        }
    }
}
