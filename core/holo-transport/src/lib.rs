//! UDP datagram transport (component C7): segments an encoded object into
//! HNET packets, retransmits it in reshuffled loops, and reassembles it on
//! the receive side from whatever subset of packets actually arrives.

mod error;
mod packet;
mod reassembly;
mod receiver;
mod transmitter;

pub use error::{Result, TransportError};
pub use packet::{Packet, PacketType, HEADER_LEN, MAX_UDP_PAYLOAD, MAGIC, PROTOCOL_VERSION};
pub use receiver::{DecodeMode, Receiver};
pub use transmitter::{transmit, TransmitOptions};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn data(transfer_id: u32, chunk_total: u32, chunk_index: u32, seg_index: u16, seg_count: u16, payload: &[u8]) -> Packet {
        Packet {
            packet_type: PacketType::Data,
            transfer_id,
            chunk_total,
            chunk_index,
            seg_index,
            seg_count,
            payload: payload.to_vec(),
        }
    }

    fn meta(transfer_id: u32, chunk_total: u32, name: &str) -> Packet {
        Packet {
            packet_type: PacketType::Meta,
            transfer_id,
            chunk_total,
            chunk_index: 0,
            seg_index: 0,
            seg_count: 1,
            payload: name.as_bytes().to_vec(),
        }
    }

    /// Replaying and interleaving packets across two chunks must converge on
    /// the same result regardless of arrival order (spec.md invariant 7).
    #[test]
    fn reassembly_is_order_independent() {
        let tmp = tempfile::tempdir().unwrap();
        let mut forward = Receiver::new(tmp.path().join("forward"), DecodeMode::Strict);
        let mut reversed = Receiver::new(tmp.path().join("reversed"), DecodeMode::Strict);

        let packets = vec![
            meta(1, 2, "obj"),
            data(1, 2, 0, 0, 1, b"AAAA"),
            data(1, 2, 1, 0, 1, b"BBBB"),
            data(1, 2, 0, 0, 1, b"AAAA"), // duplicate, interleaved with chunk 1's packet
        ];

        for p in packets.clone() {
            forward.handle_packet(p).unwrap();
        }
        for p in packets.into_iter().rev() {
            reversed.handle_packet(p).unwrap();
        }

        let forward_id = forward.pending_transfer_ids()[0];
        let reversed_id = reversed.pending_transfer_ids()[0];
        let forward_path = forward.finalize_transfer(forward_id).unwrap();
        let reversed_path = reversed.finalize_transfer(reversed_id).unwrap();
        assert_eq!(
            std::fs::read(forward_path).unwrap(),
            std::fs::read(reversed_path).unwrap()
        );
    }

    #[test]
    fn best_mode_decodes_a_partial_binary_transfer() {
        use holo_codec::{encode_file, write_chunks, EncodeOptions};

        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("msg.dat");
        std::fs::write(&src, b"partial decode should still recover this payload").unwrap();
        let (_, chunks) = encode_file(&src, &EncodeOptions::default()).unwrap();
        let encode_dir = tmp.path().join("encoded");
        write_chunks(&encode_dir, &chunks).unwrap();

        let mut receiver = Receiver::new(tmp.path().join("recv"), DecodeMode::Best);
        receiver.handle_packet(meta(9, chunks.len() as u32, "msg")).unwrap();
        // Only ship the first half of the chunks.
        for chunk in &chunks[..chunks.len().div_ceil(2)] {
            let path = encode_dir.join(holo_container::chunk_file_name(chunk.block_index, chunk.block_count));
            let bytes = std::fs::read(path).unwrap();
            receiver
                .handle_packet(data(9, chunk.block_count, chunk.block_index, 0, 1, &bytes))
                .unwrap();
        }

        let out = receiver.finalize_transfer(9).unwrap();
        assert!(std::fs::read(out).unwrap().len() > 0);
    }

    #[test]
    fn idle_timeout_window_picks_up_stale_transfers_only() {
        let tmp = tempfile::tempdir().unwrap();
        let mut receiver = Receiver::new(tmp.path().to_path_buf(), DecodeMode::Best);
        receiver
            .handle_packet(data(3, 1, 0, 0, 1, b"abc"))
            .unwrap();
        let ids = receiver.expired_transfers(Duration::from_secs(0), std::time::Instant::now());
        assert_eq!(ids, vec![3]);
    }
}
