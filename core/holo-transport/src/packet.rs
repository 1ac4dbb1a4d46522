use crate::error::{Result, TransportError};
use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use std::io::{Cursor, Read, Write};

pub const MAGIC: &[u8; 4] = b"HNET";
pub const PROTOCOL_VERSION: u8 = 1;
/// IPv4 UDP's maximum payload; segments are always fragmented to fit under it.
pub const MAX_UDP_PAYLOAD: usize = 65507;
pub const HEADER_LEN: usize = 4 + 1 + 1 + 4 + 4 + 4 + 2 + 2 + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    Meta,
    Data,
}

impl PacketType {
    fn to_u8(self) -> u8 {
        match self {
            PacketType::Meta => 0,
            PacketType::Data => 1,
        }
    }

    fn from_u8(b: u8) -> Option<Self> {
        match b {
            0 => Some(PacketType::Meta),
            1 => Some(PacketType::Data),
            _ => None,
        }
    }
}

/// One HNET datagram: a META announces a transfer's filename and chunk
/// count; a DATA segment carries one fragment of one chunk's on-disk bytes.
#[derive(Debug, Clone)]
pub struct Packet {
    pub packet_type: PacketType,
    pub transfer_id: u32,
    pub chunk_total: u32,
    pub chunk_index: u32,
    pub seg_index: u16,
    pub seg_count: u16,
    pub payload: Vec<u8>,
}

impl Packet {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.payload.len() > MAX_UDP_PAYLOAD {
            return Err(TransportError::PayloadTooLarge {
                payload_len: self.payload.len(),
                limit: MAX_UDP_PAYLOAD,
            });
        }
        let mut buf = Vec::with_capacity(HEADER_LEN + self.payload.len());
        buf.write_all(MAGIC)?;
        buf.write_u8(PROTOCOL_VERSION)?;
        buf.write_u8(self.packet_type.to_u8())?;
        buf.write_u32::<BE>(self.transfer_id)?;
        buf.write_u32::<BE>(self.chunk_total)?;
        buf.write_u32::<BE>(self.chunk_index)?;
        buf.write_u16::<BE>(self.seg_index)?;
        buf.write_u16::<BE>(self.seg_count)?;
        buf.write_u16::<BE>(self.payload.len() as u16)?;
        buf.write_all(&self.payload)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Packet> {
        let mut cursor = Cursor::new(bytes);
        let mut magic = [0u8; 4];
        cursor
            .read_exact(&mut magic)
            .map_err(|_| TransportError::MalformedPacket("truncated before magic".into()))?;
        if &magic != MAGIC {
            return Err(TransportError::MalformedPacket(format!(
                "bad magic {magic:?}"
            )));
        }

        let version = cursor
            .read_u8()
            .map_err(|_| TransportError::MalformedPacket("truncated version".into()))?;
        if version != PROTOCOL_VERSION {
            return Err(TransportError::MalformedPacket(format!(
                "unsupported protocol version {version}"
            )));
        }

        let packet_type = cursor
            .read_u8()
            .map_err(|_| TransportError::MalformedPacket("truncated type".into()))
            .and_then(|b| {
                PacketType::from_u8(b)
                    .ok_or_else(|| TransportError::MalformedPacket(format!("bad packet type {b}")))
            })?;

        let transfer_id = cursor
            .read_u32::<BE>()
            .map_err(|_| TransportError::MalformedPacket("truncated transfer_id".into()))?;
        let chunk_total = cursor
            .read_u32::<BE>()
            .map_err(|_| TransportError::MalformedPacket("truncated chunk_total".into()))?;
        let chunk_index = cursor
            .read_u32::<BE>()
            .map_err(|_| TransportError::MalformedPacket("truncated chunk_index".into()))?;
        let seg_index = cursor
            .read_u16::<BE>()
            .map_err(|_| TransportError::MalformedPacket("truncated seg_index".into()))?;
        let seg_count = cursor
            .read_u16::<BE>()
            .map_err(|_| TransportError::MalformedPacket("truncated seg_count".into()))?;
        let payload_len = cursor
            .read_u16::<BE>()
            .map_err(|_| TransportError::MalformedPacket("truncated payload_len".into()))?
            as usize;

        let mut payload = vec![0u8; payload_len];
        cursor
            .read_exact(&mut payload)
            .map_err(|_| TransportError::MalformedPacket("payload_len disagrees with packet length".into()))?;

        // A decoder MUST reject a packet whose declared payload_len disagrees
        // with what actually follows the header.
        let consumed = HEADER_LEN + payload_len;
        if consumed != bytes.len() {
            return Err(TransportError::MalformedPacket(
                "payload_len disagrees with packet length".into(),
            ));
        }

        Ok(Packet {
            packet_type,
            transfer_id,
            chunk_total,
            chunk_index,
            seg_index,
            seg_count,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let packet = Packet {
            packet_type: PacketType::Data,
            transfer_id: 7,
            chunk_total: 16,
            chunk_index: 3,
            seg_index: 1,
            seg_count: 4,
            payload: b"hello holo".to_vec(),
        };
        let bytes = packet.to_bytes().unwrap();
        let decoded = Packet::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.packet_type, PacketType::Data);
        assert_eq!(decoded.transfer_id, 7);
        assert_eq!(decoded.chunk_index, 3);
        assert_eq!(decoded.payload, b"hello holo");
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(b"XXXX");
        assert!(Packet::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        let packet = Packet {
            packet_type: PacketType::Meta,
            transfer_id: 1,
            chunk_total: 1,
            chunk_index: 0,
            seg_index: 0,
            seg_count: 1,
            payload: b"name.png".to_vec(),
        };
        let mut bytes = packet.to_bytes().unwrap();
        bytes.truncate(bytes.len() - 1);
        assert!(Packet::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_oversized_payload() {
        let packet = Packet {
            packet_type: PacketType::Data,
            transfer_id: 1,
            chunk_total: 1,
            chunk_index: 0,
            seg_index: 0,
            seg_count: 1,
            payload: vec![0u8; MAX_UDP_PAYLOAD + 1],
        };
        assert!(matches!(
            packet.to_bytes(),
            Err(TransportError::PayloadTooLarge { .. })
        ));
    }
}
