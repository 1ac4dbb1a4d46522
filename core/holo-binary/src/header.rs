use crate::error::{BinaryCodecError, Result};
use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use std::io::Cursor;

/// `HBIN` v2 mode header: `total_len:u64, coarse_len:u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryHeader {
    pub total_len: u64,
    pub coarse_len: u32,
}

impl BinaryHeader {
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(12);
        buf.write_u64::<BE>(self.total_len)?;
        buf.write_u32::<BE>(self.coarse_len)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let total_len = cursor.read_u64::<BE>().map_err(|_| BinaryCodecError::BadHeader)?;
        let coarse_len = cursor.read_u32::<BE>().map_err(|_| BinaryCodecError::BadHeader)?;
        Ok(Self { total_len, coarse_len })
    }
}
