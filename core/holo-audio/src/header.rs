use crate::error::{AudioCodecError, Result};
use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use std::io::Cursor;

/// `HAUD` v2 mode header: `frames:u32, channels:u16, sample_rate:u32, coarse_frames:u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioHeader {
    pub frames: u32,
    pub channels: u16,
    pub sample_rate: u32,
    pub coarse_frames: u32,
}

impl AudioHeader {
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(14);
        buf.write_u32::<BE>(self.frames)?;
        buf.write_u16::<BE>(self.channels)?;
        buf.write_u32::<BE>(self.sample_rate)?;
        buf.write_u32::<BE>(self.coarse_frames)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let frames = cursor.read_u32::<BE>().map_err(|_| AudioCodecError::BadHeader)?;
        let channels = cursor.read_u16::<BE>().map_err(|_| AudioCodecError::BadHeader)?;
        let sample_rate = cursor.read_u32::<BE>().map_err(|_| AudioCodecError::BadHeader)?;
        let coarse_frames = cursor.read_u32::<BE>().map_err(|_| AudioCodecError::BadHeader)?;
        Ok(Self {
            frames,
            channels,
            sample_rate,
            coarse_frames,
        })
    }
}
