use crate::error::{ImageCodecError, Result};
use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use std::io::Cursor;

/// `HIMG` v2 mode header: `width:u32, height:u32, channels:u8 = 3, thumb_side:u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub thumb_side: u16,
}

impl ImageHeader {
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(11);
        buf.write_u32::<BE>(self.width)?;
        buf.write_u32::<BE>(self.height)?;
        buf.write_u8(self.channels)?;
        buf.write_u16::<BE>(self.thumb_side)?;
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let width = cursor
            .read_u32::<BE>()
            .map_err(|_| ImageCodecError::BadHeader)?;
        let height = cursor
            .read_u32::<BE>()
            .map_err(|_| ImageCodecError::BadHeader)?;
        let channels = cursor
            .read_u8()
            .map_err(|_| ImageCodecError::BadHeader)?;
        let thumb_side = cursor
            .read_u16::<BE>()
            .map_err(|_| ImageCodecError::BadHeader)?;
        Ok(Self {
            width,
            height,
            channels,
            thumb_side,
        })
    }
}
