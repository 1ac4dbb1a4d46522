use crate::error::{truncate_on_eof, ContainerError, Result};
use crate::mode::Mode;
use byteorder::{ReadBytesExt, WriteBytesExt, BE};
use std::io::{Read, Write};

/// Current per-mode container version. All three modes share one version
/// number; a decoder rejects anything greater than this.
pub const SUPPORTED_VERSION: u16 = 2;

/// One self-contained chunk file: coarse payload plus one compressed
/// residual slice, per spec.md §4.2. The container is fixed-order with no
/// TLV indirection, so `write`/`read` are straight sequential (de)serializers.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub mode: Mode,
    pub version: u16,
    pub mode_header: Vec<u8>,
    /// PNG bytes (image), deflated int16-LE (audio), or deflated raw bytes
    /// (binary) — identical across every chunk of one object.
    pub coarse: Vec<u8>,
    /// Deflate of this chunk's residual slice, in interleaver generation
    /// order.
    pub slice: Vec<u8>,
    pub block_index: u32,
    pub block_count: u32,
    pub n_total: u64,
}

pub fn write<W: Write>(w: &mut W, chunk: &Chunk) -> Result<()> {
    w.write_all(chunk.mode.magic())?;
    w.write_u16::<BE>(chunk.version)?;
    w.write_u32::<BE>(chunk.mode_header.len() as u32)?;
    w.write_all(&chunk.mode_header)?;
    w.write_u32::<BE>(chunk.coarse.len() as u32)?;
    w.write_all(&chunk.coarse)?;
    w.write_u32::<BE>(chunk.slice.len() as u32)?;
    w.write_all(&chunk.slice)?;
    w.write_u32::<BE>(chunk.block_index)?;
    w.write_u32::<BE>(chunk.block_count)?;
    w.write_u64::<BE>(chunk.n_total)?;
    Ok(())
}

pub fn read<R: Read>(r: &mut R) -> Result<Chunk> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic).map_err(truncate_on_eof)?;
    let mode = Mode::from_magic(&magic).ok_or(ContainerError::BadMagic(magic))?;

    let version = r.read_u16::<BE>().map_err(truncate_on_eof)?;
    if version > SUPPORTED_VERSION {
        return Err(ContainerError::BadVersion {
            mode,
            found: version,
            max: SUPPORTED_VERSION,
        });
    }

    let header_len = r.read_u32::<BE>().map_err(truncate_on_eof)? as usize;
    let mut mode_header = vec![0u8; header_len];
    r.read_exact(&mut mode_header).map_err(truncate_on_eof)?;

    let coarse_len = r.read_u32::<BE>().map_err(truncate_on_eof)? as usize;
    let mut coarse = vec![0u8; coarse_len];
    r.read_exact(&mut coarse).map_err(truncate_on_eof)?;

    let slice_len = r.read_u32::<BE>().map_err(truncate_on_eof)? as usize;
    let mut slice = vec![0u8; slice_len];
    r.read_exact(&mut slice).map_err(truncate_on_eof)?;

    let block_index = r.read_u32::<BE>().map_err(truncate_on_eof)?;
    let block_count = r.read_u32::<BE>().map_err(truncate_on_eof)?;
    let n_total = r.read_u64::<BE>().map_err(truncate_on_eof)?;

    Ok(Chunk {
        mode,
        version,
        mode_header,
        coarse,
        slice,
        block_index,
        block_count,
        n_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn roundtrip() {
        let chunk = Chunk {
            mode: Mode::Binary,
            version: SUPPORTED_VERSION,
            mode_header: vec![1, 2, 3, 4],
            coarse: b"coarse payload".to_vec(),
            slice: b"deflated slice bytes".to_vec(),
            block_index: 3,
            block_count: 16,
            n_total: 4096,
        };

        let mut buf = Vec::new();
        write(&mut buf, &chunk).unwrap();

        let mut cursor = Cursor::new(buf);
        let decoded = read(&mut cursor).unwrap();
        assert_eq!(decoded.mode, Mode::Binary);
        assert_eq!(decoded.version, SUPPORTED_VERSION);
        assert_eq!(decoded.mode_header, chunk.mode_header);
        assert_eq!(decoded.coarse, chunk.coarse);
        assert_eq!(decoded.slice, chunk.slice);
        assert_eq!(decoded.block_index, 3);
        assert_eq!(decoded.block_count, 16);
        assert_eq!(decoded.n_total, 4096);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"XXXX");
        let mut cursor = Cursor::new(buf);
        assert!(matches!(read(&mut cursor), Err(ContainerError::BadMagic(_))));
    }

    #[test]
    fn truncated_header_is_reported() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"HBIN");
        buf.extend_from_slice(&SUPPORTED_VERSION.to_be_bytes());
        // header_len claims 100 bytes but none follow.
        buf.extend_from_slice(&100u32.to_be_bytes());
        let mut cursor = Cursor::new(buf);
        assert!(matches!(read(&mut cursor), Err(ContainerError::Truncated)));
    }

    #[test]
    fn future_version_is_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"HBIN");
        buf.extend_from_slice(&(SUPPORTED_VERSION + 1).to_be_bytes());
        let mut cursor = Cursor::new(buf);
        assert!(matches!(
            read(&mut cursor),
            Err(ContainerError::BadVersion { .. })
        ));
    }
}
