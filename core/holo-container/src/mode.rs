/// The closed set of media modes a chunk can carry, tagged on the wire by
/// its 4-byte magic. Shared between the container (validation) and the
/// dispatcher (routing) so the magic bytes are spelled out exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Image,
    Audio,
    Binary,
}

impl Mode {
    pub const fn magic(self) -> &'static [u8; 4] {
        match self {
            Mode::Image => b"HIMG",
            Mode::Audio => b"HAUD",
            Mode::Binary => b"HBIN",
        }
    }

    pub const fn from_magic(magic: &[u8; 4]) -> Option<Mode> {
        match magic {
            b"HIMG" => Some(Mode::Image),
            b"HAUD" => Some(Mode::Audio),
            b"HBIN" => Some(Mode::Binary),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mode::Image => "image",
            Mode::Audio => "audio",
            Mode::Binary => "binary",
        };
        f.write_str(name)
    }
}
