use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("codec error: {0}")]
    Codec(#[from] holo_codec::CodecError),
    #[error("malformed HNET packet: {0}")]
    MalformedPacket(String),
    #[error("strict-mode transfer {transfer_id} is missing {missing} of {total} chunks")]
    Incomplete {
        transfer_id: u32,
        missing: u32,
        total: u32,
    },
    #[error("payload of {payload_len} bytes exceeds the UDP datagram limit of {limit}")]
    PayloadTooLarge { payload_len: usize, limit: usize },
}
