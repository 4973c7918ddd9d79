//! Error types for grin

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrinError {
    #[error("not a GRIN container: bad magic {found:#010x}")]
    BadMagic { found: u32 },

    #[error("malformed tree: serialized tree description ended early")]
    MalformedTree,

    #[error("truncated stream: payload ended mid-code before the end-of-stream mark")]
    TruncatedStream,

    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
