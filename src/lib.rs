//! grin: Huffman file compressor/decompressor.
//!
//! Produces a self-describing container:
//! - 32-bit magic identifier (1846), most-significant bit first
//! - the Huffman tree, bit-serialized in preorder
//! - the payload as variable-length codes, terminated by a pseudo-EOF code
//!   and zero-padded to a byte boundary
//!
//! The alphabet is 257 symbols: bytes 0-255 plus the reserved pseudo-EOF
//! symbol 256, which lets the decoder stop without a stored payload length.

pub mod codec;
pub mod error;
pub mod freq;
pub mod tree;

use std::fs;
use std::io::Cursor;
use std::path::Path;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use tracing::debug;

use crate::error::GrinError;
use crate::tree::HuffTree;

/// Container magic identifier.
pub const MAGIC: u32 = 1846;

/// Compress a byte buffer into a GRIN container.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, GrinError> {
    let table = freq::build(data);
    let tree = HuffTree::from_frequencies(&table);
    let codes = tree.code_table();
    debug!(symbols = table.len(), "built huffman tree");

    let mut writer = BitWriter::endian(Vec::new(), BigEndian);
    writer.write(32, MAGIC)?;
    tree.serialize(&mut writer)?;
    codec::encode_stream(data, &codes, &mut writer)?;
    writer.byte_align()?;

    let container = writer.into_writer();
    debug!(
        original = data.len(),
        compressed = container.len(),
        "encoded container"
    );
    Ok(container)
}

/// Decompress a GRIN container back into the original bytes.
pub fn decompress(container: &[u8]) -> Result<Vec<u8>, GrinError> {
    let mut reader = BitReader::endian(Cursor::new(container), BigEndian);
    let found: u32 = reader.read(32).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => GrinError::BadMagic { found: 0 },
        _ => GrinError::Io(e),
    })?;
    if found != MAGIC {
        return Err(GrinError::BadMagic { found });
    }

    let tree = HuffTree::deserialize(&mut reader)?;
    let mut data = Vec::new();
    codec::decode_stream(&mut reader, &tree, &mut data)?;
    debug!(
        compressed = container.len(),
        original = data.len(),
        "decoded container"
    );
    Ok(data)
}

/// Compress the file at `input` into a GRIN container at `output`.
///
/// The container is built in memory and persisted with a single write, so a
/// failed encode never leaves a partial output file behind.
pub fn encode(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<(), GrinError> {
    let data = fs::read(input)?;
    let container = compress(&data)?;
    fs::write(output, container)?;
    Ok(())
}

/// Decompress the GRIN container at `input` into the file at `output`.
///
/// Same write discipline as [`encode`]: nothing is written unless the whole
/// container decodes.
pub fn decode(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<(), GrinError> {
    let container = fs::read(input)?;
    let data = decompress(&container)?;
    fs::write(output, data)?;
    Ok(())
}
