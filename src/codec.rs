//! Payload bit stream encoding and decoding

use crate::error::GrinError;
use crate::tree::{HuffNode, HuffTree, Symbol, PSEUDO_EOF};
use std::collections::HashMap;
use std::io;

use bitstream_io::{BitRead, BitWrite};

/// Rewrite `data` as a sequence of variable-length codes, terminated by the
/// pseudo-EOF code.
///
/// The code table must come from the tree built over this same buffer; a
/// missing entry is a programming error, not an input condition, and panics.
pub fn encode_stream<W: BitWrite>(
    data: &[u8],
    codes: &HashMap<Symbol, Vec<bool>>,
    out: &mut W,
) -> io::Result<()> {
    for &byte in data {
        let code = codes
            .get(&(byte as Symbol))
            .expect("code table covers every byte of the stream it was built from");
        for &bit in code {
            out.write_bit(bit)?;
        }
    }
    for &bit in &codes[&PSEUDO_EOF] {
        out.write_bit(bit)?;
    }
    Ok(())
}

/// Walk the tree bit-by-bit, emitting one byte per decoded leaf, until the
/// pseudo-EOF leaf is reached.
///
/// Running out of bits between codes ends decoding normally; running out
/// mid-descent is a `TruncatedStream`. Padding bits after the pseudo-EOF code
/// are never consumed.
pub fn decode_stream<R: BitRead>(
    input: &mut R,
    tree: &HuffTree,
    out: &mut Vec<u8>,
) -> Result<(), GrinError> {
    if let HuffNode::Leaf(symbol) = tree.root() {
        // A lone leaf assigns the empty bit-string. Only the pseudo-EOF leaf
        // is decodable that way; a lone data leaf would never consume a bit.
        return if *symbol == PSEUDO_EOF {
            Ok(())
        } else {
            Err(GrinError::MalformedTree)
        };
    }

    let mut node = tree.root();
    let mut descending = false;
    loop {
        let bit = match input.read_bit() {
            Ok(bit) => bit,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return if descending {
                    Err(GrinError::TruncatedStream)
                } else {
                    Ok(())
                };
            }
            Err(e) => return Err(e.into()),
        };

        node = match node {
            HuffNode::Internal(left, right) => {
                if bit {
                    right.as_ref()
                } else {
                    left.as_ref()
                }
            }
            HuffNode::Leaf(_) => unreachable!("leaf positions reset to the root"),
        };

        match node {
            HuffNode::Leaf(symbol) => {
                if *symbol == PSEUDO_EOF {
                    return Ok(());
                }
                out.push(*symbol as u8);
                node = tree.root();
                descending = false;
            }
            HuffNode::Internal(..) => descending = true,
        }
    }
}
