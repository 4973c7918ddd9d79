//! Huffman tree construction, preorder bit serialization, and code tables

use crate::error::GrinError;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::io;

use bitstream_io::{BitRead, BitWrite};

/// Alphabet member: literal bytes 0-255 plus [`PSEUDO_EOF`].
pub type Symbol = u16;

/// Synthetic symbol marking the logical end of the encoded payload. Always
/// assigned frequency >= 1, so every tree contains its leaf.
pub const PSEUDO_EOF: Symbol = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf(Symbol),
    Internal(Box<HuffNode>, Box<HuffNode>),
}

/// Min-heap entry. `seq` breaks weight ties FIFO so the built tree is
/// deterministic across runs.
struct HeapEntry {
    weight: u64,
    seq: u64,
    node: HuffNode,
}

impl Eq for HeapEntry {}
impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap is a max-heap, we want lowest weight first
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffTree {
    root: HuffNode,
}

impl HuffTree {
    /// Build an optimal prefix-code tree from a non-empty frequency table.
    ///
    /// Leaves enter the queue in table order; the two lowest-weight nodes are
    /// merged repeatedly, first-extracted becoming the left child. A table
    /// with a single entry yields a lone leaf root whose code is the empty
    /// bit-string.
    pub fn from_frequencies(table: &[(Symbol, u64)]) -> Self {
        let mut heap = BinaryHeap::with_capacity(table.len());
        let mut seq = 0u64;
        for &(symbol, weight) in table {
            heap.push(HeapEntry {
                weight,
                seq,
                node: HuffNode::Leaf(symbol),
            });
            seq += 1;
        }

        while heap.len() >= 2 {
            let first = heap.pop().unwrap();
            let second = heap.pop().unwrap();
            heap.push(HeapEntry {
                weight: first.weight + second.weight,
                seq,
                node: HuffNode::Internal(Box::new(first.node), Box::new(second.node)),
            });
            seq += 1;
        }

        let root = heap
            .pop()
            .expect("frequency table contains at least the pseudo-EOF entry")
            .node;
        Self { root }
    }

    /// Rebuild a tree from its preorder bit encoding: a 1 bit introduces an
    /// internal node (left subtree first), a 0 bit a leaf followed by its
    /// symbol in 9 bits.
    pub fn deserialize<R: BitRead>(input: &mut R) -> Result<Self, GrinError> {
        let root = read_node(input)?;
        Ok(Self { root })
    }

    /// Write the preorder bit encoding, the exact inverse of
    /// [`HuffTree::deserialize`]: `2L - 1` discriminator bits and 9 payload
    /// bits per leaf for a tree with `L` leaves.
    pub fn serialize<W: BitWrite>(&self, out: &mut W) -> io::Result<()> {
        write_node(&self.root, out)
    }

    /// Symbol-to-bits mapping read off the leaves: left edges append 0,
    /// right edges append 1. Distinct leaves of a binary tree, so the result
    /// is a prefix code by construction.
    pub fn code_table(&self) -> HashMap<Symbol, Vec<bool>> {
        let mut codes = HashMap::new();
        collect_codes(&self.root, Vec::new(), &mut codes);
        codes
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }
}

fn read_node<R: BitRead>(input: &mut R) -> Result<HuffNode, GrinError> {
    let internal = input.read_bit().map_err(tree_err)?;
    if internal {
        let left = read_node(input)?;
        let right = read_node(input)?;
        Ok(HuffNode::Internal(Box::new(left), Box::new(right)))
    } else {
        let symbol: Symbol = input.read(9).map_err(tree_err)?;
        if symbol > PSEUDO_EOF {
            return Err(GrinError::MalformedTree);
        }
        Ok(HuffNode::Leaf(symbol))
    }
}

fn write_node<W: BitWrite>(node: &HuffNode, out: &mut W) -> io::Result<()> {
    match node {
        HuffNode::Leaf(symbol) => {
            out.write_bit(false)?;
            out.write(9, *symbol)
        }
        HuffNode::Internal(left, right) => {
            out.write_bit(true)?;
            write_node(left, out)?;
            write_node(right, out)
        }
    }
}

fn collect_codes(node: &HuffNode, prefix: Vec<bool>, codes: &mut HashMap<Symbol, Vec<bool>>) {
    match node {
        HuffNode::Leaf(symbol) => {
            codes.insert(*symbol, prefix);
        }
        HuffNode::Internal(left, right) => {
            let mut path = prefix.clone();
            path.push(false);
            collect_codes(left, path, codes);
            let mut path = prefix;
            path.push(true);
            collect_codes(right, path, codes);
        }
    }
}

fn tree_err(e: io::Error) -> GrinError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        GrinError::MalformedTree
    } else {
        GrinError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitstream_io::{BigEndian, BitReader, BitWriter};
    use std::io::Cursor;

    fn serialize_to_bytes(tree: &HuffTree) -> Vec<u8> {
        let mut writer = BitWriter::endian(Vec::new(), BigEndian);
        tree.serialize(&mut writer).unwrap();
        writer.byte_align().unwrap();
        writer.into_writer()
    }

    fn deserialize_from_bytes(bytes: &[u8]) -> Result<HuffTree, GrinError> {
        let mut reader = BitReader::endian(Cursor::new(bytes), BigEndian);
        HuffTree::deserialize(&mut reader)
    }

    #[test]
    fn test_aaab_tree_shape() {
        // {65:3, 66:1, 256:1}: 66 and 256 merge first, then join 65
        let tree = HuffTree::from_frequencies(&[(65, 3), (66, 1), (PSEUDO_EOF, 1)]);
        let expected = HuffNode::Internal(
            Box::new(HuffNode::Internal(
                Box::new(HuffNode::Leaf(66)),
                Box::new(HuffNode::Leaf(PSEUDO_EOF)),
            )),
            Box::new(HuffNode::Leaf(65)),
        );
        assert_eq!(*tree.root(), expected);
    }

    #[test]
    fn test_aaab_code_lengths() {
        let tree = HuffTree::from_frequencies(&[(65, 3), (66, 1), (PSEUDO_EOF, 1)]);
        let codes = tree.code_table();
        assert_eq!(codes[&65].len(), 1);
        assert_eq!(codes[&66].len(), 2);
        assert_eq!(codes[&PSEUDO_EOF].len(), 2);
    }

    #[test]
    fn test_single_entry_table_yields_leaf_root() {
        let tree = HuffTree::from_frequencies(&[(PSEUDO_EOF, 1)]);
        assert_eq!(*tree.root(), HuffNode::Leaf(PSEUDO_EOF));
        let codes = tree.code_table();
        assert_eq!(codes.len(), 1);
        assert!(codes[&PSEUDO_EOF].is_empty());
    }

    #[test]
    fn test_prefix_code_validity() {
        let table: Vec<(Symbol, u64)> = vec![(10, 7), (20, 1), (30, 1), (40, 3), (PSEUDO_EOF, 1)];
        let codes = HuffTree::from_frequencies(&table).code_table();
        assert_eq!(codes.len(), table.len());
        for (sym_a, code_a) in &codes {
            for (sym_b, code_b) in &codes {
                if sym_a != sym_b {
                    assert!(
                        !code_b.starts_with(code_a),
                        "code of {sym_a} is a prefix of code of {sym_b}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_serialize_roundtrip() {
        let tree = HuffTree::from_frequencies(&[(0, 5), (65, 3), (255, 2), (PSEUDO_EOF, 1)]);
        let bytes = serialize_to_bytes(&tree);
        let rebuilt = deserialize_from_bytes(&bytes).unwrap();
        assert_eq!(rebuilt, tree);
    }

    #[test]
    fn test_serialize_single_leaf() {
        // 0 discriminator + 100000000 (256): 10 bits, padded to 2 bytes
        let tree = HuffTree::from_frequencies(&[(PSEUDO_EOF, 1)]);
        let bytes = serialize_to_bytes(&tree);
        assert_eq!(bytes, vec![0b0100_0000, 0b0000_0000]);
        assert_eq!(deserialize_from_bytes(&bytes).unwrap(), tree);
    }

    #[test]
    fn test_deserialize_truncated_is_malformed() {
        // lone 1 bit promises two subtrees that never arrive
        let err = deserialize_from_bytes(&[0b1000_0000]).unwrap_err();
        assert!(matches!(err, GrinError::MalformedTree));
    }

    #[test]
    fn test_deserialize_empty_is_malformed() {
        let err = deserialize_from_bytes(&[]).unwrap_err();
        assert!(matches!(err, GrinError::MalformedTree));
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_symbol() {
        // leaf with 9-bit value 257
        let mut writer = BitWriter::endian(Vec::new(), BigEndian);
        writer.write_bit(false).unwrap();
        writer.write(9, 257u16).unwrap();
        writer.byte_align().unwrap();
        let bytes = writer.into_writer();
        let err = deserialize_from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, GrinError::MalformedTree));
    }
}
