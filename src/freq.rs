//! Byte frequency scan over the raw input

use crate::tree::{Symbol, PSEUDO_EOF};

/// Count byte occurrences in one pass and append the pseudo-EOF symbol.
///
/// Returns `(symbol, count)` pairs in ascending symbol order with only the
/// symbols actually present, pseudo-EOF last with count 1. The order is what
/// the tree builder inserts into its priority queue, so it pins which of the
/// equally-optimal trees gets built.
///
/// An empty input yields just `[(PSEUDO_EOF, 1)]`.
pub fn build(data: &[u8]) -> Vec<(Symbol, u64)> {
    let mut counts = [0u64; 256];
    for &b in data {
        counts[b as usize] += 1;
    }

    let mut table: Vec<(Symbol, u64)> = counts
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c > 0)
        .map(|(sym, &c)| (sym as Symbol, c))
        .collect();
    table.push((PSEUDO_EOF, 1));
    table
}
