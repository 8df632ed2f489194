use std::collections::{HashMap, HashSet};

use crate::cell::raw::{RawBagOfCells, RawCell};
use crate::cell::{ArcCell, BagOfCells, TonCellError};
use crate::TonHash;

/// Orders unique cells so that every parent precedes its children.
///
/// Cells are deduplicated by representation hash; ordering is the reversed
/// post-order of a depth-first walk, which puts the first root at index 0.
pub(crate) fn convert_to_raw_boc(boc: &BagOfCells) -> Result<RawBagOfCells, TonCellError> {
    let mut visited: HashSet<TonHash> = HashSet::new();
    let mut post_order: Vec<ArcCell> = Vec::new();
    for root in &boc.roots {
        visit(root, &mut visited, &mut post_order);
    }
    post_order.reverse();

    let index_by_hash: HashMap<TonHash, usize> = post_order
        .iter()
        .enumerate()
        .map(|(idx, cell)| (cell.cell_hash(), idx))
        .collect();

    let cells = post_order
        .iter()
        .map(|cell| {
            let references = cell
                .references()
                .iter()
                .map(|r| lookup_index(&index_by_hash, &r.cell_hash()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RawCell {
                data: cell.data().to_vec(),
                bit_len: cell.bit_len(),
                references,
            })
        })
        .collect::<Result<Vec<_>, TonCellError>>()?;

    let roots = boc
        .roots
        .iter()
        .map(|root| lookup_index(&index_by_hash, &root.cell_hash()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawBagOfCells { cells, roots })
}

fn visit(cell: &ArcCell, visited: &mut HashSet<TonHash>, post_order: &mut Vec<ArcCell>) {
    if !visited.insert(cell.cell_hash()) {
        return;
    }
    for reference in cell.references() {
        visit(reference, visited, post_order);
    }
    post_order.push(cell.clone());
}

fn lookup_index(
    index_by_hash: &HashMap<TonHash, usize>,
    hash: &TonHash,
) -> Result<usize, TonCellError> {
    index_by_hash.get(hash).copied().ok_or_else(|| {
        TonCellError::BagOfCellsSerializationError(format!(
            "Couldn't find cell with hash {} in the index",
            hex::encode(hash)
        ))
    })
}
