//! Smallest Set of Smallest Rings selection.
//!
//! Rings are represented as edge-incidence bit-vectors over GF(2); a ring
//! joins the selection only while it is linearly independent of everything
//! selected so far. Given the enumerator's canonical ordering (ascending ring
//! size, ties broken lexicographically) the outcome is deterministic, though
//! not claimed unique among all valid minimal bases.

use std::collections::HashMap;

use petgraph::graph::EdgeIndex;

use crate::blocks::CycleBlock;
use crate::enumerate::Cycle;

/// Pick the positions of the first `rank` linearly independent rings from
/// `candidates`, scanned in the given order.
///
/// `candidates` must be rings of `block`; their edge vectors are taken over
/// the block's edge set. Returns fewer than `rank` positions only when the
/// candidate list itself is incomplete (a truncated enumeration).
pub fn select_sssr(block: &CycleBlock, candidates: &[Cycle], rank: usize) -> Vec<usize> {
    if rank == 0 {
        return Vec::new();
    }
    let position: HashMap<EdgeIndex, usize> = block
        .edges
        .iter()
        .enumerate()
        .map(|(i, &e)| (e, i))
        .collect();
    let words = block.edges.len().div_ceil(64);

    let mut basis: Vec<Vec<u64>> = Vec::with_capacity(rank);
    let mut picked = Vec::with_capacity(rank);
    for (i, ring) in candidates.iter().enumerate() {
        if picked.len() >= rank {
            break;
        }
        let mut bv = vec![0u64; words];
        for e in &ring.edges {
            if let Some(&p) = position.get(e) {
                set_bit(&mut bv, p);
            }
        }
        if bv.iter().all(|&w| w == 0) {
            continue;
        }
        if try_add_to_basis(&mut basis, bv) {
            picked.push(i);
        }
    }
    picked
}

fn try_add_to_basis(basis: &mut Vec<Vec<u64>>, candidate: Vec<u64>) -> bool {
    let mut v = candidate;
    for row in basis.iter() {
        if let Some(p) = leading_bit(row) {
            if v[p / 64] & (1u64 << (p % 64)) != 0 {
                xor_into(&mut v, row);
            }
        }
    }
    if v.iter().all(|&w| w == 0) {
        return false;
    }
    basis.push(v);
    true
}

pub(crate) fn leading_bit(bv: &[u64]) -> Option<usize> {
    for (i, &word) in bv.iter().enumerate() {
        if word != 0 {
            return Some(i * 64 + word.trailing_zeros() as usize);
        }
    }
    None
}

pub(crate) fn xor_into(a: &mut [u64], b: &[u64]) {
    for (aw, bw) in a.iter_mut().zip(b.iter()) {
        *aw ^= *bw;
    }
}

pub(crate) fn set_bit(bv: &mut [u64], i: usize) {
    bv[i / 64] |= 1u64 << (i % 64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::cycle_blocks;
    use crate::enumerate::simple_rings;
    use crate::graph::CycleGraph;

    fn graph(vertices: u32, edges: &[(u32, u32)]) -> CycleGraph<u32, usize> {
        CycleGraph::from_parts(
            0..vertices,
            edges.iter().enumerate().map(|(i, &(a, b))| (a, b, i)),
        )
        .expect("valid parts")
    }

    fn sssr_sizes(g: &CycleGraph<u32, usize>) -> Vec<Vec<usize>> {
        cycle_blocks(g)
            .iter()
            .map(|block| {
                let rings = simple_rings(g, block, 1 << 16).rings;
                select_sssr(block, &rings, block.cycle_rank())
                    .iter()
                    .map(|&i| rings[i].vertices.len())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn single_ring_selects_itself() {
        let edges: Vec<(u32, u32)> = (0..6).map(|i| (i, (i + 1) % 6)).collect();
        assert_eq!(sssr_sizes(&graph(6, &edges)), vec![vec![6]]);
    }

    #[test]
    fn fused_hexagons_prefer_the_small_rings() {
        let g = graph(
            10,
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 4),
                (4, 5),
                (5, 0),
                (5, 6),
                (6, 7),
                (7, 8),
                (8, 9),
                (9, 0),
            ],
        );
        // the 10-ring is dependent on the two hexagons and never selected
        assert_eq!(sssr_sizes(&g), vec![vec![6, 6]]);
    }

    #[test]
    fn norbornane_skeleton() {
        // bridgeheads 0 and 3, paths 0-1-2-3, 0-4-5-3, 0-6-3
        let g = graph(
            7,
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (0, 4),
                (4, 5),
                (5, 3),
                (0, 6),
                (6, 3),
            ],
        );
        assert_eq!(sssr_sizes(&g), vec![vec![5, 5]]);
    }

    #[test]
    fn cube_faces() {
        let g = graph(
            8,
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 0),
                (4, 5),
                (5, 6),
                (6, 7),
                (7, 4),
                (0, 4),
                (1, 5),
                (2, 6),
                (3, 7),
            ],
        );
        // six faces with one GF(2) relation among them: five get selected
        assert_eq!(sssr_sizes(&g), vec![vec![4, 4, 4, 4, 4]]);
    }

    #[test]
    fn selection_is_independent() {
        let g = graph(
            10,
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 4),
                (4, 5),
                (5, 0),
                (5, 6),
                (6, 7),
                (7, 8),
                (8, 9),
                (9, 0),
            ],
        );
        let blocks = cycle_blocks(&g);
        let block = &blocks[0];
        let rings = simple_rings(&g, block, 1 << 16).rings;
        let picked = select_sssr(block, &rings, block.cycle_rank());

        // no nonempty subset of the selection XORs to zero
        let position: HashMap<EdgeIndex, usize> = block
            .edges
            .iter()
            .enumerate()
            .map(|(i, &e)| (e, i))
            .collect();
        let words = block.edges.len().div_ceil(64);
        for mask in 1u32..(1 << picked.len()) {
            let mut acc = vec![0u64; words];
            for (j, &ring_ix) in picked.iter().enumerate() {
                if mask & (1 << j) != 0 {
                    for e in &rings[ring_ix].edges {
                        acc[position[e] / 64] ^= 1 << (position[e] % 64);
                    }
                }
            }
            assert!(acc.iter().any(|&w| w != 0), "dependent subset {mask:b}");
        }
    }

    #[test]
    fn zero_rank_selects_nothing() {
        let block = CycleBlock {
            vertices: Vec::new(),
            edges: Vec::new(),
        };
        assert!(select_sssr(&block, &[], 0).is_empty());
    }
}
