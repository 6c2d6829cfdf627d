use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::blocks::CycleBlock;
use crate::graph::CycleGraph;
use crate::sssr::{set_bit, xor_into};

/// A simple cycle inside one block, in perception-graph index space.
///
/// `edges[i]` connects `vertices[i]` and `vertices[(i + 1) % len]`. The
/// rotation is canonical: the smallest vertex comes first and, for cycles
/// longer than two, the direction runs toward the smaller of its two
/// neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub vertices: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
}

/// Result of enumerating one block's rings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    /// Every simple ring found, ordered by ascending size then by ascending
    /// lexicographic vertex sequence.
    pub rings: Vec<Cycle>,
    /// True when the combination budget ran out before the search space was
    /// exhausted; `rings` then holds partial results.
    pub truncated: bool,
}

/// Enumerate every simple ring fully contained in `block`.
///
/// Computes a fundamental cycle basis (spanning tree plus one cycle per
/// non-tree edge), then examines symmetric-difference combinations of basis
/// cycles in ascending subset-size order, keeping each combination whose edge
/// set forms one connected simple cycle. The fundamental cycles themselves
/// are examined first, so a truncated search still surfaces a complete basis.
///
/// `max_combinations` bounds the number of combinations examined; the search
/// never recurses and never runs past the budget.
pub fn simple_rings<V, E>(
    g: &CycleGraph<V, E>,
    block: &CycleBlock,
    max_combinations: usize,
) -> Enumeration {
    let words = block.edges.len().div_ceil(64);
    let position: HashMap<EdgeIndex, usize> = block
        .edges
        .iter()
        .enumerate()
        .map(|(i, &e)| (e, i))
        .collect();

    let basis = fundamental_basis(g, block, &position, words);
    let rank = basis.len();
    debug_assert_eq!(rank, block.cycle_rank());

    let mut rings = Vec::new();
    let mut truncated = false;
    let mut budget = max_combinations;

    // fundamental cycles are examined before any combination
    for bv in &basis {
        if budget == 0 {
            truncated = true;
            break;
        }
        budget -= 1;
        if let Some(cycle) = walk_cycle(g, block, bv) {
            rings.push(cycle);
        }
    }

    if !truncated && rank >= 2 {
        if rank > 63 {
            // more than 63 basis cycles cannot be indexed by a u64 mask
            truncated = true;
        } else {
            'combos: for k in 2..=rank {
                let end: u64 = 1 << rank;
                let mut mask: u64 = (1 << k) - 1;
                while mask < end {
                    if budget == 0 {
                        truncated = true;
                        break 'combos;
                    }
                    budget -= 1;
                    let mut bv = vec![0u64; words];
                    let mut bits = mask;
                    while bits != 0 {
                        xor_into(&mut bv, &basis[bits.trailing_zeros() as usize]);
                        bits &= bits - 1;
                    }
                    if let Some(cycle) = walk_cycle(g, block, &bv) {
                        rings.push(cycle);
                    }
                    // Gosper's hack: next mask with k bits set
                    let low = mask & mask.wrapping_neg();
                    let rippled = mask + low;
                    mask = (((rippled ^ mask) >> 2) / low) | rippled;
                }
            }
        }
    }

    rings.sort_by(|a, b| {
        a.vertices
            .len()
            .cmp(&b.vertices.len())
            .then_with(|| a.vertices.cmp(&b.vertices))
    });

    Enumeration { rings, truncated }
}

/// One edge bit-vector per non-tree edge: the non-tree edge itself plus the
/// tree path between its endpoints.
fn fundamental_basis<V, E>(
    g: &CycleGraph<V, E>,
    block: &CycleBlock,
    position: &HashMap<EdgeIndex, usize>,
    words: usize,
) -> Vec<Vec<u64>> {
    let Some(&start) = block.vertices.first() else {
        return Vec::new();
    };

    let mut adj: HashMap<NodeIndex, Vec<(EdgeIndex, NodeIndex)>> = HashMap::new();
    for &e in &block.edges {
        let Some((a, b)) = g.endpoints(e) else { continue };
        adj.entry(a).or_default().push((e, b));
        adj.entry(b).or_default().push((e, a));
    }

    let mut parent: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> = HashMap::new();
    let mut depth: HashMap<NodeIndex, usize> = HashMap::new();
    let mut tree_edges: HashSet<EdgeIndex> = HashSet::new();
    depth.insert(start, 0);
    let mut queue = VecDeque::from([start]);
    while let Some(v) = queue.pop_front() {
        let d = depth[&v];
        for &(e, w) in &adj[&v] {
            if depth.contains_key(&w) {
                continue;
            }
            depth.insert(w, d + 1);
            parent.insert(w, (v, e));
            tree_edges.insert(e);
            queue.push_back(w);
        }
    }

    let mut basis = Vec::with_capacity(block.cycle_rank());
    for &e in &block.edges {
        if tree_edges.contains(&e) {
            continue;
        }
        let Some((a, b)) = g.endpoints(e) else { continue };
        let mut bv = vec![0u64; words];
        set_bit(&mut bv, position[&e]);
        let (mut x, mut y) = (a, b);
        while depth[&x] > depth[&y] {
            let (p, pe) = parent[&x];
            set_bit(&mut bv, position[&pe]);
            x = p;
        }
        while depth[&y] > depth[&x] {
            let (p, pe) = parent[&y];
            set_bit(&mut bv, position[&pe]);
            y = p;
        }
        while x != y {
            let (px, ex) = parent[&x];
            set_bit(&mut bv, position[&ex]);
            x = px;
            let (py, ey) = parent[&y];
            set_bit(&mut bv, position[&ey]);
            y = py;
        }
        basis.push(bv);
    }
    basis
}

/// Reconstruct the simple cycle an edge bit-vector describes, or `None` if
/// the selected edges are not one connected cycle with every vertex at
/// degree two.
///
/// The walk follows edges rather than neighbor vertices, so a pair of
/// parallel edges reconstructs as a valid 2-ring.
fn walk_cycle<V, E>(g: &CycleGraph<V, E>, block: &CycleBlock, bv: &[u64]) -> Option<Cycle> {
    let mut selected = Vec::new();
    for (i, &e) in block.edges.iter().enumerate() {
        if bv[i / 64] & (1u64 << (i % 64)) != 0 {
            selected.push(e);
        }
    }
    if selected.len() < 2 {
        return None;
    }

    let mut adj: HashMap<NodeIndex, Vec<(EdgeIndex, NodeIndex)>> = HashMap::new();
    for &e in &selected {
        let (a, b) = g.endpoints(e)?;
        adj.entry(a).or_default().push((e, b));
        adj.entry(b).or_default().push((e, a));
    }
    if adj.values().any(|incident| incident.len() != 2) {
        return None;
    }

    let start = *adj.keys().min()?;
    let mut vertices = Vec::with_capacity(selected.len());
    let mut edges = Vec::with_capacity(selected.len());
    let mut current = start;
    let mut arrived_by: Option<EdgeIndex> = None;
    loop {
        vertices.push(current);
        let &(e, next) = adj[&current]
            .iter()
            .find(|&&(e, _)| Some(e) != arrived_by)?;
        edges.push(e);
        arrived_by = Some(e);
        current = next;
        if current == start {
            break;
        }
    }
    // a disconnected selection leaves edges unwalked
    if edges.len() != selected.len() {
        return None;
    }
    Some(canonical(vertices, edges))
}

fn canonical(vertices: Vec<NodeIndex>, edges: Vec<EdgeIndex>) -> Cycle {
    let len = vertices.len();
    let min_pos = vertices
        .iter()
        .enumerate()
        .min_by_key(|&(_, v)| v)
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut vs = Vec::with_capacity(len);
    let mut es = Vec::with_capacity(len);
    for i in 0..len {
        vs.push(vertices[(min_pos + i) % len]);
        es.push(edges[(min_pos + i) % len]);
    }
    if len > 2 && vs[1] > vs[len - 1] {
        // edge i connects vs[i] and vs[i + 1]; reversing the vertex tail
        // reverses the edge sequence
        vs[1..].reverse();
        es.reverse();
    }
    Cycle {
        vertices: vs,
        edges: es,
    }
}
