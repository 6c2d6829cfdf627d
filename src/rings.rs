use std::rc::Rc;

use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::{debug, warn};

use crate::blocks::cycle_blocks;
use crate::bond::BondType;
use crate::enumerate::{simple_rings, Cycle};
use crate::graph::{mol_graph, CycleGraph};
use crate::mol::Mol;
use crate::sssr::select_sssr;
use crate::traits::{HasBondType, Substructures};

/// Default bound on basis combinations examined per cycle block.
pub const DEFAULT_MAX_COMBINATIONS: usize = 1 << 16;

/// Options controlling a ring search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingSearchOptions {
    /// Bond types that may participate in rings. `None` admits every bond;
    /// the default admits covalent bonds only.
    pub bond_types: Option<Vec<BondType>>,
    /// Upper bound on basis combinations examined per cycle block. When the
    /// budget runs out the block is flagged
    /// [`truncated`](CycleBlockInfo::truncated) and partial results are
    /// returned; the search never errors and never runs unbounded.
    pub max_combinations: usize,
}

impl Default for RingSearchOptions {
    fn default() -> Self {
        Self {
            bond_types: Some(vec![BondType::Covalent]),
            max_combinations: DEFAULT_MAX_COMBINATIONS,
        }
    }
}

/// One ring, as molecule indices.
///
/// `bonds[i]` connects `atoms[i]` and `atoms[(i + 1) % len]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub atoms: Vec<NodeIndex>,
    pub bonds: Vec<EdgeIndex>,
}

impl Ring {
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// One cycle block: its membership, every simple ring inside it, and the
/// SSSR subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleBlockInfo {
    pub atoms: Vec<NodeIndex>,
    pub bonds: Vec<EdgeIndex>,
    /// Every simple ring in the block, ascending by size then lexicographic
    /// atom order.
    pub all_rings: Vec<Ring>,
    /// Minimal linearly independent basis drawn from `all_rings`; holds
    /// exactly `cycle_rank` rings unless the enumeration was truncated.
    pub sssr_rings: Vec<Ring>,
    /// True when the enumeration budget ran out for this block.
    pub truncated: bool,
}

impl CycleBlockInfo {
    /// Number of independent cycles: `bonds − atoms + 1`.
    pub fn cycle_rank(&self) -> usize {
        (self.bonds.len() + 1).saturating_sub(self.atoms.len())
    }
}

/// Full ring analysis of one structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingInfo {
    pub cycle_blocks: Vec<CycleBlockInfo>,
}

impl RingInfo {
    /// All rings across every block.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.cycle_blocks.iter().flat_map(|b| b.all_rings.iter())
    }

    /// The SSSR across every block.
    pub fn sssr(&self) -> impl Iterator<Item = &Ring> {
        self.cycle_blocks.iter().flat_map(|b| b.sssr_rings.iter())
    }

    /// True when any block's enumeration was truncated.
    pub fn truncated(&self) -> bool {
        self.cycle_blocks.iter().any(|b| b.truncated)
    }
}

fn analyze(g: &CycleGraph<NodeIndex, EdgeIndex>, max_combinations: usize) -> RingInfo {
    let blocks = cycle_blocks(g);
    debug!(blocks = blocks.len(), "decomposed into cycle blocks");

    let mut cycle_block_infos = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let enumeration = simple_rings(g, block, max_combinations);
        if enumeration.truncated {
            warn!(
                limit = max_combinations,
                rings = enumeration.rings.len(),
                "ring enumeration truncated"
            );
        }
        let picked = select_sssr(block, &enumeration.rings, block.cycle_rank());
        let all_rings: Vec<Ring> = enumeration.rings.iter().map(|c| to_ring(g, c)).collect();
        let sssr_rings = picked.iter().map(|&i| all_rings[i].clone()).collect();
        debug!(
            atoms = block.vertices.len(),
            bonds = block.edges.len(),
            all_rings = all_rings.len(),
            "enumerated block"
        );
        cycle_block_infos.push(CycleBlockInfo {
            atoms: block.vertices.iter().map(|&v| *g.vertex_ref(v)).collect(),
            bonds: block.edges.iter().map(|&e| *g.edge_ref(e)).collect(),
            all_rings,
            sssr_rings,
            truncated: enumeration.truncated,
        });
    }
    RingInfo {
        cycle_blocks: cycle_block_infos,
    }
}

fn to_ring(g: &CycleGraph<NodeIndex, EdgeIndex>, cycle: &Cycle) -> Ring {
    Ring {
        atoms: cycle.vertices.iter().map(|&v| *g.vertex_ref(v)).collect(),
        bonds: cycle.edges.iter().map(|&e| *g.edge_ref(e)).collect(),
    }
}

impl<A, B: HasBondType> Mol<A, B> {
    /// Ring system details, computed fresh with `options`. Never cached.
    pub fn analyze_rings(&self, options: &RingSearchOptions) -> RingInfo {
        match mol_graph(self, options.bond_types.as_deref()) {
            Some(g) => analyze(&g, options.max_combinations),
            None => RingInfo::default(),
        }
    }

    /// Ring system details under default options, memoized against the
    /// structure's mutation version.
    ///
    /// The first read after construction or mutation computes and stores the
    /// result; later reads return the shared memo. A previously obtained
    /// `Rc` keeps describing the topology it was computed from.
    pub fn ring_info(&self) -> Rc<RingInfo> {
        if let Some(info) = self.cached_ring_info() {
            return info;
        }
        let info = Rc::new(self.analyze_rings(&RingSearchOptions::default()));
        self.store_ring_info(&info);
        info
    }

    /// Every cycle block of the structure, from the cached analysis.
    pub fn find_cycle_blocks(&self) -> Vec<CycleBlockInfo> {
        self.ring_info().cycle_blocks.clone()
    }

    /// Every simple ring of the structure, flattened across blocks.
    pub fn find_all_rings(&self) -> Vec<Ring> {
        self.ring_info().rings().cloned().collect()
    }

    /// The SSSR of the structure, flattened across blocks.
    pub fn find_sssr(&self) -> Vec<Ring> {
        self.ring_info().sssr().cloned().collect()
    }
}

/// Cycle blocks of every substructure, concatenated.
pub fn find_cycle_blocks_of<A, B, S>(obj: &S) -> Vec<CycleBlockInfo>
where
    B: HasBondType,
    S: Substructures<A, B>,
{
    obj.substructures()
        .iter()
        .flat_map(|mol| mol.find_cycle_blocks())
        .collect()
}

/// All rings of every substructure, concatenated.
pub fn find_all_rings_of<A, B, S>(obj: &S) -> Vec<Ring>
where
    B: HasBondType,
    S: Substructures<A, B>,
{
    obj.substructures()
        .iter()
        .flat_map(|mol| mol.find_all_rings())
        .collect()
}

/// The SSSR of every substructure, concatenated.
pub fn find_sssr_of<A, B, S>(obj: &S) -> Vec<Ring>
where
    B: HasBondType,
    S: Substructures<A, B>,
{
    obj.substructures()
        .iter()
        .flat_map(|mol| mol.find_sssr())
        .collect()
}

/// Fresh ring analysis of every substructure, blocks concatenated.
pub fn analyze_rings_of<A, B, S>(obj: &S, options: &RingSearchOptions) -> RingInfo
where
    B: HasBondType,
    S: Substructures<A, B>,
{
    RingInfo {
        cycle_blocks: obj
            .substructures()
            .iter()
            .flat_map(|mol| mol.analyze_rings(options).cycle_blocks)
            .collect(),
    }
}
