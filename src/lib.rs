//! Ring perception for molecular graphs.
//!
//! Decomposes a structure's bond graph into cycle blocks (biconnected
//! components with at least one independent cycle), enumerates every simple
//! ring inside each block, and selects a deterministic Smallest Set of
//! Smallest Rings. Results are memoized per structure and invalidated by a
//! mutation-version counter.

pub mod atom;
pub mod blocks;
pub mod bond;
pub mod enumerate;
pub mod graph;
pub mod mol;
pub mod rings;
pub mod sssr;
pub mod traits;

pub use atom::Atom;
pub use bond::{Bond, BondType};
pub use graph::{mol_graph, CycleGraph, GraphError};
pub use mol::{Mol, MolSet};
pub use rings::{
    analyze_rings_of, find_all_rings_of, find_cycle_blocks_of, find_sssr_of, CycleBlockInfo, Ring,
    RingInfo, RingSearchOptions, DEFAULT_MAX_COMBINATIONS,
};
pub use traits::{HasBondType, Substructures};
