use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::bond::BondType;
use crate::mol::Mol;
use crate::traits::HasBondType;

/// The undirected multigraph fed to ring perception.
///
/// Vertices and edges carry opaque back-references (`V`, `E`) to the domain
/// objects they were built from; the algorithms never inspect them, and they
/// are resolved again only when results are reported. Parallel edges are
/// permitted and produce valid 2-rings.
///
/// The graph is ephemeral: built fresh per analysis (see [`mol_graph`]) and
/// discarded afterwards.
#[derive(Debug)]
pub struct CycleGraph<V, E> {
    graph: UnGraph<V, E>,
}

/// Errors produced when assembling a [`CycleGraph`] from explicit parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// The edge at this position references a vertex absent from the vertex set.
    UnknownEndpoint { edge: usize },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEndpoint { edge } => {
                write!(f, "edge {} references a vertex not in the graph", edge)
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl<V, E> CycleGraph<V, E> {
    /// Build a graph from explicit vertex and edge sets.
    ///
    /// Vertex references must be unique. Each edge names its two endpoints by
    /// vertex reference; an endpoint not present in `vertices` fails with
    /// [`GraphError::UnknownEndpoint`].
    pub fn from_parts<IV, IE>(vertices: IV, edges: IE) -> Result<Self, GraphError>
    where
        V: Copy + Eq + Hash,
        IV: IntoIterator<Item = V>,
        IE: IntoIterator<Item = (V, V, E)>,
    {
        let mut graph = UnGraph::default();
        let mut index_of: HashMap<V, NodeIndex> = HashMap::new();
        for v in vertices {
            let idx = graph.add_node(v);
            index_of.insert(v, idx);
        }
        for (pos, (a, b, weight)) in edges.into_iter().enumerate() {
            let (Some(&ia), Some(&ib)) = (index_of.get(&a), index_of.get(&b)) else {
                return Err(GraphError::UnknownEndpoint { edge: pos });
            };
            graph.add_edge(ia, ib, weight);
        }
        Ok(Self { graph })
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn vertices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    /// Incident edges of `idx`, each paired with the opposite endpoint.
    pub fn incident(&self, idx: NodeIndex) -> impl Iterator<Item = (EdgeIndex, NodeIndex)> + '_ {
        self.graph.edges(idx).map(move |e| {
            let other = if e.source() == idx {
                e.target()
            } else {
                e.source()
            };
            (e.id(), other)
        })
    }

    pub fn endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// The domain object this vertex was built from.
    pub fn vertex_ref(&self, idx: NodeIndex) -> &V {
        &self.graph[idx]
    }

    /// The domain object this edge was built from.
    pub fn edge_ref(&self, idx: EdgeIndex) -> &E {
        &self.graph[idx]
    }
}

/// Build the ring-perception graph for a molecule.
///
/// Only bonds whose type is in `bond_types` survive the adaptation; `None`
/// keeps every bond. Vertices are added in atom order, so internal vertex ids
/// follow atom insertion order and analysis output is reproducible.
///
/// Returns `None` for a structure with no atoms — callers treat that as zero
/// connectivity (an empty ring analysis), not as a failure.
pub fn mol_graph<A, B>(
    mol: &Mol<A, B>,
    bond_types: Option<&[BondType]>,
) -> Option<CycleGraph<NodeIndex, EdgeIndex>>
where
    B: HasBondType,
{
    if mol.atom_count() == 0 {
        return None;
    }
    let mut graph = UnGraph::with_capacity(mol.atom_count(), mol.bond_count());
    for atom in mol.atoms() {
        graph.add_node(atom);
    }
    for bond in mol.bonds() {
        let keep = match bond_types {
            None => true,
            Some(types) => types.contains(&mol.bond(bond).bond_type()),
        };
        if !keep {
            continue;
        }
        let Some((a, b)) = mol.bond_endpoints(bond) else {
            continue;
        };
        graph.add_edge(NodeIndex::new(a.index()), NodeIndex::new(b.index()), bond);
    }
    Some(CycleGraph { graph })
}
