use std::cell::RefCell;
use std::rc::Rc;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::rings::RingInfo;
use crate::traits::Substructures;

/// A molecular graph: atoms of type `A` connected by bonds of type `B`.
///
/// Every structural mutation (adding, removing, or mutably borrowing an atom
/// or bond) bumps an internal version counter. The lazily computed ring
/// analysis is memoized against that counter, so a stale cache entry is
/// detected and discarded on the next read — no explicit notification wiring
/// is required, though [`invalidate_ring_info`](Mol::invalidate_ring_info)
/// allows dropping the memo eagerly.
///
/// Single-writer ownership is assumed; the cache uses `RefCell`/`Rc` and is
/// not safe to share across threads without external synchronization.
pub struct Mol<A, B> {
    graph: UnGraph<A, B>,
    version: u64,
    ring_cache: RefCell<Option<(u64, Rc<RingInfo>)>>,
}

impl<A, B> Mol<A, B> {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
            version: 0,
            ring_cache: RefCell::new(None),
        }
    }

    pub fn graph(&self) -> &UnGraph<A, B> {
        &self.graph
    }

    /// Monotonically incremented on every structural mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    pub fn atom(&self, idx: NodeIndex) -> &A {
        &self.graph[idx]
    }

    /// Mutable access to an atom. Counts as a structural modification.
    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut A {
        self.touch();
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    /// Mutable access to a bond. Counts as a structural modification.
    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut B {
        self.touch();
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: A) -> NodeIndex {
        self.touch();
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> EdgeIndex {
        self.touch();
        self.graph.add_edge(a, b, bond)
    }

    /// Remove an atom along with its incident bonds.
    ///
    /// The last atom index is swapped into `idx`, so outstanding atom and
    /// bond indices are invalidated.
    pub fn remove_atom(&mut self, idx: NodeIndex) -> Option<A> {
        self.touch();
        self.graph.remove_node(idx)
    }

    /// Remove a bond. The last bond index is swapped into `idx`, so
    /// outstanding bond indices are invalidated.
    pub fn remove_bond(&mut self, idx: EdgeIndex) -> Option<B> {
        self.touch();
        self.graph.remove_edge(idx)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// Drop the memoized ring analysis, forcing the next read to recompute.
    pub fn invalidate_ring_info(&self) {
        *self.ring_cache.borrow_mut() = None;
    }

    /// The memoized ring analysis, if it matches the current version.
    pub(crate) fn cached_ring_info(&self) -> Option<Rc<RingInfo>> {
        match &*self.ring_cache.borrow() {
            Some((version, info)) if *version == self.version => Some(Rc::clone(info)),
            _ => None,
        }
    }

    pub(crate) fn store_ring_info(&self, info: &Rc<RingInfo>) {
        *self.ring_cache.borrow_mut() = Some((self.version, Rc::clone(info)));
    }
}

impl<A: Clone, B: Clone> Clone for Mol<A, B> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            version: self.version,
            ring_cache: RefCell::new(self.ring_cache.borrow().clone()),
        }
    }
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: PartialEq, B: PartialEq> PartialEq for Mol<A, B> {
    fn eq(&self, other: &Self) -> bool {
        if self.atom_count() != other.atom_count() || self.bond_count() != other.bond_count() {
            return false;
        }
        for idx in self.atoms() {
            if self.atom(idx) != other.atom(idx) {
                return false;
            }
        }
        for idx in self.bonds() {
            if self.bond(idx) != other.bond(idx) {
                return false;
            }
            if self.bond_endpoints(idx) != other.bond_endpoints(idx) {
                return false;
            }
        }
        true
    }
}

impl<A, B> std::fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mol")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .field("version", &self.version)
            .finish()
    }
}

/// A flat collection of independent molecular graphs.
///
/// Composite ring queries ([`find_all_rings_of`](crate::rings::find_all_rings_of)
/// etc.) traverse the members and concatenate per-member results on every
/// read; each member keeps its own ring cache, so nothing at the collection
/// level needs invalidation.
#[derive(Debug, Default)]
pub struct MolSet<A, B> {
    mols: Vec<Mol<A, B>>,
}

impl<A, B> MolSet<A, B> {
    pub fn new() -> Self {
        Self { mols: Vec::new() }
    }

    pub fn push(&mut self, mol: Mol<A, B>) {
        self.mols.push(mol);
    }

    pub fn mols(&self) -> &[Mol<A, B>] {
        &self.mols
    }

    pub fn mols_mut(&mut self) -> &mut [Mol<A, B>] {
        &mut self.mols
    }

    pub fn len(&self) -> usize {
        self.mols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mols.is_empty()
    }
}

impl<A, B> Substructures<A, B> for MolSet<A, B> {
    fn substructures(&self) -> &[Mol<A, B>] {
        &self.mols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bond::BondType;

    fn triangle() -> Mol<(), BondType> {
        let mut mol = Mol::new();
        let a = mol.add_atom(());
        let b = mol.add_atom(());
        let c = mol.add_atom(());
        mol.add_bond(a, b, BondType::Covalent);
        mol.add_bond(b, c, BondType::Covalent);
        mol.add_bond(c, a, BondType::Covalent);
        mol
    }

    #[test]
    fn version_bumps_on_mutation() {
        let mut mol: Mol<(), BondType> = Mol::new();
        let v0 = mol.version();
        let a = mol.add_atom(());
        let b = mol.add_atom(());
        assert!(mol.version() > v0);
        let v1 = mol.version();
        let e = mol.add_bond(a, b, BondType::Covalent);
        assert!(mol.version() > v1);
        let v2 = mol.version();
        let _ = mol.bond_mut(e);
        assert!(mol.version() > v2);
        let v3 = mol.version();
        mol.remove_bond(e);
        assert!(mol.version() > v3);
        let v4 = mol.version();
        mol.remove_atom(a);
        assert!(mol.version() > v4);
    }

    #[test]
    fn remove_atom_drops_incident_bonds() {
        let mut mol = triangle();
        mol.remove_atom(petgraph::graph::NodeIndex::new(0));
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.bond_count(), 1);
    }

    #[test]
    fn clone_is_independent() {
        let mol = triangle();
        let mut copy = mol.clone();
        copy.add_atom(());
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(copy.atom_count(), 4);
    }

    #[test]
    fn eq_ignores_version() {
        let a = triangle();
        let mut b = triangle();
        let extra = b.add_atom(());
        b.remove_atom(extra);
        assert_ne!(a.version(), b.version());
        assert_eq!(a, b);
    }

    #[test]
    fn molset_exposes_members() {
        let mut set = MolSet::new();
        assert!(set.is_empty());
        set.push(triangle());
        set.push(Mol::new());
        assert_eq!(set.len(), 2);
        assert_eq!(set.mols()[0].atom_count(), 3);
    }
}
