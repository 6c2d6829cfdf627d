use crate::bond::BondType;
use crate::mol::Mol;

pub trait HasBondType {
    fn bond_type(&self) -> BondType;
}

/// Capability to enumerate the independent connection tables of a composite
/// structure.
///
/// Ring queries on a composite concatenate the results of each substructure;
/// see [`find_all_rings_of`](crate::rings::find_all_rings_of) and friends.
pub trait Substructures<A, B> {
    fn substructures(&self) -> &[Mol<A, B>];
}
