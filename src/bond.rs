/// Category of connection between two atoms.
///
/// Ring perception filters edges by category before building its graph: by
/// default only [`BondType::Covalent`] bonds may participate in a ring. The
/// selection is widened (or removed entirely) through
/// [`RingSearchOptions::bond_types`](crate::RingSearchOptions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondType {
    #[default]
    Covalent,
    Ionic,
    Coordinate,
    Hydrogen,
    Unknown,
}

/// Default bond type for a molecular graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub bond_type: BondType,
}

impl Default for Bond {
    fn default() -> Self {
        Self {
            bond_type: BondType::Covalent,
        }
    }
}

impl crate::traits::HasBondType for Bond {
    fn bond_type(&self) -> BondType {
        self.bond_type
    }
}

impl crate::traits::HasBondType for BondType {
    fn bond_type(&self) -> BondType {
        *self
    }
}
