/// Default atom type for a molecular graph node.
///
/// Ring perception never inspects node payloads — it only follows
/// connectivity — so `Atom` carries just enough identity to make test
/// structures and downstream consumers legible. Richer domain layers can
/// substitute their own node type through the [`Mol`](crate::Mol) generics.
///
/// # Examples
///
/// ```
/// use ringcrab::Atom;
///
/// let carbon = Atom { atomic_num: 6 };
/// assert_eq!(carbon.atomic_num, 6);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, 7 = N, …). Identifies the element.
    pub atomic_num: u8,
}
