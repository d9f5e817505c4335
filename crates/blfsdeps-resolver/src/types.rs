use std::collections::BTreeSet;

use blfsdeps_core::DependencyTier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackages {
    pub root: String,
    pub tier: DependencyTier,
    /// Root first, then dependencies in the order they were discovered.
    pub discovery_order: Vec<String>,
    /// Names referenced by some package but absent from the database.
    pub dangling: BTreeSet<String>,
}

impl ResolvedPackages {
    /// Leaves before dependents: the reverse of discovery order.
    pub fn install_order(&self) -> Vec<String> {
        self.discovery_order.iter().rev().cloned().collect()
    }
}
