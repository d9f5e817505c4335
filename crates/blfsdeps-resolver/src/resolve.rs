use std::collections::{BTreeSet, HashSet, VecDeque};

use anyhow::Result;
use blfsdeps_core::{DependencyTier, PackageDatabase};
use tracing::{debug, warn};

use crate::types::ResolvedPackages;

/// Expands `root` into every package reachable through the tiers selected by
/// `tier`, breadth first.
///
/// A name is listed once, the first time it is seen; that rule alone keeps
/// cycles from looping. Names missing from the database stay in the listing
/// but are not expanded, and are reported in `dangling`.
pub fn resolve_dependencies(
    db: &PackageDatabase,
    root: &str,
    tier: DependencyTier,
) -> Result<ResolvedPackages> {
    db.require(root)?;

    let mut discovery_order = vec![root.to_string()];
    let mut visited: HashSet<String> = HashSet::from([root.to_string()]);
    let mut queue: VecDeque<String> = VecDeque::from([root.to_string()]);
    let mut dangling = BTreeSet::new();

    while let Some(current) = queue.pop_front() {
        let Some(record) = db.get(&current) else {
            warn!(package = %current, "dependency is not in the package database; not expanding it");
            dangling.insert(current);
            continue;
        };

        for dependency in record.dependency_names(tier) {
            if visited.insert(dependency.to_string()) {
                debug!(package = %current, dependency, "discovered dependency");
                discovery_order.push(dependency.to_string());
                queue.push_back(dependency.to_string());
            }
        }
    }

    Ok(ResolvedPackages {
        root: root.to_string(),
        tier,
        discovery_order,
        dangling,
    })
}
