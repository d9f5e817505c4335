use std::collections::HashSet;

use blfsdeps_core::{DepsError, DependencyTier, PackageDatabase, PackageDependencies, PackageRecord};
use proptest::prelude::*;

use super::*;

fn record(required: &[&str], recommended: &[&str], optional: &[&str]) -> PackageRecord {
    let names = |list: &[&str]| -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    };
    PackageRecord {
        dependencies: PackageDependencies {
            required: names(required),
            recommended: names(recommended),
            optional: names(optional),
        },
        ..PackageRecord::default()
    }
}

fn database(entries: Vec<(&str, PackageRecord)>) -> PackageDatabase {
    entries
        .into_iter()
        .map(|(name, record)| (name.to_string(), record))
        .collect()
}

#[test]
fn resolves_chain_root_first() {
    let db = database(vec![("A", record(&["B"], &[], &[])), ("B", record(&[], &[], &[]))]);

    let resolved =
        resolve_dependencies(&db, "A", DependencyTier::Required).expect("must resolve");

    assert_eq!(resolved.discovery_order, vec!["A", "B"]);
    assert_eq!(resolved.install_order(), vec!["B", "A"]);
    assert!(resolved.dangling.is_empty());
}

#[test]
fn terminates_on_two_package_cycle() {
    let db = database(vec![("A", record(&["B"], &[], &[])), ("B", record(&["A"], &[], &[]))]);

    let resolved =
        resolve_dependencies(&db, "A", DependencyTier::Required).expect("must resolve");

    assert_eq!(resolved.discovery_order, vec!["A", "B"]);
}

#[test]
fn terminates_on_self_dependency() {
    let db = database(vec![("A", record(&["A"], &["A"], &[]))]);

    let resolved =
        resolve_dependencies(&db, "A", DependencyTier::Recommended).expect("must resolve");

    assert_eq!(resolved.discovery_order, vec!["A"]);
}

#[test]
fn shared_dependency_is_listed_once() {
    let db = database(vec![
        ("app", record(&["gtk", "glib"], &[], &[])),
        ("gtk", record(&["glib", "cairo"], &[], &[])),
        ("glib", record(&["pcre2"], &[], &[])),
        ("cairo", record(&["glib"], &[], &[])),
        ("pcre2", record(&[], &[], &[])),
    ]);

    let resolved =
        resolve_dependencies(&db, "app", DependencyTier::Required).expect("must resolve");

    assert_eq!(
        resolved.discovery_order,
        vec!["app", "gtk", "glib", "cairo", "pcre2"]
    );
}

#[test]
fn discovery_is_breadth_first_with_tiers_in_order() {
    let db = database(vec![
        ("root", record(&["a"], &["b"], &["c"])),
        ("a", record(&["a1"], &["a2"], &[])),
        ("b", record(&["b1"], &[], &[])),
        ("c", record(&[], &[], &[])),
        ("a1", record(&[], &[], &[])),
        ("a2", record(&[], &[], &[])),
        ("b1", record(&[], &[], &[])),
    ]);

    let resolved =
        resolve_dependencies(&db, "root", DependencyTier::Optional).expect("must resolve");

    assert_eq!(
        resolved.discovery_order,
        vec!["root", "a", "b", "c", "a1", "a2", "b1"]
    );
}

#[test]
fn tier_level_controls_which_edges_are_followed() {
    let db = database(vec![
        ("root", record(&["req"], &["rec"], &["opt"])),
        ("req", record(&[], &[], &[])),
        ("rec", record(&[], &[], &[])),
        ("opt", record(&[], &[], &[])),
    ]);

    let required = resolve_dependencies(&db, "root", DependencyTier::Required).expect("required");
    let recommended =
        resolve_dependencies(&db, "root", DependencyTier::Recommended).expect("recommended");
    let optional = resolve_dependencies(&db, "root", DependencyTier::Optional).expect("optional");

    assert_eq!(required.discovery_order, vec!["root", "req"]);
    assert_eq!(recommended.discovery_order, vec!["root", "req", "rec"]);
    assert_eq!(optional.discovery_order, vec!["root", "req", "rec", "opt"]);
}

#[test]
fn optional_level_follows_recommended_edges_of_dependencies() {
    let db = database(vec![
        ("root", record(&[], &[], &["opt"])),
        ("opt", record(&[], &["peer"], &[])),
        ("peer", record(&[], &[], &[])),
    ]);

    let resolved =
        resolve_dependencies(&db, "root", DependencyTier::Optional).expect("must resolve");

    assert_eq!(resolved.discovery_order, vec!["root", "opt", "peer"]);
}

#[test]
fn dangling_dependency_is_listed_but_not_expanded() {
    let db = database(vec![
        ("root", record(&["ghost", "real"], &[], &[])),
        ("real", record(&[], &[], &[])),
    ]);

    let resolved =
        resolve_dependencies(&db, "root", DependencyTier::Required).expect("must resolve");

    assert_eq!(resolved.discovery_order, vec!["root", "ghost", "real"]);
    assert_eq!(
        resolved.dangling.iter().cloned().collect::<Vec<_>>(),
        vec!["ghost"]
    );
}

#[test]
fn unknown_root_fails_with_unknown_package() {
    let db = database(vec![("A", record(&[], &[], &[]))]);

    let err = resolve_dependencies(&db, "Z", DependencyTier::Optional)
        .expect_err("unknown root must fail");

    assert!(matches!(
        err.downcast_ref::<DepsError>(),
        Some(DepsError::UnknownPackage(name)) if name == "Z"
    ));
}

#[test]
fn resolution_is_repeatable() {
    let db = database(vec![
        ("A", record(&["B", "C"], &["D"], &[])),
        ("B", record(&["C"], &[], &[])),
        ("C", record(&["A"], &[], &[])),
        ("D", record(&[], &[], &[])),
    ]);

    let first = resolve_dependencies(&db, "A", DependencyTier::Recommended).expect("first");
    let install_order = first.install_order();
    let second = resolve_dependencies(&db, "A", DependencyTier::Recommended).expect("second");

    assert_eq!(first, second);
    assert_eq!(install_order.last().map(String::as_str), Some("A"));
    assert_eq!(
        second.discovery_order.iter().filter(|name| *name == "A").count(),
        1
    );
}

fn arbitrary_database() -> impl Strategy<Value = PackageDatabase> {
    // Edges may point at names 0..12 while only 0..8 exist, so dangling
    // references and cycles are both common.
    let edges = prop::collection::vec(prop::collection::vec(0usize..12, 0..4), 3);
    prop::collection::vec(edges, 8).prop_map(|packages| {
        packages
            .into_iter()
            .enumerate()
            .map(|(index, tiers)| {
                let names = |list: &Vec<usize>| -> Vec<String> {
                    list.iter().map(|dep| format!("p{dep}")).collect()
                };
                (
                    format!("p{index}"),
                    PackageRecord {
                        dependencies: PackageDependencies {
                            required: names(&tiers[0]),
                            recommended: names(&tiers[1]),
                            optional: names(&tiers[2]),
                        },
                        ..PackageRecord::default()
                    },
                )
            })
            .collect()
    })
}

fn arbitrary_tier() -> impl Strategy<Value = DependencyTier> {
    prop_oneof![
        Just(DependencyTier::Required),
        Just(DependencyTier::Recommended),
        Just(DependencyTier::Optional),
    ]
}

proptest! {
    #[test]
    fn resolved_list_has_no_duplicates(db in arbitrary_database(), root in 0usize..8, tier in arbitrary_tier()) {
        let root = format!("p{root}");
        let resolved = resolve_dependencies(&db, &root, tier).expect("root exists");

        let unique: HashSet<&String> = resolved.discovery_order.iter().collect();
        prop_assert_eq!(unique.len(), resolved.discovery_order.len());
        prop_assert_eq!(resolved.discovery_order.first(), Some(&root));
    }

    #[test]
    fn dangling_names_are_exactly_the_missing_entries(db in arbitrary_database(), root in 0usize..8, tier in arbitrary_tier()) {
        let root = format!("p{root}");
        let resolved = resolve_dependencies(&db, &root, tier).expect("root exists");

        for name in &resolved.discovery_order {
            prop_assert_eq!(resolved.dangling.contains(name), db.get(name).is_none());
        }
    }

    #[test]
    fn higher_tier_never_drops_packages(db in arbitrary_database(), root in 0usize..8) {
        let root = format!("p{root}");
        let required = resolve_dependencies(&db, &root, DependencyTier::Required).expect("required");
        let optional = resolve_dependencies(&db, &root, DependencyTier::Optional).expect("optional");

        for name in &required.discovery_order {
            prop_assert!(optional.discovery_order.contains(name));
        }
    }
}
