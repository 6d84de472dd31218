//! Property-based tests for logger_hierarchy using proptest

use logger_hierarchy::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

fn canonical_level() -> impl Strategy<Value = Level> {
    prop::sample::select(Level::LEVELS.to_vec())
}

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

fn dotted_name() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 1..5)
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Ordering follows the numeric values
    #[test]
    fn test_level_ordering(level1 in canonical_level(), level2 in canonical_level()) {
        prop_assert_eq!(level1 <= level2, level1.value() <= level2.value());
        prop_assert_eq!(level1 < level2, level1.value() < level2.value());
        prop_assert_eq!(level1 == level2, level1.value() == level2.value());
    }

    /// A custom level equals the canonical level with the same value
    #[test]
    fn test_custom_level_matches_canonical(level in canonical_level()) {
        let custom = Level::new("CUSTOM", level.value());
        prop_assert_eq!(custom, level);
        prop_assert_eq!(custom.cmp(&level), std::cmp::Ordering::Equal);
    }

    /// Canonical names parse back to the same level
    #[test]
    fn test_level_name_roundtrip(level in canonical_level(), lower in any::<bool>()) {
        let name = if lower { level.name().to_lowercase() } else { level.name().to_string() };
        let parsed: Level = name.parse().unwrap();
        prop_assert_eq!(parsed, level);
    }
}

// ============================================================================
// Registry Tests
// ============================================================================

proptest! {
    /// Repeated lookups return the same instance
    #[test]
    fn test_lookup_identity(segments in dotted_name()) {
        let registry = LoggerRegistry::new();
        let name = segments.join(".");
        let first = registry.get(&name).unwrap();
        let second = registry.get(&name).unwrap();
        prop_assert!(Arc::ptr_eq(&first, &second));
        prop_assert_eq!(first.full_name(), name.as_str());
    }

    /// Parent of `p.c` is `p`, and `c` is indexed under `p`
    #[test]
    fn test_parent_child_link(segments in dotted_name(), child in segment()) {
        let registry = LoggerRegistry::new();
        let parent_name = segments.join(".");
        let child_name = format!("{}.{}", parent_name, child);

        let node = registry.get(&child_name).unwrap();
        let parent = registry.get(&parent_name).unwrap();

        prop_assert!(Arc::ptr_eq(node.parent().unwrap(), &parent));
        let children = parent.children();
        prop_assert!(Arc::ptr_eq(children.get(&child).unwrap(), &node));
        prop_assert_eq!(node.name(), child.as_str());
    }

    /// Different names never alias
    #[test]
    fn test_distinct_names_distinct_nodes(a in dotted_name(), b in dotted_name()) {
        prop_assume!(a != b);
        let registry = LoggerRegistry::new();
        let first = registry.get(&a.join(".")).unwrap();
        let second = registry.get(&b.join(".")).unwrap();
        prop_assert!(!Arc::ptr_eq(&first, &second));
    }

    /// Names with an empty segment are rejected without creating anything
    #[test]
    fn test_empty_segment_rejected(segments in dotted_name(), position in 0usize..5) {
        let mut segments = segments;
        let position = position.min(segments.len());
        segments.insert(position, String::new());
        let name = segments.join(".");

        let registry = LoggerRegistry::new();
        prop_assert!(matches!(registry.get(&name), Err(LoggerError::InvalidName { .. })), "expected InvalidName error");
        prop_assert_eq!(registry.len(), 1);
    }
}

// ============================================================================
// Level Resolution Tests
// ============================================================================

proptest! {
    /// In flat mode every node reports the root's level
    #[test]
    fn test_flat_mode_tracks_root(segments in dotted_name(), root_level in canonical_level()) {
        let registry = LoggerRegistry::new();
        registry.root().set_level(root_level).unwrap();
        let node = registry.get(&segments.join(".")).unwrap();

        prop_assert_eq!(node.level(), root_level);
        prop_assert!(node.set_level(Level::FINE).is_err());
    }

    /// In hierarchical mode a node resolves to the nearest assigned level
    #[test]
    fn test_hierarchical_nearest_level(
        segments in dotted_name(),
        assigned in prop::collection::vec(prop::option::of(canonical_level()), 5),
    ) {
        let registry = LoggerRegistry::builder().hierarchical(true).build();
        let mut expected = Level::INFO;
        for depth in 1..=segments.len() {
            let node = registry.get(&segments[..depth].join(".")).unwrap();
            if let Some(level) = assigned[depth - 1] {
                node.set_level(level).unwrap();
                expected = level;
            }
        }

        let leaf = registry.get(&segments.join(".")).unwrap();
        prop_assert_eq!(leaf.level(), expected);
    }

    /// is_loggable agrees with the effective level
    #[test]
    fn test_is_loggable(root_level in canonical_level(), call_level in canonical_level()) {
        let registry = LoggerRegistry::builder().root_level(root_level).build();
        let node = registry.get("probe").unwrap();
        prop_assert_eq!(node.is_loggable(call_level), call_level >= root_level);
    }
}

// ============================================================================
// Record Tests
// ============================================================================

proptest! {
    /// Records arrive in construction order with increasing sequence numbers
    #[test]
    fn test_sequence_monotonic(names in prop::collection::vec(dotted_name(), 1..10)) {
        let registry = LoggerRegistry::builder().root_level(Level::ALL).build();
        let sub = registry.root().subscribe();

        for segments in &names {
            registry.get(&segments.join(".")).unwrap().info("tick");
        }

        let records = sub.drain();
        prop_assert_eq!(records.len(), names.len());
        for pair in records.windows(2) {
            prop_assert!(pair[0].sequence() < pair[1].sequence());
        }
    }
}
