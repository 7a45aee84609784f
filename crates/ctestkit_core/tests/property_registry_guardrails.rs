use std::collections::HashMap;

use ctestkit_core::properties::{self, PropertyId, PropertyKind};

#[test]
fn property_spellings_unique_and_resolvable() {
    let mut seen: HashMap<&'static str, PropertyId> = HashMap::new();

    for info in properties::PROPERTIES {
        assert_eq!(
            properties::from_str(info.canonical),
            Some(info.id),
            "property canonical spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(
            properties::from_str(&info.canonical.to_ascii_lowercase()),
            Some(info.id),
            "lower-case spelling not resolvable: {}",
            info.canonical
        );
        assert_eq!(properties::as_str(info.id), info.canonical);

        if let Some(prev) = seen.insert(info.canonical, info.id) {
            panic!(
                "duplicate property spelling {:?}: {:?} and {:?}",
                info.canonical, prev, info.id
            );
        }
    }
}

#[test]
fn property_spellings_are_upper_snake_case() {
    for info in properties::PROPERTIES {
        assert!(
            info.canonical
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'),
            "non-canonical spelling: {}",
            info.canonical
        );
    }
}

#[test]
fn list_properties_named_by_ctest_are_lists() {
    for name in [
        "ENVIRONMENT",
        "LABELS",
        "DEPENDS",
        "FIXTURES_REQUIRED",
        "FIXTURES_SETUP",
        "FIXTURES_CLEANUP",
        "REQUIRED_FILES",
        "RESOURCE_LOCK",
        "ATTACHED_FILES",
    ] {
        let id = properties::from_str(name).unwrap();
        assert_eq!(properties::info_for(id).kind, PropertyKind::List, "{name}");
    }
}
