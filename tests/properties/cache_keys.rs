//! Property tests for cache key derivation.

use std::path::Path;

use proptest::prelude::*;

use lessdeps::domain::value_objects::{normalize_path, CacheKey};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-][A-Za-z0-9._-]{0,11}")
        .unwrap()
        .prop_filter("not a dot segment", |s| s != "." && s != "..")
}

fn relative_path_string() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..=5).prop_map(|segments| segments.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: normalizing twice changes nothing.
    #[test]
    fn property_normalize_is_idempotent(rel in relative_path_string()) {
        let once = normalize_path(Path::new(&format!("/base/./{}/../x", rel)));
        let twice = normalize_path(Path::new(&once));
        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: `.` segments and `dir/..` detours never change the key.
    #[test]
    fn property_detours_map_to_the_same_key(
        rel in relative_path_string(),
        detour in segment(),
    ) {
        let plain = CacheKey::for_root_in(Path::new(&format!("/project/{}", rel)), Path::new("/"));
        let dotted = CacheKey::for_root_in(
            Path::new(&format!("/project/./{}/../{}", detour, rel)),
            Path::new("/"),
        );
        prop_assert_eq!(plain.as_str(), dotted.as_str());
        prop_assert_eq!(plain.normalized_path(), dotted.normalized_path());
    }

    /// PROPERTY: a relative root and its absolute form share a key.
    #[test]
    fn property_relative_and_absolute_roots_share_a_key(rel in relative_path_string()) {
        let relative = CacheKey::for_root_in(Path::new(&rel), Path::new("/project"));
        let absolute = CacheKey::for_root_in(
            Path::new(&format!("/project/{}", rel)),
            Path::new("/elsewhere"),
        );
        prop_assert_eq!(relative, absolute);
    }

    /// PROPERTY: keys are always 64 lowercase hex characters.
    #[test]
    fn property_keys_are_file_name_safe(raw in "(?s).{0,128}") {
        let key = CacheKey::for_root_in(Path::new(&raw), Path::new("/project"));
        prop_assert_eq!(key.as_str().len(), 64);
        prop_assert!(key.as_str().bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    /// PROPERTY: `normalize_path` never panics on arbitrary input.
    #[test]
    fn property_normalize_never_panics(raw in "(?s).{0,128}") {
        let _ = normalize_path(Path::new(&raw));
    }
}
