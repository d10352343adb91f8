//! Property tests for the `data-uri` reference scanner.

use proptest::prelude::*;

use lessdeps::domain::services::{scan_references, ReferencePath};

fn literal_path() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-]{1,12}(/[A-Za-z0-9_-]{1,12}){0,3}\\.(png|svg|gif)")
        .unwrap()
}

fn filler() -> impl Strategy<Value = String> {
    // rule bodies without quotes, comments or parentheses
    proptest::string::string_regex("[A-Za-z0-9 .#:;{}\n-]{0,40}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: scanning never panics on arbitrary input.
    #[test]
    fn property_scan_never_panics(source in "(?s).{0,256}") {
        let _ = scan_references(&source);
    }

    /// PROPERTY: scanning never panics on near-miss call syntax.
    #[test]
    fn property_scan_never_panics_on_call_fragments(
        parts in proptest::collection::vec(
            prop_oneof![
                Just("data-uri(".to_string()),
                Just(")".to_string()),
                Just("'".to_string()),
                Just("\"".to_string()),
                Just(",".to_string()),
                Just("/*".to_string()),
                Just("//".to_string()),
                Just("@{".to_string()),
                Just("\n".to_string()),
                "[a-z@ ]{0,4}",
            ],
            0..24,
        )
    ) {
        let _ = scan_references(&parts.concat());
    }

    /// PROPERTY: a quoted literal path is found, unchanged, on its line.
    #[test]
    fn property_literal_paths_are_found(
        before in filler(),
        path in literal_path(),
        after in filler(),
        double_quoted in any::<bool>(),
    ) {
        let quote = if double_quoted { '"' } else { '\'' };
        let source = format!("{}\n.x {{ y: data-uri({q}{}{q}); }}\n{}", before, path, after, q = quote);

        let references = scan_references(&source).unwrap();

        prop_assert_eq!(references.len(), 1);
        prop_assert_eq!(&references[0].path, &ReferencePath::Literal(path));
        prop_assert_eq!(references[0].line, before.matches('\n').count() + 2);
        prop_assert_eq!(references[0].mime_type.as_deref(), None);
    }

    /// PROPERTY: a variable argument is never a literal.
    #[test]
    fn property_variables_are_dynamic(name in "[a-z][a-z0-9-]{0,10}") {
        let source = format!(".x {{ y: data-uri(@{}); }}", name);
        let references = scan_references(&source).unwrap();

        prop_assert_eq!(references.len(), 1);
        prop_assert!(matches!(references[0].path, ReferencePath::Dynamic(_)));
    }
}
