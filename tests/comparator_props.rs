//! Property tests for the document comparator

mod fixtures;

use std::cmp::Ordering;

use docsort::{Comparator, ComparatorOptions, Document, Sorter};
use fixtures::{doc, sorter};
use proptest::prelude::*;
use serde_json::{json, Map, Value as Json};

fn arb_scalar() -> impl Strategy<Value = Json> {
    prop_oneof![
        Just(Json::Null),
        (-5i64..5).prop_map(|n| json!(n)),
        "[a-c]{0,2}".prop_map(Json::String),
        any::<bool>().prop_map(Json::Bool),
    ]
}

fn arb_field() -> impl Strategy<Value = Json> {
    prop_oneof![
        3 => arb_scalar(),
        1 => prop::collection::vec(arb_scalar(), 0..3).prop_map(Json::Array),
        1 => prop::collection::vec(arb_scalar(), 0..3)
            .prop_map(|xs| Json::Array(xs.into_iter().map(|x| json!({"x": x})).collect())),
    ]
}

fn arb_doc() -> impl Strategy<Value = Document> {
    (
        prop::option::of(arb_field()),
        prop::option::of(arb_field()),
    )
        .prop_map(|(a, b)| {
            let mut map = Map::new();
            if let Some(a) = a {
                map.insert("a".into(), a);
            }
            if let Some(b) = b {
                map.insert("b".into(), b);
            }
            doc(Json::Object(map))
        })
}

fn verdict(s: &Sorter, a: &Document, b: &Document) -> Result<Ordering, String> {
    s.compare_documents(a, b).map_err(|e| e.to_string())
}

proptest! {
    #[test]
    fn prop_spec_shapes_agree(a in arb_doc(), b in arb_doc()) {
        let mapping = sorter(json!({"a": 1, "b": -1}));
        let list = sorter(json!(["a", ["b", "desc"]]));
        let pairs = sorter(json!([["a", "asc"], ["b", "desc"]]));
        let expected = verdict(&mapping, &a, &b);
        prop_assert_eq!(verdict(&list, &a, &b), expected.clone());
        prop_assert_eq!(verdict(&pairs, &a, &b), expected);
    }

    #[test]
    fn prop_comparison_is_antisymmetric(a in arb_doc(), b in arb_doc()) {
        let s = sorter(json!({"a": 1, "b.x": -1}));
        if let (Ok(ab), Ok(ba)) = (s.compare_documents(&a, &b), s.compare_documents(&b, &a)) {
            prop_assert_eq!(ab, ba.reverse());
        }
    }

    #[test]
    fn prop_document_equals_itself(a in arb_doc()) {
        let s = sorter(json!({"b": -1, "a": 1}));
        if let Ok(ord) = s.compare_documents(&a, &a) {
            prop_assert_eq!(ord, Ordering::Equal);
        }
    }

    #[test]
    fn prop_sorted_output_is_non_decreasing(mut items in prop::collection::vec(arb_doc(), 0..12)) {
        let s = sorter(json!({"a": -1, "b": 1}));
        let before = items.clone();
        match s.sort_documents(&mut items) {
            Ok(()) => {
                let cmp = s.comparator(ComparatorOptions::default());
                for pair in items.windows(2) {
                    prop_assert_ne!(cmp.compare(&pair[0], &pair[1]).unwrap(), Ordering::Greater);
                }
            }
            Err(_) => prop_assert_eq!(items, before),
        }
    }
}
