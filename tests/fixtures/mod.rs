//! Shared helpers for building documents and sorters from JSON literals.

#![allow(dead_code)]

use docsort::{Document, SortSpec, Sorter};

pub fn doc(json: serde_json::Value) -> Document {
    Document::from_json(json).expect("fixture must be a JSON object")
}

pub fn docs(items: Vec<serde_json::Value>) -> Vec<Document> {
    items.into_iter().map(doc).collect()
}

pub fn spec(json: serde_json::Value) -> SortSpec {
    SortSpec::try_from(&json).expect("fixture spec must parse")
}

pub fn sorter(json: serde_json::Value) -> Sorter {
    Sorter::new(&spec(json)).expect("fixture spec must compile")
}

/// `_id` values of `docs`, in order, as strings.
pub fn ids(docs: &[Document]) -> Vec<String> {
    docs.iter()
        .map(|d| match d.id() {
            Some(docsort::Value::String(s)) => s.clone(),
            Some(other) => format!("{:?}", other),
            None => "<none>".to_string(),
        })
        .collect()
}
