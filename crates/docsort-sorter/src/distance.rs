//! Distance tie-break for proximity queries.
//!
//! Distances are computed elsewhere; this module only orders documents by a
//! precomputed `DocId -> distance` map, closest first.

use std::cmp::Ordering;
use std::collections::HashMap;

use docsort_core::id::DocId;
use docsort_core::value::Document;

use crate::compose::Comparator;
use crate::error::{Result, SortError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceMap {
    distances: HashMap<DocId, f64>,
}

impl DistanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<DocId>, distance: f64) -> Option<f64> {
        self.distances.insert(id.into(), distance)
    }

    pub fn get(&self, id: &DocId) -> Option<f64> {
        self.distances.get(id).copied()
    }

    pub fn contains(&self, id: &DocId) -> bool {
        self.distances.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Distance of `doc`, looked up by its `_id`.
    pub fn distance_of(&self, doc: &Document) -> Result<f64> {
        let id = DocId::from_document(doc)?;
        self.get(&id).ok_or(SortError::MissingDistance(id))
    }
}

impl FromIterator<(DocId, f64)> for DistanceMap {
    fn from_iter<I: IntoIterator<Item = (DocId, f64)>>(iter: I) -> Self {
        Self {
            distances: iter.into_iter().collect(),
        }
    }
}

impl Extend<(DocId, f64)> for DistanceMap {
    fn extend<I: IntoIterator<Item = (DocId, f64)>>(&mut self, iter: I) {
        self.distances.extend(iter);
    }
}

/// Orders documents by ascending distance.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DistanceComparator<'a> {
    distances: &'a DistanceMap,
}

impl<'a> DistanceComparator<'a> {
    pub(crate) fn new(distances: &'a DistanceMap) -> Self {
        Self { distances }
    }
}

impl Comparator<Document> for DistanceComparator<'_> {
    fn compare(&self, a: &Document, b: &Document) -> Result<Ordering> {
        let da = self.distances.distance_of(a)?;
        let db = self.distances.distance_of(b)?;
        Ok(da.partial_cmp(&db).unwrap_or(Ordering::Equal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(json: serde_json::Value) -> Document {
        Document::from_json(json).unwrap()
    }

    #[test]
    fn test_closer_first() {
        let mut map = DistanceMap::new();
        map.insert("near", 1.5);
        map.insert("far", 10.0);
        let cmp = DistanceComparator::new(&map);
        let (near, far) = (doc(json!({"_id": "near"})), doc(json!({"_id": "far"})));
        assert_eq!(cmp.compare(&near, &far).unwrap(), Ordering::Less);
        assert_eq!(cmp.compare(&far, &near).unwrap(), Ordering::Greater);
        assert_eq!(cmp.compare(&far, &far).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_missing_distance_names_the_document() {
        let map: DistanceMap = [(DocId::from("a"), 1.0)].into_iter().collect();
        let err = map.distance_of(&doc(json!({"_id": "b"}))).unwrap_err();
        assert!(matches!(err, SortError::MissingDistance(ref id) if id.as_str() == "b"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_object_ids_are_keyed_by_hex() {
        let oid = "507f1f77bcf86cd799439011".parse::<docsort_core::id::ObjectId>().unwrap();
        let mut map = DistanceMap::new();
        map.insert(oid, 3.0);
        let d = doc(json!({"_id": {"$oid": "507f1f77bcf86cd799439011"}}));
        assert_eq!(map.distance_of(&d).unwrap(), 3.0);
    }
}
