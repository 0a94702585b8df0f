//! Compiled sort specification and the comparators built from it.
//!
//! A [`Sorter`] is immutable once built and can be shared freely across
//! threads. Each document is placed by its *minimum key*: the smallest of its
//! candidate key vectors under the full, signed key order.
//!
//! Known divergence: keys are computed without regard to the query selector.
//! When a selector also filters array elements the reference database only
//! considers matching elements for the sort key; this sorter considers all of
//! them, so such queries may order differently.

use std::cmp::Ordering;

use docsort_core::config::SortConfig;
use docsort_core::lookup::{expand_arrays, BranchLookup, FieldPath};
use docsort_core::order::ValueOrder;
use docsort_core::value::{Document, Value};

use crate::compose::{permute, sort_indices, Comparator, Composed};
use crate::distance::{DistanceComparator, DistanceMap};
use crate::error::{Result, SortError};
use crate::keys::{align, CandidateKeys, KeyVector};
use crate::spec::{SortPart, SortSpec};

#[derive(Debug)]
struct CompiledPart {
    part: SortPart,
    lookup: FieldPath,
}

/// Compares position `index` of two key vectors, reversed for descending parts.
#[derive(Debug, Clone, Copy)]
struct FieldComparator {
    index: usize,
    ascending: bool,
    order: ValueOrder,
}

impl Comparator<[Value]> for FieldComparator {
    fn compare(&self, a: &[Value], b: &[Value]) -> Result<Ordering> {
        let (Some(x), Some(y)) = (a.get(self.index), b.get(self.index)) else {
            return Err(SortError::KeyLengthMismatch {
                expected: self.index + 1,
                actual: a.len().min(b.len()),
            });
        };
        let ord = self.order.compare(x, y)?;
        Ok(if self.ascending { ord } else { ord.reverse() })
    }
}

#[derive(Debug)]
pub struct Sorter {
    parts: Vec<CompiledPart>,
    key_order: Composed<'static, [Value]>,
    config: SortConfig,
}

impl Sorter {
    pub fn new(spec: &SortSpec) -> Result<Self> {
        Self::with_config(spec, SortConfig::default())
    }

    pub fn with_config(spec: &SortSpec, config: SortConfig) -> Result<Self> {
        config.validate()?;
        let parts = spec.normalize()?;
        let order = config.value_order();

        let key_order = parts
            .iter()
            .enumerate()
            .fold(Composed::new(), |chain, (index, part)| {
                chain.with(FieldComparator {
                    index,
                    ascending: part.ascending,
                    order,
                })
            });

        let parts: Vec<CompiledPart> = parts
            .into_iter()
            .map(|part| CompiledPart {
                lookup: FieldPath::parse(&part.path),
                part,
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            parts = parts.len(),
            paths = ?parts.iter().map(|p| p.part.path.as_str()).collect::<Vec<_>>(),
            "compiled sort specification"
        );

        Ok(Self {
            parts,
            key_order,
            config,
        })
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn parts(&self) -> impl ExactSizeIterator<Item = &SortPart> + '_ {
        self.parts.iter().map(|p| &p.part)
    }

    /// Sorted paths in spec order, for callers that analyse which fields a
    /// write could move.
    pub fn paths(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.part.path.as_str()).collect()
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Candidate key vectors of `doc`, one per coherent array position.
    pub fn candidate_keys(&self, doc: &Document) -> Result<CandidateKeys> {
        if self.parts.is_empty() {
            return Err(SortError::EmptySpec);
        }

        let limit = self.config.max_branches_per_field;
        let mut fields = Vec::with_capacity(self.parts.len());
        for compiled in &self.parts {
            // Sorting never uses an array itself, only its elements.
            let branches = expand_arrays(compiled.lookup.lookup(doc), true);
            if branches.len() > limit {
                return Err(SortError::TooManyBranches {
                    path: compiled.part.path.clone(),
                    count: branches.len(),
                    limit,
                });
            }
            fields.push((compiled.part.path.as_str(), branches));
        }

        let candidates = align(fields)?;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            parts = self.parts.len(),
            candidates = candidates.len(),
            "generated sort keys"
        );
        Ok(candidates)
    }

    pub fn compare_keys(&self, a: &[Value], b: &[Value]) -> Result<Ordering> {
        let expected = self.parts.len();
        for key in [a, b] {
            if key.len() != expected {
                return Err(SortError::KeyLengthMismatch {
                    expected,
                    actual: key.len(),
                });
            }
        }
        self.key_order.compare(a, b)
    }

    /// Smallest candidate key of `doc` under the signed key order.
    ///
    /// Whole vectors are compared; fields are never minimised independently.
    pub fn min_key(&self, doc: &Document) -> Result<KeyVector> {
        let mut min: Option<KeyVector> = None;
        for key in self.candidate_keys(doc)? {
            let key = key?;
            min = match min {
                Some(current) if self.compare_keys(&key, &current)? != Ordering::Less => {
                    Some(current)
                }
                _ => Some(key),
            };
        }
        min.ok_or(SortError::NoKeysFound)
    }

    pub fn compare_documents(&self, a: &Document, b: &Document) -> Result<Ordering> {
        // Without sort fields every document ties (distance-only sorts).
        if self.parts.is_empty() {
            return Ok(Ordering::Equal);
        }
        let key_a = self.min_key(a)?;
        let key_b = self.min_key(b)?;
        self.compare_keys(&key_a, &key_b)
    }

    /// The document comparator, optionally followed by a distance tie-break.
    pub fn comparator<'a>(&'a self, options: ComparatorOptions<'a>) -> DocumentComparator<'a> {
        let mut chain = Composed::new().with(BaseComparator { sorter: self });
        if let Some(distances) = options.distances {
            chain.push(DistanceComparator::new(distances));
        }
        DocumentComparator {
            sorter: self,
            distances: options.distances.map(DistanceComparator::new),
            chain,
        }
    }

    /// Stable in-place sort of a result set with the base comparator.
    pub fn sort_documents(&self, docs: &mut [Document]) -> Result<()> {
        self.comparator(ComparatorOptions::default()).sort(docs)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ComparatorOptions<'a> {
    /// Precomputed distances keyed by document id. When set, documents that
    /// tie on the sort fields are ordered closest first.
    pub distances: Option<&'a DistanceMap>,
}

impl<'a> ComparatorOptions<'a> {
    pub fn with_distances(distances: &'a DistanceMap) -> Self {
        Self {
            distances: Some(distances),
        }
    }
}

struct BaseComparator<'a> {
    sorter: &'a Sorter,
}

impl Comparator<Document> for BaseComparator<'_> {
    fn compare(&self, a: &Document, b: &Document) -> Result<Ordering> {
        self.sorter.compare_documents(a, b)
    }
}

#[derive(Debug)]
pub struct DocumentComparator<'a> {
    sorter: &'a Sorter,
    distances: Option<DistanceComparator<'a>>,
    chain: Composed<'a, Document>,
}

impl DocumentComparator<'_> {
    /// Stable in-place sort; on error `docs` is left as it was.
    ///
    /// Each document's minimum key is extracted once up front; the distance
    /// tie-break is only consulted for documents whose keys tie.
    pub fn sort(&self, docs: &mut [Document]) -> Result<()> {
        if docs.len() < 2 {
            return Ok(());
        }
        let keys: Vec<KeyVector> = if self.sorter.is_empty() {
            Vec::new()
        } else {
            docs.iter()
                .map(|doc| self.sorter.min_key(doc))
                .collect::<Result<_>>()?
        };

        let order = sort_indices(docs.len(), |i, j| {
            if !keys.is_empty() {
                let ord = self.sorter.compare_keys(&keys[i], &keys[j])?;
                if ord != Ordering::Equal {
                    return Ok(ord);
                }
            }
            match &self.distances {
                Some(distance) => distance.compare(&docs[i], &docs[j]),
                None => Ok(Ordering::Equal),
            }
        })?;
        permute(docs, &order);
        Ok(())
    }
}

impl Comparator<Document> for DocumentComparator<'_> {
    fn compare(&self, a: &Document, b: &Document) -> Result<Ordering> {
        self.chain.compare(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(json: serde_json::Value) -> Document {
        Document::from_json(json).unwrap()
    }

    fn sorter(spec: serde_json::Value) -> Sorter {
        Sorter::new(&SortSpec::try_from(&spec).unwrap()).unwrap()
    }

    #[test]
    fn test_min_key_uses_whole_vectors() {
        let s = sorter(json!({"a.x": 1, "a.y": 1}));
        let d = doc(json!({"a": [{"x": 0, "y": 5}, {"x": 1, "y": 3}]}));
        assert_eq!(s.min_key(&d).unwrap(), vec![Value::from(0i64), Value::from(5i64)]);
    }

    #[test]
    fn test_min_key_respects_direction() {
        let s = sorter(json!({"a": -1}));
        let d = doc(json!({"a": [1, 7, 3]}));
        assert_eq!(s.min_key(&d).unwrap(), vec![Value::from(7i64)]);
    }

    #[test]
    fn test_compare_keys_checks_length() {
        let s = sorter(json!({"a": 1, "b": 1}));
        let err = s
            .compare_keys(&[Value::Null], &[Value::Null, Value::Null])
            .unwrap_err();
        assert!(matches!(
            err,
            SortError::KeyLengthMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_empty_spec_has_no_keys_but_compares_equal() {
        let s = sorter(json!([]));
        let (a, b) = (doc(json!({"a": 1})), doc(json!({"a": 2})));
        assert!(matches!(s.candidate_keys(&a), Err(SortError::EmptySpec)));
        assert_eq!(s.compare_documents(&a, &b).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_branch_limit() {
        let config = SortConfig {
            max_branches_per_field: 2,
            ..SortConfig::default()
        };
        let s = Sorter::with_config(&SortSpec::asc("a"), config).unwrap();
        let err = s.candidate_keys(&doc(json!({"a": [1, 2, 3]}))).unwrap_err();
        assert!(matches!(err, SortError::TooManyBranches { count: 3, limit: 2, .. }));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SortConfig {
            max_branches_per_field: 0,
            ..SortConfig::default()
        };
        assert!(matches!(
            Sorter::with_config(&SortSpec::asc("a"), config),
            Err(SortError::Core(docsort_core::Error::Config(_)))
        ));
    }

    #[test]
    fn test_sort_extracts_each_key_once_per_document() {
        let s = sorter(json!({"a.x": 1, "a.y": -1}));
        let mut docs: Vec<Document> = (0..8)
            .map(|i| doc(json!({"_id": i, "a": [{"x": i % 3, "y": i}, {"x": 5, "y": 0}]})))
            .collect();
        let keys: Vec<KeyVector> = docs.iter().map(|d| s.min_key(d).unwrap()).collect();

        s.sort_documents(&mut docs).unwrap();

        let sorted: Vec<KeyVector> = docs.iter().map(|d| s.min_key(d).unwrap()).collect();
        let mut expected = keys;
        expected.sort_by(|a, b| s.compare_keys(a, b).unwrap());
        assert_eq!(sorted, expected);
        for pair in docs.windows(2) {
            assert_ne!(s.compare_documents(&pair[0], &pair[1]).unwrap(), Ordering::Greater);
        }
    }

    #[test]
    fn test_sort_single_document_skips_key_extraction() {
        let s = sorter(json!({"a": 1, "b": 1}));
        let mut one = vec![doc(json!({"a": [1, 2], "b": [3, 4, 5]}))];
        assert!(s.sort_documents(&mut one).is_ok());

        let mut two = vec![one[0].clone(), doc(json!({"a": 1}))];
        assert!(matches!(
            s.sort_documents(&mut two),
            Err(SortError::ParallelArrayMismatch { .. })
        ));
    }

    #[test]
    fn test_sorter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Sorter>();
        assert_send_sync::<DocumentComparator<'static>>();
    }
}
