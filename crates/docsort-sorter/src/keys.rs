//! Candidate sort-key extraction for multikey documents.
//!
//! Each sort field resolves to a set of branches. A branch that passed through
//! arrays is keyed by its array-index path; a key vector may only combine
//! values that share a path, so `{a: [{x: 0, y: 5}, {x: 1, y: 3}]}` under
//! `a.x, a.y` yields `[0, 5]` and `[1, 3]`, never `[0, 3]`.
//!
//! Rules enforced here:
//! - a field either has one unindexed value or only indexed ones;
//! - every field with indexed values must hit exactly the same paths;
//! - a field without array involvement contributes its value to every key.

use std::collections::{HashMap, HashSet};

use docsort_core::lookup::Branch;
use docsort_core::value::Value;

use crate::error::{Result, SortError};

/// One candidate key: a value per sort part, in spec order.
pub type KeyVector = Vec<Value>;

/// Values one sort field contributes to a document's key vectors.
#[derive(Debug)]
struct FieldValues {
    path: String,
    sole: Option<Value>,
    by_path: HashMap<String, Value>,
}

impl FieldValues {
    fn value_at(&self, key: &str) -> Result<Value> {
        if let Some(v) = &self.sole {
            return Ok(v.clone());
        }
        self.by_path
            .get(key)
            .cloned()
            .ok_or_else(|| SortError::MissingPath {
                path: self.path.clone(),
                key: key.to_string(),
            })
    }
}

/// Path keys established by the first array-valued field, in discovery order.
#[derive(Debug, Default)]
struct KnownPaths {
    order: Vec<String>,
    set: HashSet<String>,
}

/// Align per-field branches into candidate key vectors.
///
/// `fields` holds, in spec order, each field's path and its branches with
/// arrays already expanded. An empty branch list stands for a single `null`.
pub fn align<'p, I>(fields: I) -> Result<CandidateKeys>
where
    I: IntoIterator<Item = (&'p str, Vec<Branch>)>,
{
    let mut known: Option<KnownPaths> = None;
    let mut values = Vec::new();

    for (path, mut branches) in fields {
        if branches.is_empty() {
            branches.push(Branch::sole(Value::Null));
        }
        let count = branches.len();
        let mut field = FieldValues {
            path: path.to_string(),
            sole: None,
            by_path: HashMap::with_capacity(count),
        };
        let mut discovered = Vec::new();

        for branch in branches {
            let Some(indices) = branch.array_indices else {
                // Only arrays produce several branches.
                if count > 1 {
                    return Err(rejected(SortError::InconsistentBranches {
                        path: field.path,
                        count,
                    }));
                }
                field.sole = Some(branch.value);
                continue;
            };

            let key = indices.path_key();
            if field.by_path.contains_key(&key) {
                return Err(rejected(SortError::DuplicatePath {
                    path: field.path,
                    key,
                }));
            }
            // Two array-valued fields must go through the very same positions.
            if let Some(known) = &known {
                if !known.set.contains(&key) {
                    return Err(rejected(SortError::ParallelArrayMismatch {
                        path: field.path,
                    }));
                }
            }
            discovered.push(key.clone());
            field.by_path.insert(key, branch.value);
        }

        if let Some(known) = &known {
            if field.sole.is_none() && known.order.len() != field.by_path.len() {
                return Err(rejected(SortError::ParallelArrayMismatch {
                    path: field.path,
                }));
            }
        } else if !discovered.is_empty() {
            known = Some(KnownPaths {
                set: discovered.iter().cloned().collect(),
                order: discovered,
            });
        }

        values.push(field);
    }

    let Some(known) = known else {
        // No arrays anywhere: exactly one key.
        let sole = values
            .iter()
            .map(|field| field.value_at(""))
            .collect::<Result<KeyVector>>()?;
        return Ok(CandidateKeys::single(sole));
    };

    Ok(CandidateKeys {
        pending: Pending::Aligned {
            fields: values,
            paths: known.order.into_iter(),
        },
    })
}

fn rejected(err: SortError) -> SortError {
    #[cfg(feature = "tracing")]
    tracing::warn!(error = %err, "document rejected by sort key extraction");
    err
}

#[derive(Debug)]
enum Pending {
    Single(Option<KeyVector>),
    Aligned {
        fields: Vec<FieldValues>,
        paths: std::vec::IntoIter<String>,
    },
}

/// Candidate key vectors of one document, produced on demand.
///
/// Derived afresh for every call that asks for them; nothing is cached.
#[derive(Debug)]
pub struct CandidateKeys {
    pending: Pending,
}

impl CandidateKeys {
    fn single(key: KeyVector) -> Self {
        Self {
            pending: Pending::Single(Some(key)),
        }
    }
}

impl Iterator for CandidateKeys {
    type Item = Result<KeyVector>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.pending {
            Pending::Single(key) => key.take().map(Ok),
            Pending::Aligned { fields, paths } => {
                let path = paths.next()?;
                Some(fields.iter().map(|field| field.value_at(&path)).collect())
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = match &self.pending {
            Pending::Single(key) => usize::from(key.is_some()),
            Pending::Aligned { paths, .. } => paths.len(),
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for CandidateKeys {}
