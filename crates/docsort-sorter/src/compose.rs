//! Comparator composition and a fallible stable sort.
//!
//! A [`Composed`] comparator runs its members in order and returns the first
//! non-`Equal` verdict; an error from any member aborts the comparison.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Result, SortError};

/// Fallible three-way comparison.
pub trait Comparator<T: ?Sized>: Send + Sync {
    fn compare(&self, a: &T, b: &T) -> Result<Ordering>;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Result<Ordering> + Send + Sync,
{
    fn compare(&self, a: &T, b: &T) -> Result<Ordering> {
        self(a, b)
    }
}

/// Ordered chain of comparators: first non-`Equal` result wins.
pub struct Composed<'a, T: ?Sized> {
    comparators: Vec<Box<dyn Comparator<T> + 'a>>,
}

impl<'a, T: ?Sized> Composed<'a, T> {
    pub fn new() -> Self {
        Self {
            comparators: Vec::new(),
        }
    }

    pub fn push(&mut self, comparator: impl Comparator<T> + 'a) {
        self.comparators.push(Box::new(comparator));
    }

    pub fn with(mut self, comparator: impl Comparator<T> + 'a) -> Self {
        self.push(comparator);
        self
    }

    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }
}

impl<T: ?Sized> Default for Composed<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: ?Sized> FromIterator<Box<dyn Comparator<T> + 'a>> for Composed<'a, T> {
    fn from_iter<I: IntoIterator<Item = Box<dyn Comparator<T> + 'a>>>(iter: I) -> Self {
        Self {
            comparators: iter.into_iter().collect(),
        }
    }
}

impl<T: ?Sized> Comparator<T> for Composed<'_, T> {
    fn compare(&self, a: &T, b: &T) -> Result<Ordering> {
        for comparator in &self.comparators {
            match comparator.compare(a, b)? {
                Ordering::Equal => continue,
                other => return Ok(other),
            }
        }
        Ok(Ordering::Equal)
    }
}

impl<T: ?Sized> fmt::Debug for Composed<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composed")
            .field("comparators", &self.comparators.len())
            .finish()
    }
}

/// Stable sort with a fallible comparator.
///
/// On error the slice is left untouched and the first error is returned.
pub fn try_sort_by<T, F>(items: &mut [T], mut compare: F) -> Result<()>
where
    T: Clone,
    F: FnMut(&T, &T) -> Result<Ordering>,
{
    let order = sort_indices(items.len(), |i, j| compare(&items[i], &items[j]))?;
    permute(items, &order);
    Ok(())
}

/// Stably sorted positions `0..len`; nothing is moved.
pub(crate) fn sort_indices<F>(len: usize, mut compare: F) -> Result<Vec<usize>>
where
    F: FnMut(usize, usize) -> Result<Ordering>,
{
    let mut order: Vec<usize> = (0..len).collect();
    let mut failed: Option<SortError> = None;
    order.sort_by(|&i, &j| {
        if failed.is_some() {
            return Ordering::Equal;
        }
        compare(i, j).unwrap_or_else(|err| {
            failed = Some(err);
            Ordering::Equal
        })
    });
    match failed {
        Some(err) => Err(err),
        None => Ok(order),
    }
}

/// Rearrange `items` so that slot `k` holds the old `items[order[k]]`.
pub(crate) fn permute<T: Clone>(items: &mut [T], order: &[usize]) {
    let sorted: Vec<T> = order.iter().map(|&i| items[i].clone()).collect();
    for (slot, item) in items.iter_mut().zip(sorted) {
        *slot = item;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fixed(verdict: i8) -> impl Comparator<()> {
        move |_: &(), _: &()| -> Result<Ordering> { Ok(verdict.cmp(&0)) }
    }

    #[test]
    fn test_empty_chain_is_equal() {
        let composed: Composed<'_, ()> = Composed::new();
        assert_eq!(composed.compare(&(), &()).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_first_non_equal_wins() {
        let composed = Composed::new().with(fixed(0)).with(fixed(-1)).with(fixed(1));
        assert_eq!(composed.compare(&(), &()).unwrap(), Ordering::Less);
        assert_eq!(composed.len(), 3);
    }

    #[test]
    fn test_error_short_circuits_only_when_reached() {
        let failing = |_: &(), _: &()| -> Result<Ordering> { Err(SortError::NoKeysFound) };
        let decided = Composed::new().with(fixed(1)).with(failing);
        assert_eq!(decided.compare(&(), &()).unwrap(), Ordering::Greater);

        let undecided = Composed::new().with(fixed(0)).with(failing);
        assert!(matches!(
            undecided.compare(&(), &()),
            Err(SortError::NoKeysFound)
        ));
    }

    #[test]
    fn test_try_sort_is_stable() {
        let mut items = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e')];
        try_sort_by(&mut items, |a, b| Ok(a.0.cmp(&b.0))).unwrap();
        assert_eq!(items, vec![(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_try_sort_leaves_input_on_error() {
        let mut items = vec![3, 1, 2];
        let result = try_sort_by(&mut items, |a, b| {
            if *a == 2 || *b == 2 {
                Err(SortError::NoKeysFound)
            } else {
                Ok(a.cmp(b))
            }
        });
        assert!(result.is_err());
        assert_eq!(items, vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_indices_reports_first_error() {
        let mut calls = 0;
        let result = sort_indices(6, |i, j| {
            calls += 1;
            if calls == 2 {
                Err(SortError::EmptySpec)
            } else if calls > 2 {
                Err(SortError::NoKeysFound)
            } else {
                Ok(i.cmp(&j))
            }
        });
        assert!(matches!(result, Err(SortError::EmptySpec)));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_permute() {
        let mut items = vec!['a', 'b', 'c'];
        permute(&mut items, &[2, 0, 1]);
        assert_eq!(items, vec!['c', 'a', 'b']);
    }

    /// Comparator on integer rows: compares column `index`, optionally reversed.
    fn column(index: usize, ascending: bool) -> Box<dyn Comparator<Vec<i32>>> {
        Box::new(move |a: &Vec<i32>, b: &Vec<i32>| -> Result<Ordering> {
            let ord = a[index].cmp(&b[index]);
            Ok(if ascending { ord } else { ord.reverse() })
        })
    }

    proptest! {
        #[test]
        fn prop_composition_matches_first_non_zero(verdicts in prop::collection::vec(-1i8..=1, 0..8)) {
            let composed: Composed<'_, ()> = verdicts
                .iter()
                .map(|v| Box::new(fixed(*v)) as Box<dyn Comparator<()>>)
                .collect();
            let expected = verdicts
                .iter()
                .map(|v| v.cmp(&0))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal);
            prop_assert_eq!(composed.compare(&(), &()).unwrap(), expected);
        }

        #[test]
        fn prop_composition_of_columns_is_lexicographic(
            directions in prop::collection::vec(any::<bool>(), 1..4),
            a in prop::collection::vec(0i32..3, 4),
            b in prop::collection::vec(0i32..3, 4),
        ) {
            let composed: Composed<'_, Vec<i32>> = directions
                .iter()
                .enumerate()
                .map(|(i, asc)| column(i, *asc))
                .collect();
            let mut expected = Ordering::Equal;
            for (i, asc) in directions.iter().enumerate() {
                let ord = if *asc { a[i].cmp(&b[i]) } else { b[i].cmp(&a[i]) };
                if ord != Ordering::Equal {
                    expected = ord;
                    break;
                }
            }
            prop_assert_eq!(composed.compare(&a, &b).unwrap(), expected);
            prop_assert_eq!(composed.compare(&b, &a).unwrap(), expected.reverse());
        }

        #[test]
        fn prop_try_sort_matches_std_stable_sort(mut items in prop::collection::vec((0u8..4, any::<u16>()), 0..40)) {
            let mut expected = items.clone();
            expected.sort_by(|a, b| a.0.cmp(&b.0));
            try_sort_by(&mut items, |a, b| Ok(a.0.cmp(&b.0))).unwrap();
            prop_assert_eq!(items, expected);
        }
    }
}
