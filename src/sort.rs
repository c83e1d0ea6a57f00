//! The runtime sort engine. The external engine owns the node-set and knows
//! how to evaluate a sort key against a node; the multi-key resolution with
//! case-order, NaN placement and document-order tie-breaking lives here.
//! Engine bindings register this routine for their sort directives and reach
//! it through the [`SortKeyEvaluator`] seam.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::sortkey::{SortCaseOrder, SortDataType, SortKeySpec, SortOrder};

/// Capacity limit on sort keys per directive. Keys beyond the cap are
/// silently ignored; this is a documented limit, not an error.
pub const MAX_SORT_KEYS: usize = 15;

/// One evaluated sort-key value.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    fn as_number(&self) -> f64 {
        match self {
            SortValue::Number(n) => *n,
            SortValue::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }

    fn as_text(&self) -> Cow<'_, str> {
        match self {
            SortValue::Text(s) => Cow::Borrowed(s),
            SortValue::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

/// Evaluates sort keys for the node-set being ordered. `index` is the node's
/// original document-order position. `None` means the value could not be
/// computed; such nodes order after every node with a value for that key.
pub trait SortKeyEvaluator {
    fn evaluate(&mut self, key: usize, index: usize) -> Option<SortValue>;
}

/// Orders a node-set of `len` nodes by up to [`MAX_SORT_KEYS`] keys and
/// returns the permutation of original positions. Key 1 is evaluated for the
/// whole set up front; deeper keys are evaluated (whole set at a time) only
/// once a shallower key ties, and cached for the rest of the invocation.
/// A full tie falls back to document order, so the result is stable.
pub fn sort_node_set<E>(len: usize, keys: &[SortKeySpec], evaluator: &mut E) -> Vec<usize>
where
    E: SortKeyEvaluator + ?Sized,
{
    let mut order: Vec<usize> = (0..len).collect();
    if len <= 1 || keys.is_empty() {
        return order;
    }
    let keys = &keys[..keys.len().min(MAX_SORT_KEYS)];
    let mut sorter = NodeSetSorter {
        len,
        keys,
        caches: vec![None; keys.len()],
        evaluator,
    };
    sorter.fill_cache(0);

    // Diminishing-increment insertion sort over the permutation; the caches
    // stay aligned because they are indexed by original position.
    let mut incr = len / 2;
    while incr > 0 {
        for i in incr..len {
            let mut j = i;
            while j >= incr && sorter.compare(order[j - incr], order[j]) == Ordering::Greater {
                order.swap(j - incr, j);
                j -= incr;
            }
        }
        incr /= 2;
    }
    order
}

struct NodeSetSorter<'a, E: ?Sized> {
    len: usize,
    keys: &'a [SortKeySpec],
    caches: Vec<Option<Vec<Option<SortValue>>>>,
    evaluator: &'a mut E,
}

impl<E: SortKeyEvaluator + ?Sized> NodeSetSorter<'_, E> {
    fn fill_cache(&mut self, key: usize) {
        if self.caches[key].is_none() {
            let values = (0..self.len)
                .map(|index| self.evaluator.evaluate(key, index))
                .collect();
            self.caches[key] = Some(values);
        }
    }

    fn compare(&mut self, a: usize, b: usize) -> Ordering {
        for key_index in 0..self.keys.len() {
            self.fill_cache(key_index);
            let Some(cache) = self.caches[key_index].as_ref() else {
                continue;
            };
            let ordering = compare_values(&self.keys[key_index], &cache[a], &cache[b]);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a.cmp(&b)
    }
}

fn compare_values(key: &SortKeySpec, a: &Option<SortValue>, b: &Option<SortValue>) -> Ordering {
    let ordering = match (a, b) {
        (None, None) => return Ordering::Equal,
        // An evaluation failure sorts after, independent of direction.
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => match key.data_type.unwrap_or(SortDataType::Text) {
            SortDataType::Number => compare_numbers(a.as_number(), b.as_number()),
            SortDataType::Text => compare_text(a.as_text().as_ref(), b.as_text().as_ref(), key.case_order),
        },
    };
    if key.order == Some(SortOrder::Descending) {
        ordering.reverse()
    } else {
        ordering
    }
}

/// NaN compares smaller than every number and equal to NaN.
fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Case-insensitive first; a case-only difference is decided by the exact
/// comparison, flipped under lower-first.
fn compare_text(a: &str, b: &str, case_order: Option<SortCaseOrder>) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    if folded != Ordering::Equal {
        return folded;
    }
    let exact = a.cmp(b);
    match case_order {
        Some(SortCaseOrder::LowerFirst) => exact.reverse(),
        _ => exact,
    }
}
