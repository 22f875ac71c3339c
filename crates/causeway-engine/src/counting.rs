//! First-seen-ordered frequency counting.
//!
//! Every "most common" ranking in the pipeline breaks ties by first
//! occurrence, so the counter tracks insertion order alongside counts.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Frequency counter whose ties resolve to the value seen first.
#[derive(Debug, Clone)]
pub(crate) struct OrderedCounter<T> {
    order: Vec<T>,
    counts: HashMap<T, usize>,
}

impl<T: Eq + Hash + Clone> OrderedCounter<T> {
    pub(crate) fn new() -> Self {
        Self {
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }

    pub(crate) fn add(&mut self, value: T) {
        match self.counts.get_mut(&value) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(value.clone(), 1);
                self.order.push(value);
            }
        }
    }

    pub(crate) fn extend(&mut self, values: impl IntoIterator<Item = T>) {
        for value in values {
            self.add(value);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Up to `limit` (value, count) pairs, highest count first. The sort is
    /// stable, so equal counts keep first-seen order.
    pub(crate) fn most_common(&self, limit: usize) -> Vec<(T, usize)> {
        let mut ranked: Vec<(T, usize)> = self
            .order
            .iter()
            .map(|value| (value.clone(), self.counts[value]))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }

    /// The most frequent value, first-seen on ties.
    pub(crate) fn top(&self) -> Option<(T, usize)> {
        self.most_common(1).into_iter().next()
    }
}

impl<T: Eq + Hash + Clone + Ord> OrderedCounter<T> {
    /// Counts as an ordered map.
    pub(crate) fn distribution(&self) -> BTreeMap<T, usize> {
        self.counts
            .iter()
            .map(|(value, count)| (value.clone(), *count))
            .collect()
    }
}
