//! Insertion-ordered interning table.
//!
//! `CanonicalSet<T>` keeps one canonical instance per equality class and hands
//! out stable indices. The closure uses it for both faces and edges; the
//! insertion order is what export layers iterate, so it must stay
//! deterministic for a fixed input order.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Index;

#[derive(Clone, Debug)]
pub struct CanonicalSet<T> {
    items: Vec<T>,
    index: HashMap<T, usize>,
}

impl<T> Default for CanonicalSet<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> CanonicalSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `item`. Returns the canonical index and whether it was new.
    pub fn insert(&mut self, item: T) -> (usize, bool) {
        if let Some(&i) = self.index.get(&item) {
            return (i, false);
        }
        let i = self.items.len();
        self.index.insert(item.clone(), i);
        self.items.push(item);
        (i, true)
    }

    /// Convenience form of [`CanonicalSet::insert`] that only reports novelty.
    pub fn add(&mut self, item: T) -> bool {
        self.insert(item).1
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index.contains_key(item)
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.index.get(item).copied()
    }

    pub fn get(&self, i: usize) -> Option<&T> {
        self.items.get(i)
    }
}

impl<T> CanonicalSet<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Index<usize> for CanonicalSet<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.items[i]
    }
}

impl<'a, T> IntoIterator for &'a CanonicalSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Clone + Eq + Hash> FromIterator<T> for CanonicalSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<T: Clone + Eq + Hash> Extend<T> for CanonicalSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}
