use crate::matching::key::MatchKey;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Groups input positions by [`MatchKey`].
///
/// Buckets are kept in first-seen order and each bucket lists positions in
/// input order, so iteration is reproducible run to run. Positions (not
/// record identifiers) are stored because identifiers are not guaranteed
/// unique across statement files.
#[derive(Debug, Clone, Default)]
pub struct BucketIndex {
    /// Keys in the order they were first seen.
    order: Vec<MatchKey>,
    buckets: HashMap<MatchKey, Vec<usize>>,
}

impl BucketIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a sequence of keys; the i-th key belongs to input position i.
    pub fn build<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = MatchKey>,
    {
        let mut index = Self::new();
        for (position, key) in keys.into_iter().enumerate() {
            index.insert(key, position);
        }
        index
    }

    pub fn insert(&mut self, key: MatchKey, position: usize) {
        match self.buckets.entry(key) {
            Entry::Occupied(mut bucket) => bucket.get_mut().push(position),
            Entry::Vacant(slot) => {
                self.order.push(key);
                slot.insert(vec![position]);
            }
        }
    }

    pub fn get(&self, key: &MatchKey) -> Option<&[usize]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    /// Buckets in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&MatchKey, &[usize])> {
        self.order
            .iter()
            .map(move |key| (key, self.buckets[key].as_slice()))
    }

    pub fn bucket_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
