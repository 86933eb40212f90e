use std::cmp::Ordering;

/// A single-pass filter/sort/limit over a borrowed record slice.
///
/// Nothing is cached: a pipeline is built from the store's current contents on every query
/// and materialized into an owned snapshot by [`Pipeline::collect`] or [`Pipeline::map`].
#[derive(Debug)]
pub(crate) struct Pipeline<'a, T> {
    records: Vec<&'a T>,
}

impl<'a, T> Pipeline<'a, T> {
    pub(crate) fn over(records: &'a [T]) -> Self {
        Self {
            records: records.iter().collect(),
        }
    }

    pub(crate) fn filter<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool,
    {
        self.records.retain(|record| predicate(*record));
        self
    }

    /// Stable: records the comparator considers equal keep their insertion order.
    pub(crate) fn sort_by<C>(mut self, mut compare: C) -> Self
    where
        C: FnMut(&T, &T) -> Ordering,
    {
        self.records.sort_by(|a, b| compare(*a, *b));
        self
    }

    pub(crate) fn limit(mut self, count: usize) -> Self {
        self.records.truncate(count);
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fails with `err()` when nothing survived the filters.
    pub(crate) fn non_empty_or<E, F>(self, err: F) -> Result<Self, E>
    where
        F: FnOnce() -> E,
    {
        if self.is_empty() {
            return Err(err());
        }
        Ok(self)
    }

    pub(crate) fn map<U, F>(self, f: F) -> Vec<U>
    where
        F: FnMut(&T) -> U,
    {
        self.records.into_iter().map(f).collect()
    }
}

impl<'a, T: Clone> Pipeline<'a, T> {
    pub(crate) fn collect(self) -> Vec<T> {
        self.records.into_iter().cloned().collect()
    }
}

/// Collapses every NaN onto one positive NaN, which `total_cmp` places above `+inf`.
fn canonical(key: f64) -> f64 {
    if key.is_nan() {
        f64::NAN.copysign(1.0)
    } else {
        key
    }
}

/// Orders by an `f64` key, largest first.
///
/// Uses `f64::total_cmp` after folding all NaNs into one, so two keys only tie when they are
/// exactly equal or both NaN. `-0.0` orders below `0.0`. Amounts that are computed rather
/// than entered can differ in the last bit and will not tie.
pub(crate) fn descending_by<T, K>(key: K) -> impl Fn(&T, &T) -> Ordering
where
    K: Fn(&T) -> f64,
{
    move |a: &T, b: &T| canonical(key(b)).total_cmp(&canonical(key(a)))
}

/// Orders by an `f64` key, smallest first. Same tie semantics as [`descending_by`].
pub(crate) fn ascending_by<T, K>(key: K) -> impl Fn(&T, &T) -> Ordering
where
    K: Fn(&T) -> f64,
{
    move |a: &T, b: &T| canonical(key(a)).total_cmp(&canonical(key(b)))
}
