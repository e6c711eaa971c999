use std::sync::{Arc, RwLock};

/// Arena of shared values. Entries are never moved or removed, so an index
/// handed out by `insert` stays valid for the lifetime of the slab.
#[derive(Debug)]
pub struct ConcurrentSlab<T> {
    inner: RwLock<Vec<Arc<T>>>,
}

impl<T> Default for ConcurrentSlab<T> {
    fn default() -> Self {
        ConcurrentSlab {
            inner: RwLock::new(Vec::new()),
        }
    }
}

impl<T> ConcurrentSlab<T> {
    pub fn insert(&self, value: T) -> usize {
        let mut inner = self.inner.write().unwrap();
        let ret = inner.len();
        inner.push(Arc::new(value));
        ret
    }

    pub fn get(&self, index: usize) -> Arc<T> {
        let inner = self.inner.read().unwrap();
        inner[index].clone()
    }

    /// Swaps in `value`. Holders of the previous `Arc` keep seeing the old value.
    pub fn replace(&self, index: usize, value: T) {
        let mut inner = self.inner.write().unwrap();
        inner[index] = Arc::new(value);
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
