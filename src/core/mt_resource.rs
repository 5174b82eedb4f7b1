//! # MtResource Module
//!
//! Shared-resource wrapper used for all cross-thread state.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` provides synchronized access to a value of type `T` that is shared
/// between the streaming thread, the bulk initializer threads, and any consumer
/// thread issuing lookups. It wraps an `Arc<RwLock<T>>`, so cloning produces a new
/// handle to the same underlying value rather than a copy.
///
/// Every piece of shared streaming state travels in one of these: the chunk store
/// (pool + spatial index), each resident chunk, and the externally-updated viewer
/// position. Because handles are reference-counted, a swap-remove inside the pool
/// can never invalidate a handle held elsewhere; at worst the holder keeps a
/// chunk alive slightly past its eviction.
///
/// # Examples
///
/// ```
/// use voxel_streaming::core::MtResource;
///
/// let shared = MtResource::new(0);
/// let handle = shared.clone();
///
/// *handle.write() += 1;
/// assert_eq!(*shared.read(), 1);
/// ```
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Wraps `resource` in a new shared handle.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Acquires a shared read guard on the contained value.
    ///
    /// Multiple readers may hold guards concurrently; a reader blocks only
    /// while a writer holds the lock.
    ///
    /// # Panics
    /// Panics if the lock is poisoned (a thread panicked while writing).
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Acquires an exclusive write guard on the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }

    /// Returns `true` if `a` and `b` are handles to the same underlying value.
    ///
    /// Identity comparison, not value comparison. The chunk store uses this to
    /// assert that the index and the pool agree about which chunk occupies a
    /// slot before an eviction proceeds.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.resource, &b.resource)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_the_same_value() {
        let shared = MtResource::new(vec![1, 2, 3]);
        let handle = shared.clone();

        handle.write().push(4);

        assert_eq!(*shared.read(), vec![1, 2, 3, 4]);
        assert!(MtResource::ptr_eq(&shared, &handle));
    }

    #[test]
    fn distinct_resources_are_not_identical() {
        let a = MtResource::new(7u32);
        let b = MtResource::new(7u32);
        assert!(!MtResource::ptr_eq(&a, &b));
    }

    #[test]
    fn survives_cross_thread_mutation() {
        let counter = MtResource::new(0u32);
        let handle = counter.clone();

        let worker = thread::spawn(move || {
            for _ in 0..100 {
                *handle.write() += 1;
            }
        });

        worker.join().unwrap();
        assert_eq!(*counter.read(), 100);
    }
}
