//! Free-list object pool for pre-constructed instances (chunks, collider handles).
//!
//! Instead of constructing and dropping heavyweight objects every time a chunk
//! enters or leaves the window, owners keep them in a [`Pool`] and re-initialize
//! them on reuse.

/// What happens when an instance is released into a pool that is already full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overflow {
    /// Accept the instance anyway; the pool grows to hold every instance ever created.
    Grow,
    /// Refuse the instance and hand it back to the caller for disposal.
    Discard,
}

/// How an instance was obtained from [`Pool::acquire_or_else`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquired {
    /// Taken from the free list.
    Pooled,
    /// The pool was empty and a new instance was constructed.
    Allocated,
}

/// A free list of currently unused instances.
///
/// Tracks how many instances had to be allocated because the pool ran dry;
/// that counter only ever grows.
#[derive(Debug)]
pub struct Pool<T> {
    free: Vec<T>,
    capacity: usize,
    overflow: Overflow,
    overflow_allocations: usize,
}

impl<T> Pool<T> {
    /// Creates an empty pool.
    pub fn new(capacity: usize, overflow: Overflow) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
            overflow,
            overflow_allocations: 0,
        }
    }

    /// Creates a pool filled with `capacity` instances built by `make`.
    pub fn prefilled(capacity: usize, overflow: Overflow, mut make: impl FnMut(usize) -> T) -> Self {
        let mut pool = Self::new(capacity, overflow);
        pool.free.extend((0..capacity).map(&mut make));
        pool
    }

    /// Takes an instance from the free list, if one is available.
    pub fn acquire(&mut self) -> Option<T> {
        self.free.pop()
    }

    /// Takes an instance from the free list, or builds a new one with `make`.
    ///
    /// Building counts as an overflow allocation.
    pub fn acquire_or_else(&mut self, make: impl FnOnce() -> T) -> (T, Acquired) {
        match self.free.pop() {
            Some(item) => (item, Acquired::Pooled),
            None => {
                self.overflow_allocations += 1;
                (make(), Acquired::Allocated)
            }
        }
    }

    /// Returns an instance to the free list.
    ///
    /// With [`Overflow::Discard`], a full pool refuses the instance and gives it back.
    pub fn release(&mut self, item: T) -> Result<(), T> {
        if self.overflow == Overflow::Discard && self.free.len() >= self.capacity {
            return Err(item);
        }
        self.free.push(item);
        Ok(())
    }

    /// Number of instances waiting in the free list.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Returns `true` if no instance is available.
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Returns `true` if the free list holds at least `capacity` instances.
    pub fn is_full(&self) -> bool {
        self.free.len() >= self.capacity
    }

    /// Configured capacity (the initial fill size).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of instances constructed because the pool was empty.
    pub fn overflow_allocations(&self) -> usize {
        self.overflow_allocations
    }

    /// Iterates over the pooled instances.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.free.iter()
    }

    /// Removes every pooled instance.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.free.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefilled_pool_hands_out_instances() {
        let mut pool = Pool::prefilled(3, Overflow::Grow, |i| i);
        assert_eq!(pool.len(), 3);
        assert!(pool.acquire().is_some());
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.overflow_allocations(), 0);
    }

    #[test]
    fn test_exhaustion_allocates_and_counts() {
        let mut pool: Pool<u32> = Pool::prefilled(1, Overflow::Grow, |_| 7);
        let (a, how_a) = pool.acquire_or_else(|| 99);
        let (b, how_b) = pool.acquire_or_else(|| 99);
        assert_eq!((a, how_a), (7, Acquired::Pooled));
        assert_eq!((b, how_b), (99, Acquired::Allocated));
        assert_eq!(pool.overflow_allocations(), 1);
    }

    #[test]
    fn test_grow_pool_accepts_beyond_capacity() {
        let mut pool: Pool<u32> = Pool::new(1, Overflow::Grow);
        assert!(pool.release(1).is_ok());
        assert!(pool.release(2).is_ok());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_discard_pool_refuses_when_full() {
        let mut pool: Pool<u32> = Pool::new(1, Overflow::Discard);
        assert!(pool.release(1).is_ok());
        assert!(pool.is_full());
        assert_eq!(pool.release(2), Err(2));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_drain_empties_pool() {
        let mut pool = Pool::prefilled(4, Overflow::Grow, |i| i);
        let drained: Vec<_> = pool.drain().collect();
        assert_eq!(drained.len(), 4);
        assert!(pool.is_empty());
    }
}
