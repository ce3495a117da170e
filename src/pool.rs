use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};

/// Keyed object pool for search structures.
///
/// Single-threaded: the pool is `!Sync`, so every worker owns its own.
/// A rented value goes back to the pool when its [`Rented`] guard drops,
/// including on early returns.
pub struct Pool<K, T> {
    idle: RefCell<HashMap<K, Vec<T>>>,
    created: Cell<usize>,
    reused: Cell<usize>,
}

impl<K: Eq + Hash + Copy, T> Pool<K, T> {
    pub fn new() -> Self {
        Pool {
            idle: RefCell::new(HashMap::new()),
            created: Cell::new(0),
            reused: Cell::new(0),
        }
    }

    /// Take an idle value for `key`, or build one with `make`
    pub fn rent(&self, key: K, make: impl FnOnce() -> T) -> Rented<'_, K, T> {
        let pooled = self
            .idle
            .borrow_mut()
            .get_mut(&key)
            .and_then(|values| values.pop());

        let value = match pooled {
            Some(value) => {
                self.reused.set(self.reused.get() + 1);
                value
            }
            None => {
                self.created.set(self.created.get() + 1);
                make()
            }
        };

        Rented {
            pool: self,
            key,
            value: Some(value),
        }
    }

    /// Values currently waiting in the pool under `key`
    pub fn idle_count(&self, key: K) -> usize {
        self.idle.borrow().get(&key).map_or(0, Vec::len)
    }

    /// How many values were built because none was idle
    pub fn created(&self) -> usize {
        self.created.get()
    }

    /// How many rentals were served from idle values
    pub fn reused(&self) -> usize {
        self.reused.get()
    }

    fn give_back(&self, key: K, value: T) {
        self.idle.borrow_mut().entry(key).or_default().push(value);
    }
}

impl<K: Eq + Hash + Copy, T> Default for Pool<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for a pooled value; returns it to the pool on drop
pub struct Rented<'p, K: Eq + Hash + Copy, T> {
    pool: &'p Pool<K, T>,
    key: K,
    value: Option<T>,
}

impl<K: Eq + Hash + Copy, T> Deref for Rented<'_, K, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Only `drop` takes the value out
        self.value.as_ref().expect("rented value already returned")
    }
}

impl<K: Eq + Hash + Copy, T> DerefMut for Rented<'_, K, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value.as_mut().expect("rented value already returned")
    }
}

impl<K: Eq + Hash + Copy, T> Drop for Rented<'_, K, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.give_back(self.key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_returns_on_drop() {
        let pool: Pool<usize, Vec<u8>> = Pool::new();
        {
            let mut v = pool.rent(8, || Vec::with_capacity(8));
            v.push(1);
            assert_eq!(pool.idle_count(8), 0);
        }
        assert_eq!(pool.idle_count(8), 1);

        let v = pool.rent(8, Vec::new);
        // Same allocation came back, contents untouched; resetting is the renter's job
        assert_eq!(v.as_slice(), &[1]);
        assert_eq!(pool.created(), 1);
        assert_eq!(pool.reused(), 1);
    }

    #[test]
    fn test_keys_are_separate() {
        let pool: Pool<(u32, u32), u32> = Pool::new();
        drop(pool.rent((4, 4), || 16));
        let other = pool.rent((8, 8), || 64);
        assert_eq!(*other, 64);
        assert_eq!(pool.idle_count((4, 4)), 1);
    }

    #[test]
    fn test_returned_on_early_exit() {
        fn search(pool: &Pool<u8, String>, fail: bool) -> Option<usize> {
            let s = pool.rent(0, String::new);
            if fail {
                return None;
            }
            Some(s.len())
        }

        let pool = Pool::new();
        assert_eq!(search(&pool, true), None);
        assert_eq!(search(&pool, false), Some(0));
        assert_eq!(pool.idle_count(0), 1);
        assert_eq!(pool.created(), 1);
    }
}
