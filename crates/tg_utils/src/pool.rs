//! A bounded free list of reusable objects.
//!
//! [`Pool::acquire`] hands out a [`Pooled`] guard. Dropping the guard resets
//! the object through [`Recycle`] and puts it back, so objects are returned on
//! every exit path, including early returns through `?`.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

// -----------------------------------------------------------------------------
// Recycle

/// An object that can be reset for reuse.
pub trait Recycle: Default {
    /// Clears all per-use state.
    ///
    /// Implementations may release oversized allocations here.
    fn reset(&mut self);
}

/// Buffers above this capacity are released instead of kept.
pub const MAX_RETAINED_BYTES: usize = 1 << 20;

impl Recycle for Vec<u8> {
    #[inline]
    fn reset(&mut self) {
        self.clear();
        if self.capacity() > MAX_RETAINED_BYTES {
            self.shrink_to(MAX_RETAINED_BYTES);
        }
    }
}

// -----------------------------------------------------------------------------
// Pool

/// A thread-safe pool holding at most `capacity` idle objects.
///
/// Each object is owned by a single guard at a time. The lock is only held
/// while taking or returning an object.
///
/// # Examples
///
/// ```
/// use tg_utils::pool::Pool;
///
/// let pool: Pool<Vec<u8>> = Pool::new(4);
/// {
///     let mut buf = pool.acquire();
///     buf.extend_from_slice(b"abc");
/// }
/// assert_eq!(pool.idle(), 1);
/// assert!(pool.acquire().is_empty());
/// ```
pub struct Pool<T: Recycle> {
    free: Mutex<Vec<T>>,
    capacity: usize,
}

impl<T: Recycle> Pool<T> {
    /// Creates an empty pool retaining up to `capacity` idle objects.
    pub const fn new(capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Takes an idle object, or creates one with `Default` if none is idle.
    pub fn acquire(&self) -> Pooled<'_, T> {
        let value = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();

        let value = match value {
            Some(value) => value,
            None => {
                log::trace!("pool miss: creating `{}`", core::any::type_name::<T>());
                T::default()
            }
        };

        Pooled {
            pool: self,
            value: Some(value),
        }
    }

    /// Returns the number of idle objects.
    pub fn idle(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns the maximum number of idle objects.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn release(&self, mut value: T) {
        value.reset();
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.capacity {
            free.push(value);
        }
    }
}

impl<T: Recycle> Debug for Pool<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pool")
            .field("idle", &self.idle())
            .field("capacity", &self.capacity)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Pooled

/// An object borrowed from a [`Pool`], returned when dropped.
pub struct Pooled<'a, T: Recycle> {
    pool: &'a Pool<T>,
    // `None` only during drop.
    value: Option<T>,
}

impl<T: Recycle> Deref for Pooled<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => unreachable!(),
        }
    }
}

impl<T: Recycle> DerefMut for Pooled<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.value {
            Some(value) => value,
            None => unreachable!(),
        }
    }
}

impl<T: Recycle> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.release(value);
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
