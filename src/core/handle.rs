//! Handle producer/consumer hasil [`RingBuffer::split`].
//!
//! Peran single: handle `Send` tapi tidak `Clone`/`Sync`, jadi hanya satu
//! thread yang bisa push (atau pop) pada satu waktu. Peran multi: handle
//! `Clone + Send + Sync`.

use std::fmt;

use super::access::{Access, Multi};
use super::ring_buffer::{Full, RingBuffer};

/// Sisi producer dari ring.
pub struct Producer<'a, T, A: Access, const N: usize> {
    ring: &'a RingBuffer<T, A, N>,
}

/// Sisi consumer dari ring.
pub struct Consumer<'a, T, A: Access, const N: usize> {
    ring: &'a RingBuffer<T, A, N>,
}

// SAFETY: handle hanya membawa hak atas satu peran. Untuk peran single,
// handle tidak bisa diduplikasi (tidak Clone, tidak Sync), jadi cukup Send.
unsafe impl<T: Send, A: Access, const N: usize> Send for Producer<'_, T, A, N> {}
unsafe impl<T: Send, A: Access, const N: usize> Send for Consumer<'_, T, A, N> {}

// SAFETY: protokol multi aman untuk push/pop bersamaan dari banyak thread
unsafe impl<T: Send, A: Access<Producer = Multi>, const N: usize> Sync for Producer<'_, T, A, N> {}
unsafe impl<T: Send, A: Access<Consumer = Multi>, const N: usize> Sync for Consumer<'_, T, A, N> {}

impl<'a, T, A: Access, const N: usize> Producer<'a, T, A, N> {
    pub(crate) fn new(ring: &'a RingBuffer<T, A, N>) -> Self {
        Self { ring }
    }

    /// Lihat [`RingBuffer::push`].
    #[inline(always)]
    pub fn push(&self, value: T) -> bool {
        self.ring.push(value)
    }

    /// Lihat [`RingBuffer::try_push`].
    #[inline(always)]
    pub fn try_push(&self, value: T) -> Result<(), Full<T>> {
        self.ring.try_push(value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<'a, T, A: Access, const N: usize> Consumer<'a, T, A, N> {
    pub(crate) fn new(ring: &'a RingBuffer<T, A, N>) -> Self {
        Self { ring }
    }

    /// Lihat [`RingBuffer::pop`].
    #[inline(always)]
    pub fn pop(&self) -> Option<T> {
        self.ring.pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T, A: Access<Producer = Multi>, const N: usize> Clone for Producer<'_, T, A, N> {
    fn clone(&self) -> Self {
        Self { ring: self.ring }
    }
}

impl<T, A: Access<Consumer = Multi>, const N: usize> Clone for Consumer<'_, T, A, N> {
    fn clone(&self) -> Self {
        Self { ring: self.ring }
    }
}

impl<T, A: Access, const N: usize> fmt::Debug for Producer<'_, T, A, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("access", &A::NAME)
            .field("capacity", &N)
            .finish()
    }
}

impl<T, A: Access, const N: usize> fmt::Debug for Consumer<'_, T, A, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("access", &A::NAME)
            .field("capacity", &N)
            .finish()
    }
}
