//! Lock-Free / Wait-Free Bounded Ring Buffer
//!
//! Satu kontrak push/pop untuk empat konfigurasi akses (lihat [`Access`]).
//! Tidak ada Mutex, tidak ada alokasi setelah inisialisasi, tidak ada
//! blocking: penuh/kosong dilaporkan langsung ke caller.
//!
//! Layout: cursor producer (`tail`) dan consumer (`head`) masing-masing di
//! cache line sendiri, dan setiap slot juga di-pad supaya producer dan
//! consumer yang menyentuh slot bersebelahan tidak saling invalidasi.

use std::fmt;
use std::marker::PhantomData;
use std::mem;

use super::access::{Access, Mpmc, Mpsc, Spmc, Spsc};
use super::cache_padded::CachePadded;
use super::handle::{Consumer, Producer};
use super::slot::Slot;
use crate::sync::{AtomicUsize, Ordering};
use crate::trace::debug;

/// Push ditolak karena ring penuh. Value dikembalikan ke caller.
#[derive(Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ring buffer is full")]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Full(..)")
    }
}

/// Ring buffer berkapasitas tetap `N`, dengan protokol akses `A`.
///
/// `N` boleh berapa pun asal positif. Power of 2 memakai masking, selain itu
/// modulo.
///
/// Hanya `RingBuffer<T, Mpmc, N>` yang `Sync`. Konfigurasi lain dibagi ke
/// beberapa thread lewat [`RingBuffer::split`], yang menjamin peran single
/// hanya dipegang satu thread.
#[repr(C)]
pub struct RingBuffer<T, A: Access, const N: usize> {
    // Producer cursor - cache line sendiri
    pub(crate) tail: CachePadded<AtomicUsize>,
    // Consumer cursor - cache line sendiri
    pub(crate) head: CachePadded<AtomicUsize>,
    // Pre-allocated di heap, tidak ada alokasi setelah init
    slots: Box<[CachePadded<Slot<T>>]>,
    _access: PhantomData<A>,
}

/// Ring single producer / single consumer.
pub type SpscRingBuffer<T, const N: usize> = RingBuffer<T, Spsc, N>;
/// Ring multi producer / single consumer.
pub type MpscRingBuffer<T, const N: usize> = RingBuffer<T, Mpsc, N>;
/// Ring single producer / multi consumer.
pub type SpmcRingBuffer<T, const N: usize> = RingBuffer<T, Spmc, N>;
/// Ring multi producer / multi consumer.
pub type MpmcRingBuffer<T, const N: usize> = RingBuffer<T, Mpmc, N>;

// SAFETY: semua peran boleh dipakai bersamaan oleh banyak thread pada MPMC.
// Slot hanya diakses oleh pemegang ticket yang cocok.
unsafe impl<T: Send, const N: usize> Sync for RingBuffer<T, Mpmc, N> {}

impl<T, A: Access, const N: usize> Default for RingBuffer<T, A, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Access, const N: usize> RingBuffer<T, A, N> {
    // Selisih marker dihitung sebagai isize, jadi 2N harus muat
    const CAPACITY_OK: () = assert!(
        N > 0 && N <= (isize::MAX as usize) / 4,
        "ring buffer capacity must be in 1..=isize::MAX / 4"
    );

    /// Membuat ring buffer baru dengan semua slot sudah dialokasikan.
    ///
    /// Kapasitas nol ditolak saat compile.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;

        // Alokasi di heap untuk menghindari stack overflow pada N besar
        let slots: Box<[CachePadded<Slot<T>>]> =
            (0..N).map(|index| CachePadded::new(Slot::new(index))).collect();

        debug!(
            access = A::NAME,
            capacity = N,
            slot_bytes = mem::size_of::<CachePadded<Slot<T>>>(),
            "ring buffer allocated"
        );

        Self {
            tail: CachePadded::new(AtomicUsize::new(0)),
            head: CachePadded::new(AtomicUsize::new(0)),
            slots,
            _access: PhantomData,
        }
    }

    /// Push value ke ring.
    ///
    /// Returns `true` jika tersimpan dan terlihat oleh `pop` berikutnya,
    /// `false` jika ring penuh (value di-drop).
    #[inline(always)]
    pub fn push(&self, value: T) -> bool {
        A::try_push(self, value).is_ok()
    }

    /// Seperti [`push`](Self::push), tapi value dikembalikan jika ring penuh.
    #[inline(always)]
    pub fn try_push(&self, value: T) -> Result<(), Full<T>> {
        A::try_push(self, value).map_err(Full)
    }

    /// Pop elemen tertua yang tersedia. `None` jika ring kosong.
    #[inline(always)]
    pub fn pop(&self) -> Option<T> {
        A::pop(self)
    }

    /// Pecah ring menjadi handle producer dan consumer.
    ///
    /// Handle peran single hanya `Send`; handle peran multi juga `Clone` dan
    /// `Sync`. Ring tidak bisa dipakai atau di-drop selama handle masih hidup.
    pub fn split(&mut self) -> (Producer<'_, T, A, N>, Consumer<'_, T, A, N>) {
        debug!(access = A::NAME, capacity = N, "ring buffer split");
        let ring: &Self = self;
        (Producer::new(ring), Consumer::new(ring))
    }

    /// Snapshot jumlah elemen. Di bawah concurrency hanya perkiraan.
    #[inline]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);

        // Pada SPMC head bisa sesaat terlihat melewati tail
        let len = tail.wrapping_sub(head) as isize;
        len.clamp(0, N as isize) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    pub(crate) fn slot(&self, position: usize) -> &Slot<T> {
        let index = if N.is_power_of_two() {
            position & (N - 1)
        } else {
            position % N
        };
        &self.slots[index]
    }
}

impl<T, A: Access, const N: usize> Drop for RingBuffer<T, A, N> {
    fn drop(&mut self) {
        if !mem::needs_drop::<T>() {
            return;
        }

        // &mut self: tidak ada push/pop yang sedang berjalan
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);

        if tail != head {
            debug!(
                access = A::NAME,
                undelivered = tail.wrapping_sub(head),
                "dropping undelivered values"
            );
        }

        let mut position = head;
        while position != tail {
            let index = if N.is_power_of_two() {
                position & (N - 1)
            } else {
                position % N
            };
            // SAFETY: setiap ticket di [head, tail) sudah dipublish dan belum di-pop
            unsafe { self.slots[index].drop_value() };
            position = position.wrapping_add(1);
        }
    }
}

impl<T, A: Access, const N: usize> fmt::Debug for RingBuffer<T, A, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("access", &A::NAME)
            .field("capacity", &N)
            .field("len", &self.len())
            .finish()
    }
}
