//! Slot dalam ring buffer: payload + sequence marker generasi.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;

use crate::sync::AtomicUsize;

/// Satu lokasi penyimpanan di ring.
///
/// `sequence` hanya dipakai oleh konfigurasi yang punya sisi multi. Encoding
/// untuk ticket `t`:
/// - `2t`     : EMPTY, boleh ditulis producer pemegang ticket `t`
/// - `2t + 1` : FULL, boleh dibaca consumer pemegang ticket `t`
///
/// Consumer mengembalikan slot ke generasi berikutnya dengan menyimpan
/// `2(t + N)`. Dikali dua supaya FULL generasi `t` tidak pernah sama dengan
/// EMPTY generasi `t + N`, termasuk untuk `N == 1`.
pub(crate) struct Slot<T> {
    pub(crate) sequence: AtomicUsize,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            sequence: AtomicUsize::new(empty_marker(index)),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// # Safety
    /// Caller memegang hak tulis eksklusif atas slot ini (ticket-nya cocok) dan
    /// slot sedang kosong.
    #[inline(always)]
    pub(crate) unsafe fn write(&self, value: T) {
        (*self.value.get()).write(value);
    }

    /// # Safety
    /// Caller memegang hak baca eksklusif dan slot berisi value yang sudah
    /// dipublish. Setelah ini slot dianggap kosong.
    #[inline(always)]
    pub(crate) unsafe fn read(&self) -> T {
        (*self.value.get()).assume_init_read()
    }

    /// # Safety
    /// Slot berisi value yang belum di-pop, dan tidak ada thread lain yang
    /// mengaksesnya.
    pub(crate) unsafe fn drop_value(&mut self) {
        self.value.get_mut().assume_init_drop();
    }
}

#[inline(always)]
pub(crate) const fn empty_marker(ticket: usize) -> usize {
    ticket.wrapping_mul(2)
}

#[inline(always)]
pub(crate) const fn full_marker(ticket: usize) -> usize {
    ticket.wrapping_mul(2).wrapping_add(1)
}

/// Selisih bertanda antara marker yang terbaca dan yang diharapkan.
///
/// `< 0`: slot belum sampai ke state itu, `> 0`: ticket kita sudah basi.
#[inline(always)]
pub(crate) const fn lag(observed: usize, expected: usize) -> isize {
    observed.wrapping_sub(expected) as isize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_never_collide_across_generations() {
        for capacity in [1usize, 2, 3, 4096] {
            for ticket in 0..8 {
                assert_ne!(full_marker(ticket), empty_marker(ticket + capacity));
                assert_ne!(empty_marker(ticket), full_marker(ticket));
            }
        }
    }

    #[test]
    fn test_lag_survives_wraparound() {
        let ticket = usize::MAX;
        let next = ticket.wrapping_add(1);

        assert_eq!(lag(empty_marker(next), empty_marker(ticket)), 2);
        assert_eq!(lag(full_marker(ticket), empty_marker(next)), -1);
        assert_eq!(lag(full_marker(ticket), full_marker(ticket)), 0);
    }
}
