//! Primitive sinkronisasi yang bisa ditukar ke `loom` untuk model checking.
//!
//! Semua atomic di engine diambil dari sini, jadi `--features loom` cukup
//! untuk menjalankan protokol yang sama di bawah scheduler loom.

#[cfg(feature = "loom")]
pub(crate) use loom::sync::atomic::{AtomicUsize, Ordering};
#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::atomic::{AtomicUsize, Ordering};

/// Spin terbatas untuk menunggu generasi sebelumnya dari slot yang sama selesai.
///
/// Hanya dipakai oleh sisi multi (producer/consumer yang berebut ticket).
pub(crate) struct Spin {
    #[cfg(not(feature = "loom"))]
    backoff: crossbeam_utils::Backoff,
}

impl Spin {
    #[inline(always)]
    pub(crate) fn new() -> Self {
        Self {
            #[cfg(not(feature = "loom"))]
            backoff: crossbeam_utils::Backoff::new(),
        }
    }

    #[inline(always)]
    pub(crate) fn snooze(&self) {
        #[cfg(not(feature = "loom"))]
        self.backoff.snooze();

        // loom harus diberi tahu bahwa thread ini menunggu thread lain
        #[cfg(feature = "loom")]
        loom::thread::yield_now();
    }
}
