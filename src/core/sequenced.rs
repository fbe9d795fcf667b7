//! Protokol berbasis sequence per-slot untuk MPSC, SPMC dan MPMC.
//!
//! Sisi multi meng-claim ticket dengan CAS pada cursor, dan CAS hanya dicoba
//! jika slot sudah dalam state yang diharapkan ticket tersebut. Akibatnya
//! reservasi melewati `head + N` tidak pernah terjadi: push pada ring penuh
//! langsung `Err`, tanpa side effect.
//!
//! Sisi single cukup load + store karena cursor-nya hanya ditulis satu
//! thread. Sisi single tidak pernah spin, sisi multi hanya spin selama
//! generasi sebelumnya dari slot yang sama sedang diselesaikan.

use super::access::Access;
use super::ring_buffer::RingBuffer;
use super::slot::{empty_marker, full_marker, lag};
use crate::sync::{Ordering, Spin};

/// Push untuk producer tunggal (SPMC). Wait-free.
#[inline(always)]
pub(crate) fn push_single<T, A: Access, const N: usize>(
    ring: &RingBuffer<T, A, N>,
    value: T,
) -> Result<(), T> {
    let tail = ring.tail.load(Ordering::Relaxed);
    let slot = ring.slot(tail);

    // Slot belum dikosongkan consumer generasi sebelumnya -> penuh
    if slot.sequence.load(Ordering::Acquire) != empty_marker(tail) {
        return Err(value);
    }

    // SAFETY: hanya satu producer, dan marker EMPTY untuk ticket kita
    unsafe { slot.write(value) };
    slot.sequence.store(full_marker(tail), Ordering::Release);
    ring.tail.store(tail.wrapping_add(1), Ordering::Release);

    Ok(())
}

/// Push untuk banyak producer (MPSC, MPMC). Lock-free.
#[inline(always)]
pub(crate) fn push_multi<T, A: Access, const N: usize>(
    ring: &RingBuffer<T, A, N>,
    value: T,
) -> Result<(), T> {
    let spin = Spin::new();
    let mut tail = ring.tail.load(Ordering::Relaxed);

    loop {
        let slot = ring.slot(tail);
        let diff = lag(slot.sequence.load(Ordering::Acquire), empty_marker(tail));

        if diff == 0 {
            // Slot kosong untuk ticket ini, rebut ticket-nya
            match ring.tail.compare_exchange_weak(
                tail,
                tail.wrapping_add(1),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    // SAFETY: CAS sukses = ticket unik milik kita, slot EMPTY
                    unsafe { slot.write(value) };
                    slot.sequence.store(full_marker(tail), Ordering::Release);
                    return Ok(());
                }
                Err(current) => tail = current,
            }
        } else if diff < 0 {
            // Slot masih dipegang generasi tail - N
            let head = ring.head.load(Ordering::Acquire);
            let claimed = lag(tail, head);
            if claimed >= N as isize {
                return Err(value);
            }

            // Negatif: tail basi, head sudah lewat. Selain itu consumer
            // generasi sebelumnya sudah claim dan sedang membaca
            if claimed >= 0 {
                spin.snooze();
            }
            tail = ring.tail.load(Ordering::Relaxed);
        } else {
            // Producer lain sudah mengambil ticket ini
            tail = ring.tail.load(Ordering::Relaxed);
        }
    }
}

/// Pop untuk consumer tunggal (MPSC). Wait-free.
#[inline(always)]
pub(crate) fn pop_single<T, A: Access, const N: usize>(ring: &RingBuffer<T, A, N>) -> Option<T> {
    let head = ring.head.load(Ordering::Relaxed);
    let slot = ring.slot(head);

    // Kosong, atau producer pemegang ticket ini belum selesai menulis
    if slot.sequence.load(Ordering::Acquire) != full_marker(head) {
        return None;
    }

    // SAFETY: hanya satu consumer, dan marker FULL untuk ticket kita
    let value = unsafe { slot.read() };
    slot.sequence
        .store(empty_marker(head.wrapping_add(N)), Ordering::Release);
    ring.head.store(head.wrapping_add(1), Ordering::Release);

    Some(value)
}

/// Pop untuk banyak consumer (SPMC, MPMC). Lock-free.
#[inline(always)]
pub(crate) fn pop_multi<T, A: Access, const N: usize>(ring: &RingBuffer<T, A, N>) -> Option<T> {
    let spin = Spin::new();
    let mut head = ring.head.load(Ordering::Relaxed);

    loop {
        let slot = ring.slot(head);
        let diff = lag(slot.sequence.load(Ordering::Acquire), full_marker(head));

        if diff == 0 {
            match ring.head.compare_exchange_weak(
                head,
                head.wrapping_add(1),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    // SAFETY: CAS sukses = ticket unik milik kita, slot FULL
                    let value = unsafe { slot.read() };
                    slot.sequence
                        .store(empty_marker(head.wrapping_add(N)), Ordering::Release);
                    return Some(value);
                }
                Err(current) => head = current,
            }
        } else if diff < 0 {
            // Belum FULL. Kosong, kecuali producer sudah claim ticket ini
            let tail = ring.tail.load(Ordering::Acquire);
            if lag(tail, head) <= 0 {
                return None;
            }

            // Producer pemegang ticket ini sedang menulis
            spin.snooze();
            head = ring.head.load(Ordering::Relaxed);
        } else {
            // Consumer lain sudah mengambil ticket ini
            head = ring.head.load(Ordering::Relaxed);
        }
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::super::access::{Mpmc, Mpsc};
    use super::*;

    #[test]
    fn test_claimed_count_tolerates_stale_tail() {
        // head sudah melewati tail yang terbaca: bukan penuh
        assert!(lag(5, 6) < 4);
        assert!(lag(usize::MAX, 1) < 0);
        // Penuh tepat di kapasitas, termasuk saat cursor wrap
        assert!(lag(10, 6) >= 4);
        assert!(lag(2, usize::MAX - 1) >= 4);
        assert!(lag(1, usize::MAX - 1) < 4);
    }

    #[test]
    fn test_push_multi_rejects_only_when_full() {
        let rb: RingBuffer<u32, Mpsc, 3> = RingBuffer::new();
        for i in 0..3 {
            assert_eq!(push_multi(&rb, i), Ok(()));
        }
        assert_eq!(push_multi(&rb, 9), Err(9));

        assert_eq!(pop_single(&rb), Some(0));
        assert_eq!(push_multi(&rb, 3), Ok(()));
        assert_eq!(push_multi(&rb, 9), Err(9));
    }

    #[test]
    fn test_pop_multi_reports_empty_after_drain() {
        let rb: RingBuffer<u32, Mpmc, 2> = RingBuffer::new();
        assert_eq!(pop_multi(&rb), None);

        for round in 0..5 {
            assert_eq!(push_multi(&rb, round), Ok(()));
            assert_eq!(pop_multi(&rb), Some(round));
            assert_eq!(pop_multi(&rb), None);
        }
    }
}
