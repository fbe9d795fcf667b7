//! Protokol SPSC (Lamport Queue).
//!
//! Producer hanya menulis `tail`, consumer hanya menulis `head`. Slot
//! dipublish lewat pasangan Release/Acquire pada cursor, jadi sequence
//! marker slot tidak pernah disentuh. Wait-free, tanpa CAS.

use super::access::Spsc;
use super::ring_buffer::RingBuffer;
use crate::sync::Ordering;

#[inline(always)]
pub(crate) fn push<T, const N: usize>(ring: &RingBuffer<T, Spsc, N>, value: T) -> Result<(), T> {
    let tail = ring.tail.load(Ordering::Relaxed);
    let head = ring.head.load(Ordering::Acquire);

    // Cek apakah buffer penuh
    if tail.wrapping_sub(head) >= N {
        return Err(value);
    }

    // SAFETY: hanya satu producer, dan consumer sudah selesai membaca slot
    // ini (Acquire pada head di atas)
    unsafe { ring.slot(tail).write(value) };

    // Release: write di atas visible sebelum tail di-update
    ring.tail.store(tail.wrapping_add(1), Ordering::Release);

    Ok(())
}

#[inline(always)]
pub(crate) fn pop<T, const N: usize>(ring: &RingBuffer<T, Spsc, N>) -> Option<T> {
    let head = ring.head.load(Ordering::Relaxed);
    let tail = ring.tail.load(Ordering::Acquire);

    // Cek apakah buffer kosong
    if head == tail {
        return None;
    }

    // SAFETY: slot sudah ditulis (Acquire pada tail) dan producer tidak akan
    // menyentuhnya sampai head maju
    let value = unsafe { ring.slot(head).read() };

    // Release: read di atas selesai sebelum slot boleh ditimpa producer
    ring.head.store(head.wrapping_add(1), Ordering::Release);

    Some(value)
}
