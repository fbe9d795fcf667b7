//! Konfigurasi akses compile-time: SPSC, MPSC, SPMC, MPMC.
//!
//! Setiap marker memilih protokol claim untuk sisi producer dan consumer
//! saat monomorphization, jadi tidak ada branch runtime pada arity dan sisi
//! single tidak pernah menyentuh CAS.

use super::lamport;
use super::ring_buffer::RingBuffer;
use super::sequenced;

mod sealed {
    pub trait Sealed {}
}

/// Jumlah thread yang boleh memegang satu peran (producer atau consumer).
pub trait Arity: sealed::Sealed + Send + Sync + 'static {
    const IS_MULTI: bool;
}

/// Tepat satu thread pada peran ini. Operasinya wait-free.
#[derive(Debug, Clone, Copy)]
pub enum Single {}

/// Banyak thread pada peran ini. Operasinya lock-free.
#[derive(Debug, Clone, Copy)]
pub enum Multi {}

impl sealed::Sealed for Single {}
impl sealed::Sealed for Multi {}

impl Arity for Single {
    const IS_MULTI: bool = false;
}

impl Arity for Multi {
    const IS_MULTI: bool = true;
}

/// Kombinasi arity producer/consumer beserta protokol push/pop-nya.
///
/// Trait ini sealed. Pakai salah satu dari [`Spsc`], [`Mpsc`], [`Spmc`],
/// [`Mpmc`].
pub trait Access: sealed::Sealed + Sized + Send + Sync + 'static {
    type Producer: Arity;
    type Consumer: Arity;

    /// Nama pendek untuk log dan output benchmark.
    const NAME: &'static str;

    #[doc(hidden)]
    fn try_push<T, const N: usize>(ring: &RingBuffer<T, Self, N>, value: T) -> Result<(), T>;

    #[doc(hidden)]
    fn pop<T, const N: usize>(ring: &RingBuffer<T, Self, N>) -> Option<T>;
}

/// Single producer, single consumer (Lamport queue).
#[derive(Debug, Clone, Copy)]
pub enum Spsc {}

/// Multi producer, single consumer.
#[derive(Debug, Clone, Copy)]
pub enum Mpsc {}

/// Single producer, multi consumer.
#[derive(Debug, Clone, Copy)]
pub enum Spmc {}

/// Multi producer, multi consumer.
#[derive(Debug, Clone, Copy)]
pub enum Mpmc {}

impl sealed::Sealed for Spsc {}
impl sealed::Sealed for Mpsc {}
impl sealed::Sealed for Spmc {}
impl sealed::Sealed for Mpmc {}

impl Access for Spsc {
    type Producer = Single;
    type Consumer = Single;
    const NAME: &'static str = "spsc";

    #[inline(always)]
    fn try_push<T, const N: usize>(ring: &RingBuffer<T, Self, N>, value: T) -> Result<(), T> {
        lamport::push(ring, value)
    }

    #[inline(always)]
    fn pop<T, const N: usize>(ring: &RingBuffer<T, Self, N>) -> Option<T> {
        lamport::pop(ring)
    }
}

impl Access for Mpsc {
    type Producer = Multi;
    type Consumer = Single;
    const NAME: &'static str = "mpsc";

    #[inline(always)]
    fn try_push<T, const N: usize>(ring: &RingBuffer<T, Self, N>, value: T) -> Result<(), T> {
        sequenced::push_multi(ring, value)
    }

    #[inline(always)]
    fn pop<T, const N: usize>(ring: &RingBuffer<T, Self, N>) -> Option<T> {
        sequenced::pop_single(ring)
    }
}

impl Access for Spmc {
    type Producer = Single;
    type Consumer = Multi;
    const NAME: &'static str = "spmc";

    #[inline(always)]
    fn try_push<T, const N: usize>(ring: &RingBuffer<T, Self, N>, value: T) -> Result<(), T> {
        sequenced::push_single(ring, value)
    }

    #[inline(always)]
    fn pop<T, const N: usize>(ring: &RingBuffer<T, Self, N>) -> Option<T> {
        sequenced::pop_multi(ring)
    }
}

impl Access for Mpmc {
    type Producer = Multi;
    type Consumer = Multi;
    const NAME: &'static str = "mpmc";

    #[inline(always)]
    fn try_push<T, const N: usize>(ring: &RingBuffer<T, Self, N>, value: T) -> Result<(), T> {
        sequenced::push_multi(ring, value)
    }

    #[inline(always)]
    fn pop<T, const N: usize>(ring: &RingBuffer<T, Self, N>) -> Option<T> {
        sequenced::pop_multi(ring)
    }
}
