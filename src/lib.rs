//! waitfree-ring - Fixed-Capacity Concurrent Ring Buffer
//!
//! Arsitektur:
//! - SPSC: Lamport queue, wait-free di kedua sisi
//! - MPSC / SPMC / MPMC: sequence per-slot, wait-free di sisi single,
//!   lock-free di sisi multi
//! - Penuh/kosong adalah sinyal backpressure biasa (`false` / `None`),
//!   bukan error
//!
//! ```
//! use waitfree_ring::core::MpmcRingBuffer;
//!
//! let ring: MpmcRingBuffer<u64, 4> = MpmcRingBuffer::new();
//! assert!(ring.push(1));
//! assert_eq!(ring.pop(), Some(1));
//! assert_eq!(ring.pop(), None);
//! ```

pub mod core;
mod sync;
mod trace;

pub use crate::core::{
    Access, CachePadded, Consumer, Full, Mpmc, MpmcRingBuffer, Mpsc, MpscRingBuffer, Producer,
    RingBuffer, Spmc, SpmcRingBuffer, Spsc, SpscRingBuffer,
};
pub use trace::init_tracing;
