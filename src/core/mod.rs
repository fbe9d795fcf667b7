//! Core module: Lock-Free / Wait-Free Ring Buffer
//!
//! Prinsip desain:
//! - Lock-Free: hanya atomic operations, tidak ada Mutex/RwLock
//! - No-Allocation: semua slot pre-allocated saat init
//! - Compile-time config: arity producer/consumer dipilih lewat tipe
//! - Cache-aware: cursor dan slot di-pad ke cache line masing-masing

mod access;
mod cache_padded;
mod handle;
mod lamport;
mod ring_buffer;
mod sequenced;
mod slot;

pub use access::{Access, Arity, Mpmc, Mpsc, Multi, Single, Spmc, Spsc};
pub use cache_padded::{detected_cache_line_size, CachePadded, DESTRUCTIVE_INTERFERENCE_SIZE};
pub use handle::{Consumer, Producer};
pub use ring_buffer::{
    Full, MpmcRingBuffer, MpscRingBuffer, RingBuffer, SpmcRingBuffer, SpscRingBuffer,
};
