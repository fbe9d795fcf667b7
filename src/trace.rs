//! Infrastruktur tracing untuk debugging ring buffer.
//!
//! Aktif dengan `--features tracing`. Tanpa feature itu semua macro di bawah
//! menjadi no-op, jadi tidak ada overhead sama sekali di hot path.

/// Inisialisasi subscriber tracing dengan timestamp uptime.
///
/// Panggil di awal binary atau test. Tidak melakukan apa-apa jika feature
/// `tracing` tidak aktif.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("waitfree_ring=debug"));

    // try_init: aman dipanggil berkali-kali dari beberapa test
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() {}

#[cfg(feature = "tracing")]
pub(crate) use tracing::debug;

#[cfg(not(feature = "tracing"))]
macro_rules! debug_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use debug_noop as debug;
