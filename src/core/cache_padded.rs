//! Cache-Line Padding
//!
//! `CachePadded<T>` membulatkan alignment dan ukuran `T` ke granularitas
//! cache line target, sehingga dua instance yang bersebelahan (elemen array
//! atau field struct) tidak pernah berbagi cache line.
//!
//! Ukuran cache line diambil dari `target_arch` saat compile. Arsitektur yang
//! tidak dikenal memakai fallback 64 bytes.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// Jarak minimum (bytes) agar dua objek dijamin tidak berbagi cache line.
///
/// - 128: aarch64 dan powerpc64 (big core Apple/IBM, prefetch berpasangan)
/// - 256: s390x
/// - 32: arm, mips, mips64, sparc, hexagon
/// - 64: x86, x86_64, riscv64 dan semua target lain (fallback)
#[cfg(any(target_arch = "aarch64", target_arch = "powerpc64"))]
pub const DESTRUCTIVE_INTERFERENCE_SIZE: usize = 128;
#[cfg(target_arch = "s390x")]
pub const DESTRUCTIVE_INTERFERENCE_SIZE: usize = 256;
#[cfg(any(
    target_arch = "arm",
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "sparc",
    target_arch = "hexagon",
))]
pub const DESTRUCTIVE_INTERFERENCE_SIZE: usize = 32;
#[cfg(not(any(
    target_arch = "aarch64",
    target_arch = "powerpc64",
    target_arch = "s390x",
    target_arch = "arm",
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "sparc",
    target_arch = "hexagon",
)))]
pub const DESTRUCTIVE_INTERFERENCE_SIZE: usize = 64;

/// Wrapper yang mengisolasi `T` di cache line sendiri.
///
/// Alignment = `max(align_of::<T>(), DESTRUCTIVE_INTERFERENCE_SIZE)`,
/// ukuran = `size_of::<T>()` dibulatkan ke kelipatan alignment tersebut.
#[cfg_attr(
    any(target_arch = "aarch64", target_arch = "powerpc64"),
    repr(C, align(128))
)]
#[cfg_attr(target_arch = "s390x", repr(C, align(256)))]
#[cfg_attr(
    any(
        target_arch = "arm",
        target_arch = "mips",
        target_arch = "mips64",
        target_arch = "sparc",
        target_arch = "hexagon",
    ),
    repr(C, align(32))
)]
#[cfg_attr(
    not(any(
        target_arch = "aarch64",
        target_arch = "powerpc64",
        target_arch = "s390x",
        target_arch = "arm",
        target_arch = "mips",
        target_arch = "mips64",
        target_arch = "sparc",
        target_arch = "hexagon",
    )),
    repr(C, align(64))
)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CachePadded<T> {
    value: T,
}

// repr(align) dan konstanta harus selalu sinkron
const _: () = assert!(std::mem::align_of::<CachePadded<u8>>() == DESTRUCTIVE_INTERFERENCE_SIZE);

impl<T> CachePadded<T> {
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    #[inline(always)]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for CachePadded<T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for CachePadded<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> From<T> for CachePadded<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for CachePadded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePadded")
            .field("value", &self.value)
            .finish()
    }
}

/// Ukuran L1 data cache line yang dilaporkan OS, jika bisa dideteksi.
///
/// Hanya untuk diagnosa: layout engine tetap memakai
/// [`DESTRUCTIVE_INTERFERENCE_SIZE`] yang ditentukan saat compile.
pub fn detected_cache_line_size() -> Option<usize> {
    detect::cache_line_size()
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
mod detect {
    pub(super) fn cache_line_size() -> Option<usize> {
        // SAFETY: sysconf tidak menyentuh memori milik kita
        let size = unsafe { libc::sysconf(libc::_SC_LEVEL1_DCACHE_LINESIZE) };
        (size > 0).then_some(size as usize)
    }
}

#[cfg(target_os = "macos")]
mod detect {
    pub(super) fn cache_line_size() -> Option<usize> {
        let mut size: i64 = 0;
        let mut len = std::mem::size_of::<i64>() as libc::size_t;
        let name = b"hw.cachelinesize\0";

        // SAFETY: name null-terminated, buffer output cukup untuk i64
        let rc = unsafe {
            libc::sysctlbyname(
                name.as_ptr() as *const libc::c_char,
                &mut size as *mut i64 as *mut libc::c_void,
                &mut len,
                std::ptr::null_mut(),
                0,
            )
        };

        (rc == 0 && size > 0).then_some(size as usize)
    }
}

#[cfg(not(any(all(target_os = "linux", target_env = "gnu"), target_os = "macos")))]
mod detect {
    pub(super) fn cache_line_size() -> Option<usize> {
        None
    }
}
