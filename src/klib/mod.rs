//! Kernel Library (KLib).
//!
//! Utilitários agnósticos de hardware usados pelo driver.

pub mod test_framework;

/// Verifica se dois intervalos `[a, a+a_len)` e `[b, b+b_len)` se sobrepõem.
#[inline]
pub const fn ranges_overlap(a: u64, a_len: u64, b: u64, b_len: u64) -> bool {
    a < b.saturating_add(b_len) && b < a.saturating_add(a_len)
}
