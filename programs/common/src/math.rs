//! Checked arithmetic helpers for ledger mutation paths
//!
//! All ledger balances are u64 raw token units; intermediates widen to u128.
//! Helpers return `MathOverflow` instead of panicking so every instruction
//! can abort atomically.

use crate::error::LendingError;

/// Add two balances, failing on overflow
#[inline]
pub fn add_u64(a: u64, b: u64) -> Result<u64, LendingError> {
    a.checked_add(b).ok_or(LendingError::MathOverflow)
}

/// Subtract two balances, failing on underflow
#[inline]
pub fn sub_u64(a: u64, b: u64) -> Result<u64, LendingError> {
    a.checked_sub(b).ok_or(LendingError::MathOverflow)
}

/// Compute a * b / d with u128 widening, failing on overflow or d == 0
#[inline]
pub fn mul_div_u64(a: u64, b: u64, d: u64) -> Result<u64, LendingError> {
    if d == 0 {
        return Err(LendingError::MathOverflow);
    }
    let wide = (a as u128) * (b as u128) / (d as u128);
    u64::try_from(wide).map_err(|_| LendingError::MathOverflow)
}

/// Integer square root (Newton's method), rounding down
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
