//! Program error codes shared across the workspace

use pinocchio::program_error::ProgramError;

/// Errors returned by the lending program
///
/// Every failure aborts the whole instruction before any ledger field is
/// written; callers receive the specific kind as a custom program error.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LendingError {
    /// Instruction data missing, malformed, or unknown discriminator
    InvalidInstruction = 0,
    /// Account missing, wrong size, wrong PDA, or not a signer
    InvalidAccount = 1,
    /// Risk-parameter ordering invariant violated, or zero/identical inputs
    InvalidParameters = 2,
    /// Caller is not the recorded pool authority
    Unauthorized = 3,
    /// Account already carries initialized state
    AlreadyExists = 4,
    /// A token account cannot cover the requested amount
    InsufficientBalance = 5,
    /// Reserve would be drained below the minimum liquidity floor
    InsufficientLiquidity = 6,
    /// Supplied mint pair does not match the pool's mints
    MintMismatch = 7,
    /// Requested borrow exceeds the collateral-derived limit
    ExceedsLtv = 8,
    /// Position is healthy and the loan has not expired
    NotLiquidatable = 9,
    /// Unknown borrow duration tier
    InvalidDuration = 10,
    /// Repayment of zero, or more than the outstanding debt
    InvalidRepayAmount = 11,
    /// Arithmetic overflow or division by zero
    MathOverflow = 12,
}

impl From<LendingError> for ProgramError {
    fn from(e: LendingError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
