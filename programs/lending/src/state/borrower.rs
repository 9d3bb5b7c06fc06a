//! Borrower position and lazy interest settlement

use cascade_common::{add_u64, sub_u64, LendingError};
use pinocchio::pubkey::Pubkey;

use crate::math;
use crate::state::BorrowSide;

/// Loan duration tiers, each with its own interest multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BorrowDuration {
    Days10 = 0,
    Days20 = 1,
    Days30 = 2,
}

impl BorrowDuration {
    pub fn from_u8(value: u8) -> Result<Self, LendingError> {
        match value {
            0 => Ok(BorrowDuration::Days10),
            1 => Ok(BorrowDuration::Days20),
            2 => Ok(BorrowDuration::Days30),
            _ => Err(LendingError::InvalidDuration),
        }
    }

    /// Loan term in seconds
    pub fn seconds(&self) -> i64 {
        match self {
            BorrowDuration::Days10 => 10 * 86_400,
            BorrowDuration::Days20 => 20 * 86_400,
            BorrowDuration::Days30 => 30 * 86_400,
        }
    }

    /// Interest multiplier as a whole percent of the base rate; longer
    /// terms pay up for the extended reserve lockup
    pub fn rate_multiplier_pct(&self) -> u64 {
        match self {
            BorrowDuration::Days10 => 100,
            BorrowDuration::Days20 => 110,
            BorrowDuration::Days30 => 125,
        }
    }
}

/// Lifecycle of a borrow position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PositionStatus {
    Uninitialized = 0,
    Active = 1,
    Repaid = 2,
    Liquidated = 3,
}

impl PositionStatus {
    pub fn from_u8(value: u8) -> Result<Self, LendingError> {
        match value {
            0 => Ok(PositionStatus::Uninitialized),
            1 => Ok(PositionStatus::Active),
            2 => Ok(PositionStatus::Repaid),
            3 => Ok(PositionStatus::Liquidated),
            _ => Err(LendingError::InvalidAccount),
        }
    }
}

/// Borrower position account
/// PDA: ["borrower_account", borrower]
///
/// One position per borrower; a closed position (Repaid or Liquidated) is
/// reopened by the next borrow.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BorrowPosition {
    /// Magic bytes for validation
    pub magic: [u8; 8],
    /// Layout version (=1)
    pub version: u32,
    /// Padding
    pub _padding0: u32,

    /// Borrower identity
    pub borrower: Pubkey,
    /// Pool borrowed from
    pub pool: Pubkey,

    /// Posted collateral, giving-mint units
    pub collateral: u64,
    /// Borrowed principal, wanted-mint units
    pub borrowed: u64,
    /// Interest settled so far, wanted-mint units
    pub accrued_interest: u64,
    /// Timestamp of the first draw of the current loan
    pub borrowed_at: i64,
    /// Timestamp interest was last settled to
    pub last_accrual_ts: i64,

    /// BorrowDuration discriminant
    pub duration: u8,
    /// PositionStatus discriminant
    pub status: u8,
    /// 1 when the posted collateral is the pool's mint A
    pub collateral_is_a: u8,
    /// PDA bump seed
    pub bump: u8,
    /// Padding
    pub _padding: [u8; 4],
}

impl BorrowPosition {
    pub const MAGIC: &'static [u8; 8] = b"CASCBRRW";
    pub const VERSION: u32 = 1;
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// PDA seed prefix
    pub const SEED: &'static [u8] = b"borrower_account";

    /// Initialize borrower fields in place with an empty position
    pub fn initialize_in_place(&mut self, borrower: Pubkey, bump: u8) {
        self.magic = *Self::MAGIC;
        self.version = Self::VERSION;
        self._padding0 = 0;
        self.borrower = borrower;
        self.pool = [0u8; 32];
        self.collateral = 0;
        self.borrowed = 0;
        self.accrued_interest = 0;
        self.borrowed_at = 0;
        self.last_accrual_ts = 0;
        self.duration = BorrowDuration::Days10 as u8;
        self.status = PositionStatus::Uninitialized as u8;
        self.collateral_is_a = 0;
        self.bump = bump;
        self._padding = [0; 4];
    }

    /// Validate magic and version
    pub fn validate(&self) -> bool {
        &self.magic == Self::MAGIC && self.version == Self::VERSION
    }

    pub fn status(&self) -> Result<PositionStatus, LendingError> {
        PositionStatus::from_u8(self.status)
    }

    pub fn is_active(&self) -> bool {
        self.status == PositionStatus::Active as u8
    }

    pub fn duration(&self) -> Result<BorrowDuration, LendingError> {
        BorrowDuration::from_u8(self.duration)
    }

    /// Side of the pool this position draws from
    pub fn side(&self) -> BorrowSide {
        if self.collateral_is_a == 1 {
            BorrowSide::WantedB
        } else {
            BorrowSide::WantedA
        }
    }

    /// Outstanding debt: principal plus settled interest
    pub fn debt_total(&self) -> Result<u64, LendingError> {
        add_u64(self.borrowed, self.accrued_interest)
    }

    /// True once the loan term has elapsed
    pub fn is_expired(&self, now: i64) -> Result<bool, LendingError> {
        if !self.is_active() {
            return Ok(false);
        }
        Ok(now > self.borrowed_at.saturating_add(self.duration()?.seconds()))
    }

    /// Settle interest accrued since the last touch, returning the newly
    /// accrued amount
    ///
    /// Must run before any mutation of the position; simple (non-compound)
    /// interest on the outstanding principal.
    pub fn settle(&mut self, interest_rate_bps: u16, now: i64) -> Result<u64, LendingError> {
        if !self.is_active() || self.borrowed == 0 {
            self.last_accrual_ts = now;
            return Ok(0);
        }
        let elapsed = now.saturating_sub(self.last_accrual_ts);
        let accrued = math::interest_accrued(
            self.borrowed,
            interest_rate_bps,
            self.duration()?.rate_multiplier_pct(),
            elapsed,
        )?;
        self.accrued_interest = add_u64(self.accrued_interest, accrued)?;
        self.last_accrual_ts = now;
        Ok(accrued)
    }

    /// Open the position, or add to an Active one on the same side
    pub fn apply_borrow(
        &mut self,
        pool: &Pubkey,
        side: BorrowSide,
        collateral: u64,
        borrow: u64,
        duration: BorrowDuration,
        now: i64,
    ) -> Result<(), LendingError> {
        if self.is_active() {
            if self.side() != side || &self.pool != pool {
                return Err(LendingError::MintMismatch);
            }
        } else {
            // Reopening a closed position starts a fresh loan
            self.pool = *pool;
            self.collateral = 0;
            self.borrowed = 0;
            self.accrued_interest = 0;
            self.borrowed_at = now;
            self.last_accrual_ts = now;
            self.duration = duration as u8;
            self.collateral_is_a = if side.collateral_is_a() { 1 } else { 0 };
            self.status = PositionStatus::Active as u8;
        }
        self.collateral = add_u64(self.collateral, collateral)?;
        self.borrowed = add_u64(self.borrowed, borrow)?;
        Ok(())
    }

    /// Apply a repayment split; closes the position when the debt clears
    ///
    /// Returns the collateral to release (zero unless fully repaid).
    pub fn apply_repay(&mut self, interest: u64, principal: u64) -> Result<u64, LendingError> {
        self.accrued_interest = sub_u64(self.accrued_interest, interest)?;
        self.borrowed = sub_u64(self.borrowed, principal)?;
        if self.debt_total()? == 0 {
            let released = self.collateral;
            self.collateral = 0;
            self.status = PositionStatus::Repaid as u8;
            return Ok(released);
        }
        Ok(0)
    }

    /// Close the position as liquidated, clearing debt and collateral
    pub fn apply_liquidation(&mut self) {
        self.collateral = 0;
        self.borrowed = 0;
        self.accrued_interest = 0;
        self.status = PositionStatus::Liquidated as u8;
    }
}
