//! Cascade lending - two-asset liquidity pool with over-collateralized borrowing
//!
//! A single program owns three account kinds:
//! - `LendingPool`: reserves, fee vaults, collateral ledgers, risk parameters
//! - `ProviderPosition`: per-provider deposit ledger and LP-share claim
//! - `BorrowPosition`: per-borrower collateral, debt, and accrued interest
//!
//! Borrow limits are evaluated against post-trade reserve state, interest is
//! settled lazily at every touch, and liquidation is health- or expiry-based.

#![allow(clippy::arithmetic_side_effects)]

pub mod entrypoint;
pub mod instructions;
pub mod math;
pub mod state;

pub use state::*;

pinocchio_pubkey::declare_id!("3cPUnTmHcQtpLQKTE9cVJUZuc7WEovqvFh1H1Sfd1hSZ");
