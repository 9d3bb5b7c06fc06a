//! Off-chain health calculation for borrow positions
//!
//! Mirrors the on-chain account layouts by byte offset and projects pending
//! interest to the current time, so a position can be queued for
//! liquidation before the program itself settles it.

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Account layout constants (must match the program's #[repr(C)] structs)
pub const POOL_LEN: usize = 368;
pub const POSITION_LEN: usize = 128;

const POOL_MAGIC: &[u8; 8] = b"CASCPOOL";
const POSITION_MAGIC: &[u8; 8] = b"CASCBRRW";

const BPS_SCALE: u128 = 10_000;
const SECONDS_PER_YEAR: u128 = 31_536_000;

/// Health ratio below which a position is liquidatable
pub const HEALTHY_RATIO: u64 = 100;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("account data too small: {0} bytes")]
    TooSmall(usize),
    #[error("bad magic bytes")]
    BadMagic,
}

/// Pool state (simplified mirror of on-chain state)
#[derive(Debug, Clone)]
pub struct PoolState {
    pub authority: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub reserve_a: u64,
    pub reserve_b: u64,
    pub ltv_ratio: u8,
    pub liquidation_threshold: u8,
    pub liquidation_penalty: u8,
    pub interest_rate_bps: u16,
}

/// Borrow position state (simplified mirror of on-chain state)
#[derive(Debug, Clone)]
pub struct PositionState {
    pub borrower: Pubkey,
    pub pool: Pubkey,
    pub collateral: u64,
    pub borrowed: u64,
    pub accrued_interest: u64,
    pub borrowed_at: i64,
    pub last_accrual_ts: i64,
    pub duration: u8,
    pub status: u8,
    pub collateral_is_a: bool,
}

impl PositionState {
    /// Active status discriminant
    pub const STATUS_ACTIVE: u8 = 1;

    pub fn is_active(&self) -> bool {
        self.status == Self::STATUS_ACTIVE
    }

    /// The mint this position's debt is denominated in
    pub fn wanted_mint(&self, pool: &PoolState) -> Pubkey {
        if self.collateral_is_a {
            pool.mint_b
        } else {
            pool.mint_a
        }
    }

    /// Loan term in seconds for the position's duration tier
    pub fn term_seconds(&self) -> i64 {
        match self.duration {
            0 => 10 * 86_400,
            1 => 20 * 86_400,
            _ => 30 * 86_400,
        }
    }

    /// Interest multiplier (percent of base rate) for the duration tier
    pub fn rate_multiplier_pct(&self) -> u128 {
        match self.duration {
            0 => 100,
            1 => 110,
            _ => 125,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.is_active() && now > self.borrowed_at.saturating_add(self.term_seconds())
    }
}

fn read_pubkey(data: &[u8], offset: usize) -> Pubkey {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&data[offset..offset + 32]);
    Pubkey::new_from_array(bytes)
}

fn read_u64(data: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(data[offset..offset + 8].try_into().unwrap())
}

fn read_i64(data: &[u8], offset: usize) -> i64 {
    i64::from_le_bytes(data[offset..offset + 8].try_into().unwrap())
}

/// Parse a LendingPool account
pub fn parse_pool(data: &[u8]) -> Result<PoolState, ParseError> {
    if data.len() < POOL_LEN {
        return Err(ParseError::TooSmall(data.len()));
    }
    if &data[0..8] != POOL_MAGIC {
        return Err(ParseError::BadMagic);
    }
    Ok(PoolState {
        authority: read_pubkey(data, 16),
        mint_a: read_pubkey(data, 48),
        mint_b: read_pubkey(data, 80),
        reserve_a: read_u64(data, 272),
        reserve_b: read_u64(data, 280),
        ltv_ratio: data[360],
        liquidation_threshold: data[361],
        liquidation_penalty: data[362],
        interest_rate_bps: u16::from_le_bytes(data[364..366].try_into().unwrap()),
    })
}

/// Parse a BorrowPosition account
pub fn parse_position(data: &[u8]) -> Result<PositionState, ParseError> {
    if data.len() < POSITION_LEN {
        return Err(ParseError::TooSmall(data.len()));
    }
    if &data[0..8] != POSITION_MAGIC {
        return Err(ParseError::BadMagic);
    }
    Ok(PositionState {
        borrower: read_pubkey(data, 16),
        pool: read_pubkey(data, 48),
        collateral: read_u64(data, 80),
        borrowed: read_u64(data, 88),
        accrued_interest: read_u64(data, 96),
        borrowed_at: read_i64(data, 104),
        last_accrual_ts: read_i64(data, 112),
        duration: data[120],
        status: data[121],
        collateral_is_a: data[122] == 1,
    })
}

/// Debt projected to `now`, including interest the program has not yet
/// settled
pub fn projected_debt(position: &PositionState, pool: &PoolState, now: i64) -> u64 {
    let settled = position.borrowed.saturating_add(position.accrued_interest);
    let elapsed = now.saturating_sub(position.last_accrual_ts);
    if position.borrowed == 0 || elapsed <= 0 {
        return settled;
    }
    let pending = (position.borrowed as u128)
        * (pool.interest_rate_bps as u128)
        * position.rate_multiplier_pct()
        * (elapsed as u128)
        / (BPS_SCALE * 100 * SECONDS_PER_YEAR);
    settled.saturating_add(pending.min(u64::MAX as u128) as u64)
}

/// Health ratio in percent, mirroring the on-chain formula
///
/// Returns u64::MAX for zero-debt positions (always healthy).
pub fn calculate_health(position: &PositionState, pool: &PoolState, now: i64) -> u64 {
    let debt = projected_debt(position, pool, now);
    if debt == 0 {
        return u64::MAX;
    }
    let (reserve_wanted, reserve_giving) = if position.collateral_is_a {
        (pool.reserve_b, pool.reserve_a)
    } else {
        (pool.reserve_a, pool.reserve_b)
    };
    if reserve_giving == 0 {
        return u64::MAX;
    }
    let value = (position.collateral as u128) * (reserve_wanted as u128) / (reserve_giving as u128);
    let health = value * (pool.liquidation_threshold as u128) / (debt as u128);
    health.min(u64::MAX as u128) as u64
}
