//! Pool pricing and risk math
//!
//! Pure functions over reserve/debt quantities. Amounts are u64 raw token
//! units, intermediates widen to u128. Rates are scaled: prices by SCALE,
//! interest by basis points, risk parameters by whole percent.

use cascade_common::{isqrt, mul_div_u64, LendingError};

/// Price scaling factor (1e6)
pub const SCALE: u64 = 1_000_000;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Seconds per 365-day year, the interest rate basis
pub const SECONDS_PER_YEAR: i64 = 31_536_000;

/// Health ratio (percent) at and above which a position cannot be liquidated
pub const HEALTHY_RATIO: u64 = 100;

/// Result of quoting a liquidity deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositQuote {
    /// LP tokens to mint
    pub minted: u64,
    /// Amount of token A actually consumed
    pub used_a: u64,
    /// Amount of token B actually consumed
    pub used_b: u64,
}

/// Quote LP tokens for a deposit of (amount_a, amount_b)
///
/// First deposit seeds the pool with `isqrt(amount_a * amount_b)` LP tokens.
/// Later deposits mint `min(amount_a, amount_b)` scaled by supply/reserve and
/// consume only the proportional amounts; the excess of the non-limiting
/// asset is refunded, never debited.
pub fn lp_tokens_for_deposit(
    reserve_a: u64,
    reserve_b: u64,
    lp_supply: u64,
    amount_a: u64,
    amount_b: u64,
) -> Result<DepositQuote, LendingError> {
    if amount_a == 0 || amount_b == 0 {
        return Err(LendingError::InvalidParameters);
    }

    if lp_supply == 0 {
        let minted = isqrt((amount_a as u128) * (amount_b as u128));
        let minted = u64::try_from(minted).map_err(|_| LendingError::MathOverflow)?;
        if minted == 0 {
            return Err(LendingError::InvalidParameters);
        }
        return Ok(DepositQuote {
            minted,
            used_a: amount_a,
            used_b: amount_b,
        });
    }

    if reserve_a == 0 || reserve_b == 0 {
        return Err(LendingError::InsufficientLiquidity);
    }

    let by_a = mul_div_u64(amount_a, lp_supply, reserve_a)?;
    let by_b = mul_div_u64(amount_b, lp_supply, reserve_b)?;
    let minted = by_a.min(by_b);
    if minted == 0 {
        return Err(LendingError::InvalidParameters);
    }

    let (used_a, used_b) = if by_a <= by_b {
        // A limits: consume all of A, the matching share of B
        let need_b = mul_div_u64(amount_a, reserve_b, reserve_a)?.min(amount_b);
        (amount_a, need_b)
    } else {
        let need_a = mul_div_u64(amount_b, reserve_a, reserve_b)?.min(amount_a);
        (need_a, amount_b)
    };

    Ok(DepositQuote {
        minted,
        used_a,
        used_b,
    })
}

/// Reserve amounts returned for burning `lp_amount` LP tokens
pub fn withdraw_amounts(
    reserve_a: u64,
    reserve_b: u64,
    lp_supply: u64,
    lp_amount: u64,
) -> Result<(u64, u64), LendingError> {
    if lp_amount == 0 || lp_supply == 0 || lp_amount > lp_supply {
        return Err(LendingError::InvalidParameters);
    }
    let out_a = mul_div_u64(lp_amount, reserve_a, lp_supply)?;
    let out_b = mul_div_u64(lp_amount, reserve_b, lp_supply)?;
    Ok((out_a, out_b))
}

/// Spot exchange rate giving → wanted, scaled by SCALE
pub fn spot_rate(reserve_wanted: u64, reserve_giving: u64) -> Result<u64, LendingError> {
    if reserve_giving == 0 {
        return Err(LendingError::InsufficientLiquidity);
    }
    mul_div_u64(reserve_wanted, SCALE, reserve_giving)
}

/// Maximum total debt supported by `collateral` at the given LTV ratio
///
/// Priced against the post-trade reserve state: the wanted reserve is
/// reduced by the draw before the rate is taken, so a large borrow cannot
/// exploit its own price impact.
pub fn borrow_limit(
    collateral: u64,
    reserve_wanted: u64,
    reserve_giving: u64,
    borrow: u64,
    ltv_ratio: u8,
) -> Result<u64, LendingError> {
    if reserve_giving == 0 || borrow > reserve_wanted {
        return Err(LendingError::InsufficientLiquidity);
    }
    let post_wanted = reserve_wanted - borrow;
    let limit = (collateral as u128) * (post_wanted as u128) * (ltv_ratio as u128)
        / ((reserve_giving as u128) * 100);
    Ok(u64::try_from(limit).unwrap_or(u64::MAX))
}

/// Borrow-time protocol fee: a tenth of the annual rate applied to the draw
pub fn origination_fee(borrow: u64, interest_rate_bps: u16) -> Result<u64, LendingError> {
    let fee_bps = (interest_rate_bps / 10) as u64;
    mul_div_u64(borrow, fee_bps, BPS_SCALE)
}

/// Interest accrued on `principal` over `elapsed_secs`
///
/// The annual rate in basis points is scaled by the duration tier's
/// multiplier (whole percent of the base rate).
pub fn interest_accrued(
    principal: u64,
    interest_rate_bps: u16,
    tier_multiplier_pct: u64,
    elapsed_secs: i64,
) -> Result<u64, LendingError> {
    if principal == 0 || elapsed_secs <= 0 {
        return Ok(0);
    }
    let numerator = (principal as u128)
        * (interest_rate_bps as u128)
        * (tier_multiplier_pct as u128)
        * (elapsed_secs as u128);
    let denominator = (BPS_SCALE as u128) * 100 * (SECONDS_PER_YEAR as u128);
    u64::try_from(numerator / denominator).map_err(|_| LendingError::MathOverflow)
}

/// Health ratio in percent: collateral value scaled by the liquidation
/// threshold, over total debt
///
/// Zero-debt positions are always healthy.
pub fn health_ratio(
    collateral: u64,
    reserve_wanted: u64,
    reserve_giving: u64,
    debt: u64,
    liquidation_threshold: u8,
) -> Result<u64, LendingError> {
    if debt == 0 {
        return Ok(u64::MAX);
    }
    if reserve_giving == 0 {
        return Err(LendingError::InsufficientLiquidity);
    }
    // collateral value in wanted units, at the current spot rate
    let value = (collateral as u128) * (reserve_wanted as u128) / (reserve_giving as u128);
    let health = value * (liquidation_threshold as u128) / (debt as u128);
    Ok(u64::try_from(health).unwrap_or(u64::MAX))
}

/// Split a liquidated position's collateral into (seized, returned)
///
/// The liquidator's claim is the debt plus penalty, valued in wanted units
/// and converted to collateral units at spot, capped at what remains.
pub fn seizure_split(
    debt: u64,
    liquidation_penalty: u8,
    reserve_wanted: u64,
    reserve_giving: u64,
    collateral: u64,
) -> Result<(u64, u64), LendingError> {
    if reserve_wanted == 0 {
        return Err(LendingError::InsufficientLiquidity);
    }
    let claim_value = (debt as u128) * (100 + liquidation_penalty as u128) / 100;
    let claim_collateral = claim_value * (reserve_giving as u128) / (reserve_wanted as u128);
    let seized = u64::try_from(claim_collateral)
        .unwrap_or(u64::MAX)
        .min(collateral);
    Ok((seized, collateral - seized))
}
