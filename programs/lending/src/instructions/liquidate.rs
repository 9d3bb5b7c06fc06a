//! Forced closure of unhealthy or expired positions

use cascade_common::{borrow_account_data_mut, check_token_balance, LendingError};
use pinocchio::{account_info::AccountInfo, msg, ProgramResult};
use pinocchio_log::log;

use crate::math;
use crate::state::{BorrowPosition, LendingPool};

/// Liquidate a position whose health ratio fell below 100%, or whose loan
/// term has expired
///
/// Any signer may liquidate. The liquidator repays the full outstanding
/// debt into the pool and seizes debt-plus-penalty worth of collateral at
/// the current spot rate; whatever remains returns to the borrower.
pub fn process_liquidate(accounts: &[AccountInfo], now: i64) -> ProgramResult {
    let [pool_account, borrower_account, liquidator, liquidator_repay_token] = accounts else {
        return Err(LendingError::InvalidAccount.into());
    };

    if !liquidator.is_signer() {
        return Err(LendingError::InvalidAccount.into());
    }

    let pool = unsafe { borrow_account_data_mut::<LendingPool>(pool_account)? };
    if !pool.validate() {
        return Err(LendingError::InvalidAccount.into());
    }
    let position = unsafe { borrow_account_data_mut::<BorrowPosition>(borrower_account)? };
    if !position.validate() {
        return Err(LendingError::InvalidAccount.into());
    }
    if &position.pool != pool_account.key() || !position.is_active() {
        return Err(LendingError::NotLiquidatable.into());
    }

    position.settle(pool.interest_rate_bps, now)?;

    let side = position.side();
    let (reserve_wanted, reserve_giving) = pool.reserves_for(side);
    let debt = position.debt_total()?;
    let health = math::health_ratio(
        position.collateral,
        reserve_wanted,
        reserve_giving,
        debt,
        pool.liquidation_threshold,
    )?;

    if health >= math::HEALTHY_RATIO && !position.is_expired(now)? {
        log!("Error: position healthy at {}%", health);
        return Err(LendingError::NotLiquidatable.into());
    }

    // The liquidator must cover the debt they are repaying
    let wanted_mint = if side.collateral_is_a() {
        pool.mint_b
    } else {
        pool.mint_a
    };
    {
        let data = liquidator_repay_token.try_borrow_data()?;
        check_token_balance(&data, &wanted_mint, liquidator.key(), debt)?;
    }

    let (seized, returned) = math::seizure_split(
        debt,
        pool.liquidation_penalty,
        reserve_wanted,
        reserve_giving,
        position.collateral,
    )?;

    pool.apply_liquidation(
        side,
        position.borrowed,
        position.accrued_interest,
        seized,
        returned,
    )?;
    position.apply_liquidation();

    log!("Liquidated: {} collateral seized, {} returned", seized, returned);
    msg!("Position closed");
    Ok(())
}
