//! Collateralized borrowing

use cascade_common::{
    add_u64, borrow_account_data_mut, check_token_balance, sub_u64, LendingError,
};
use pinocchio::{
    account_info::AccountInfo,
    msg,
    pubkey::{find_program_address, Pubkey},
    ProgramResult,
};
use pinocchio_log::log;

use crate::math;
use crate::state::{BorrowDuration, BorrowPosition, LendingPool};

/// Post collateral of one pool asset and draw the other
///
/// The limit is evaluated against the post-trade reserve state, so a large
/// draw cannot exploit its own price impact. An origination fee is diverted
/// to the fee vault at borrow time; accrued interest on an existing
/// position is settled first.
#[allow(clippy::too_many_arguments)]
pub fn process_borrow_funds(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    wanted_mint: Pubkey,
    giving_mint: Pubkey,
    collateral_amount: u64,
    borrow_amount: u64,
    duration: u8,
    now: i64,
) -> ProgramResult {
    let [pool_account, borrower_account, borrower, borrower_collateral_token] = accounts else {
        return Err(LendingError::InvalidAccount.into());
    };

    if !borrower.is_signer() {
        return Err(LendingError::InvalidAccount.into());
    }

    let pool = unsafe { borrow_account_data_mut::<LendingPool>(pool_account)? };
    if !pool.validate() {
        return Err(LendingError::InvalidAccount.into());
    }

    let side = pool.side_for(&wanted_mint, &giving_mint)?;
    let duration = BorrowDuration::from_u8(duration)?;
    if borrow_amount == 0 {
        return Err(LendingError::InvalidParameters.into());
    }

    // The borrower account is created on first use
    let (borrower_key, bump) = find_program_address(
        &[BorrowPosition::SEED, borrower.key().as_ref()],
        program_id,
    );
    if borrower_account.key() != &borrower_key {
        msg!("Error: borrower account does not match derived address");
        return Err(LendingError::InvalidAccount.into());
    }
    let fresh = {
        let data = borrower_account.try_borrow_data()?;
        if data.len() != BorrowPosition::LEN {
            msg!("Error: borrower account has incorrect size");
            return Err(LendingError::InvalidAccount.into());
        }
        &data[0..8] != BorrowPosition::MAGIC
    };
    let position = unsafe { borrow_account_data_mut::<BorrowPosition>(borrower_account)? };
    if fresh {
        position.initialize_in_place(*borrower.key(), bump);
    } else if !position.validate() || &position.borrower != borrower.key() {
        return Err(LendingError::InvalidAccount.into());
    }

    // An Active position must keep its original side and pool
    if position.is_active()
        && (position.side() != side || &position.pool != pool_account.key())
    {
        return Err(LendingError::MintMismatch.into());
    }

    position.settle(pool.interest_rate_bps, now)?;

    {
        let data = borrower_collateral_token.try_borrow_data()?;
        check_token_balance(&data, &giving_mint, borrower.key(), collateral_amount)?;
    }

    // Reserve floor: the draw may not drain the wanted side
    let (reserve_wanted, reserve_giving) = pool.reserves_for(side);
    if borrow_amount > reserve_wanted
        || sub_u64(reserve_wanted, borrow_amount)? < pool.min_liquidity
    {
        return Err(LendingError::InsufficientLiquidity.into());
    }

    // Total debt after this draw must fit under the post-trade limit
    let collateral_total = if position.is_active() {
        add_u64(position.collateral, collateral_amount)?
    } else {
        collateral_amount
    };
    if collateral_total == 0 {
        return Err(LendingError::InvalidParameters.into());
    }
    let debt_after = add_u64(position.debt_total()?, borrow_amount)?;
    let limit = math::borrow_limit(
        collateral_total,
        reserve_wanted,
        reserve_giving,
        borrow_amount,
        pool.ltv_ratio,
    )?;
    if debt_after > limit {
        log!("Error: requested debt {} exceeds limit {}", debt_after, limit);
        return Err(LendingError::ExceedsLtv.into());
    }

    let fee = math::origination_fee(borrow_amount, pool.interest_rate_bps)?;

    pool.apply_borrow(side, collateral_amount, borrow_amount, fee)?;
    position.apply_borrow(
        pool_account.key(),
        side,
        collateral_amount,
        borrow_amount,
        duration,
        now,
    )?;

    log!("Borrowed {} against {} collateral", borrow_amount, collateral_amount);
    Ok(())
}
