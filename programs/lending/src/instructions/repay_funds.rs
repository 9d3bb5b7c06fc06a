//! Loan repayment

use cascade_common::{borrow_account_data_mut, check_token_balance, LendingError};
use pinocchio::{account_info::AccountInfo, msg, ProgramResult};
use pinocchio_log::log;

use crate::state::{BorrowPosition, LendingPool};

/// Repay part or all of the outstanding debt
///
/// Interest is settled first and the payment covers it before principal;
/// interest lands in the fee vault, principal returns to the reserve. Once
/// the debt clears, the full collateral is released and the position
/// closes as Repaid.
pub fn process_repay_funds(accounts: &[AccountInfo], repay_amount: u64, now: i64) -> ProgramResult {
    let [pool_account, borrower_account, borrower, borrower_repay_token] = accounts else {
        return Err(LendingError::InvalidAccount.into());
    };

    if !borrower.is_signer() {
        return Err(LendingError::InvalidAccount.into());
    }

    let pool = unsafe { borrow_account_data_mut::<LendingPool>(pool_account)? };
    if !pool.validate() {
        return Err(LendingError::InvalidAccount.into());
    }
    let position = unsafe { borrow_account_data_mut::<BorrowPosition>(borrower_account)? };
    if !position.validate() || &position.borrower != borrower.key() {
        return Err(LendingError::InvalidAccount.into());
    }
    if &position.pool != pool_account.key() || !position.is_active() {
        msg!("Error: no active loan against this pool");
        return Err(LendingError::InvalidRepayAmount.into());
    }

    position.settle(pool.interest_rate_bps, now)?;

    let debt = position.debt_total()?;
    if repay_amount == 0 || repay_amount > debt {
        return Err(LendingError::InvalidRepayAmount.into());
    }

    let side = position.side();
    let wanted_mint = if side.collateral_is_a() {
        pool.mint_b
    } else {
        pool.mint_a
    };
    {
        let data = borrower_repay_token.try_borrow_data()?;
        check_token_balance(&data, &wanted_mint, borrower.key(), repay_amount)?;
    }

    // Interest first, then principal
    let interest_paid = repay_amount.min(position.accrued_interest);
    let principal_paid = repay_amount - interest_paid;

    pool.apply_repay(side, principal_paid, interest_paid)?;
    let released = position.apply_repay(interest_paid, principal_paid)?;
    if released > 0 {
        pool.release_collateral(side, released)?;
        log!("Loan repaid in full, {} collateral released", released);
    } else {
        log!("Repaid {} ({} interest, {} principal)", repay_amount, interest_paid, principal_paid);
    }
    Ok(())
}
