//! Protocol fee extraction

use cascade_common::{borrow_account_data_mut, LendingError};
use pinocchio::{account_info::AccountInfo, msg, ProgramResult};
use pinocchio_log::log;

use crate::state::LendingPool;

/// Drain both fee vault ledgers to the pool authority (creator only)
pub fn process_collect_fees(accounts: &[AccountInfo]) -> ProgramResult {
    let [pool_account, creator] = accounts else {
        return Err(LendingError::InvalidAccount.into());
    };

    if !creator.is_signer() {
        return Err(LendingError::InvalidAccount.into());
    }

    let pool = unsafe { borrow_account_data_mut::<LendingPool>(pool_account)? };
    if !pool.validate() {
        return Err(LendingError::InvalidAccount.into());
    }
    if &pool.authority != creator.key() {
        msg!("Error: only the pool creator may collect fees");
        return Err(LendingError::Unauthorized.into());
    }

    let (fee_a, fee_b) = pool.collect_fees();
    log!("Fees collected: {} of mint A, {} of mint B", fee_a, fee_b);
    Ok(())
}
