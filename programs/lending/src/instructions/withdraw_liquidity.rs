//! Liquidity withdrawal

use cascade_common::{borrow_account_data_mut, sub_u64, LendingError};
use pinocchio::{account_info::AccountInfo, ProgramResult};
use pinocchio_log::log;

use crate::math;
use crate::state::{LendingPool, ProviderPosition};

/// Burn LP tokens for the proportional share of both reserves
///
/// While debt is outstanding the withdrawal may not drag either reserve
/// below the pool's minimum liquidity floor.
pub fn process_withdraw_liquidity(accounts: &[AccountInfo], lp_amount: u64) -> ProgramResult {
    let [pool_account, provider_account, provider] = accounts else {
        return Err(LendingError::InvalidAccount.into());
    };

    if !provider.is_signer() {
        return Err(LendingError::InvalidAccount.into());
    }

    let pool = unsafe { borrow_account_data_mut::<LendingPool>(pool_account)? };
    if !pool.validate() {
        return Err(LendingError::InvalidAccount.into());
    }
    let position = unsafe { borrow_account_data_mut::<ProviderPosition>(provider_account)? };
    if !position.validate() || &position.provider != provider.key() {
        return Err(LendingError::InvalidAccount.into());
    }
    if &position.pool != pool_account.key() {
        return Err(LendingError::MintMismatch.into());
    }
    if lp_amount == 0 {
        return Err(LendingError::InvalidParameters.into());
    }
    if lp_amount > position.lp_tokens {
        return Err(LendingError::InsufficientBalance.into());
    }

    let (out_a, out_b) =
        math::withdraw_amounts(pool.reserve_a, pool.reserve_b, pool.lp_supply, lp_amount)?;

    if pool.total_borrowed() > 0 {
        let left_a = sub_u64(pool.reserve_a, out_a)?;
        let left_b = sub_u64(pool.reserve_b, out_b)?;
        if left_a < pool.min_liquidity || left_b < pool.min_liquidity {
            return Err(LendingError::InsufficientLiquidity.into());
        }
    }

    pool.apply_withdraw(lp_amount, out_a, out_b)?;
    position.record_withdraw(lp_amount)?;

    log!("Liquidity withdrawn: burned={} lp tokens", lp_amount);
    Ok(())
}
