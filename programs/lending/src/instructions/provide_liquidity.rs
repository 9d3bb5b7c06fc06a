//! Liquidity provision

use cascade_common::{borrow_account_data_mut, check_token_balance, LendingError};
use pinocchio::{account_info::AccountInfo, msg, ProgramResult};
use pinocchio_log::log;

use crate::math;
use crate::state::{LendingPool, ProviderPosition};

/// Deposit (amount_a, amount_b) into the pool, minting LP tokens
///
/// First deposit seeds LP supply with the geometric mean of the amounts;
/// later deposits mint proportionally and consume only the proportional
/// amounts (the excess of the non-limiting asset is refunded).
pub fn process_provide_liquidity(
    accounts: &[AccountInfo],
    amount_a: u64,
    amount_b: u64,
) -> ProgramResult {
    let [pool_account, provider_account, provider, provider_token_a, provider_token_b] = accounts
    else {
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

    // The offered amounts must be covered before anything is quoted
    {
        let data_a = provider_token_a.try_borrow_data()?;
        check_token_balance(&data_a, &pool.mint_a, provider.key(), amount_a)?;
        let data_b = provider_token_b.try_borrow_data()?;
        check_token_balance(&data_b, &pool.mint_b, provider.key(), amount_b)?;
    }

    let quote = math::lp_tokens_for_deposit(
        pool.reserve_a,
        pool.reserve_b,
        pool.lp_supply,
        amount_a,
        amount_b,
    )?;

    pool.apply_provide(quote.used_a, quote.used_b, quote.minted)?;
    position.record_deposit(pool_account.key(), quote.used_a, quote.used_b, quote.minted)?;

    log!("Liquidity provided: minted={} lp tokens", quote.minted);
    if quote.used_a < amount_a || quote.used_b < amount_b {
        msg!("Excess deposit refunded");
    }
    Ok(())
}
