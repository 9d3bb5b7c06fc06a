//! Pool initialization and creator-only parameter updates

use cascade_common::{borrow_account_data_mut, LendingError};
use pinocchio::{
    account_info::AccountInfo,
    msg,
    pubkey::{find_program_address, Pubkey},
    ProgramResult,
};
use pinocchio_log::log;

use crate::state::LendingPool;

/// Create a new lending pool for (mint_a, mint_b, creator)
///
/// The pool address is derived from the mint pair plus the creator, so the
/// same creator cannot open a second pool for the same pair. Vault and
/// LP-mint addresses are derived from the pool and recorded; all ledgers
/// start at zero.
#[allow(clippy::too_many_arguments)]
pub fn process_initialize_pool(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    mint_a: Pubkey,
    mint_b: Pubkey,
    ltv_ratio: u8,
    liquidation_threshold: u8,
    liquidation_penalty: u8,
    interest_rate_bps: u16,
    now: i64,
) -> ProgramResult {
    let [pool_account, creator] = accounts else {
        return Err(LendingError::InvalidAccount.into());
    };

    if !creator.is_signer() {
        return Err(LendingError::InvalidAccount.into());
    }

    if mint_a == mint_b {
        msg!("Error: pool mints must differ");
        return Err(LendingError::InvalidParameters.into());
    }
    LendingPool::validate_parameters(
        ltv_ratio,
        liquidation_threshold,
        liquidation_penalty,
        interest_rate_bps,
    )?;

    let (pool_key, bump) = find_program_address(
        &[
            LendingPool::SEED,
            mint_a.as_ref(),
            mint_b.as_ref(),
            creator.key().as_ref(),
        ],
        program_id,
    );
    if pool_account.key() != &pool_key {
        msg!("Error: pool account does not match derived address");
        return Err(LendingError::InvalidAccount.into());
    }

    {
        let data = pool_account.try_borrow_data()?;
        if data.len() != LendingPool::LEN {
            msg!("Error: pool account has incorrect size");
            return Err(LendingError::InvalidAccount.into());
        }
        if &data[0..8] == LendingPool::MAGIC {
            msg!("Error: pool already initialized");
            return Err(LendingError::AlreadyExists.into());
        }
    }

    let (lp_mint, _) =
        find_program_address(&[LendingPool::LP_MINT_SEED, pool_key.as_ref()], program_id);
    let (vault_a, _) = find_program_address(
        &[LendingPool::VAULT_A_SEED, mint_a.as_ref(), pool_key.as_ref()],
        program_id,
    );
    let (vault_b, _) = find_program_address(
        &[LendingPool::VAULT_B_SEED, mint_b.as_ref(), pool_key.as_ref()],
        program_id,
    );
    let (fee_vault_a, _) = find_program_address(
        &[
            LendingPool::FEE_VAULT_A_SEED,
            mint_a.as_ref(),
            pool_key.as_ref(),
        ],
        program_id,
    );
    let (fee_vault_b, _) = find_program_address(
        &[
            LendingPool::FEE_VAULT_B_SEED,
            mint_b.as_ref(),
            pool_key.as_ref(),
        ],
        program_id,
    );

    let pool = unsafe { borrow_account_data_mut::<LendingPool>(pool_account)? };
    pool.initialize_in_place(
        *creator.key(),
        mint_a,
        mint_b,
        lp_mint,
        vault_a,
        vault_b,
        fee_vault_a,
        fee_vault_b,
        ltv_ratio,
        liquidation_threshold,
        liquidation_penalty,
        interest_rate_bps,
        now,
        bump,
    );

    log!(
        "Pool initialized: ltv={} threshold={} penalty={}",
        ltv_ratio,
        liquidation_threshold,
        liquidation_penalty
    );
    Ok(())
}

/// Update the pool's risk parameters (creator only)
///
/// Takes effect for subsequent evaluations; live positions are re-checked
/// lazily on their next touch.
pub fn process_update_parameters(
    accounts: &[AccountInfo],
    ltv_ratio: u8,
    liquidation_threshold: u8,
    liquidation_penalty: u8,
    interest_rate_bps: u16,
) -> ProgramResult {
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
        msg!("Error: only the pool creator may update parameters");
        return Err(LendingError::Unauthorized.into());
    }
    LendingPool::validate_parameters(
        ltv_ratio,
        liquidation_threshold,
        liquidation_penalty,
        interest_rate_bps,
    )?;

    pool.ltv_ratio = ltv_ratio;
    pool.liquidation_threshold = liquidation_threshold;
    pool.liquidation_penalty = liquidation_penalty;
    pool.interest_rate_bps = interest_rate_bps;
    pool.increment_seqno();

    log!("Pool parameters updated: ltv={} threshold={}", ltv_ratio, liquidation_threshold);
    Ok(())
}
