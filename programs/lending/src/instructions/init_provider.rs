//! Liquidity provider account initialization

use cascade_common::{borrow_account_data_mut, LendingError};
use pinocchio::{
    account_info::AccountInfo,
    msg,
    pubkey::{find_program_address, Pubkey},
    ProgramResult,
};

use crate::state::ProviderPosition;

/// Create the provider's ledger account (once per provider)
pub fn process_initialize_provider(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
) -> ProgramResult {
    let [provider_account, provider] = accounts else {
        return Err(LendingError::InvalidAccount.into());
    };

    if !provider.is_signer() {
        return Err(LendingError::InvalidAccount.into());
    }

    let (provider_key, bump) = find_program_address(
        &[ProviderPosition::SEED, provider.key().as_ref()],
        program_id,
    );
    if provider_account.key() != &provider_key {
        msg!("Error: provider account does not match derived address");
        return Err(LendingError::InvalidAccount.into());
    }

    {
        let data = provider_account.try_borrow_data()?;
        if data.len() != ProviderPosition::LEN {
            msg!("Error: provider account has incorrect size");
            return Err(LendingError::InvalidAccount.into());
        }
        if &data[0..8] == ProviderPosition::MAGIC {
            msg!("Error: provider account already initialized");
            return Err(LendingError::AlreadyExists.into());
        }
    }

    let position = unsafe { borrow_account_data_mut::<ProviderPosition>(provider_account)? };
    position.initialize_in_place(*provider.key(), bump);

    msg!("Liquidity provider initialized");
    Ok(())
}
