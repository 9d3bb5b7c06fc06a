//! Account data access helpers
//!
//! State accounts are `#[repr(C)]` structs cast directly from account data.
//! Token balances are read from SPL token accounts by fixed offset; moving
//! the tokens themselves is the token program's concern, not ours.

use crate::error::LendingError;
use pinocchio::account_info::AccountInfo;
use pinocchio::pubkey::Pubkey;

/// Borrow account data as a typed reference
///
/// # Safety
///
/// T must be `#[repr(C)]` with a stable layout, and the account data must
/// not be borrowed mutably elsewhere for the lifetime of the reference.
pub unsafe fn borrow_account_data<T>(account: &AccountInfo) -> Result<&T, LendingError> {
    if account.data_len() != core::mem::size_of::<T>() {
        return Err(LendingError::InvalidAccount);
    }
    let data = account.borrow_data_unchecked();
    Ok(&*(data.as_ptr() as *const T))
}

/// Borrow account data as a typed mutable reference
///
/// # Safety
///
/// T must be `#[repr(C)]` with a stable layout, and the account data must
/// not be borrowed elsewhere for the lifetime of the reference.
pub unsafe fn borrow_account_data_mut<T>(account: &AccountInfo) -> Result<&mut T, LendingError> {
    if account.data_len() != core::mem::size_of::<T>() {
        return Err(LendingError::InvalidAccount);
    }
    let data = account.borrow_mut_data_unchecked();
    Ok(&mut *(data.as_mut_ptr() as *mut T))
}

/// SPL token account length
pub const TOKEN_ACCOUNT_LEN: usize = 165;

const TOKEN_MINT_OFFSET: usize = 0;
const TOKEN_OWNER_OFFSET: usize = 32;
const TOKEN_AMOUNT_OFFSET: usize = 64;

/// Read the mint of an SPL token account
pub fn token_account_mint(data: &[u8]) -> Result<Pubkey, LendingError> {
    if data.len() != TOKEN_ACCOUNT_LEN {
        return Err(LendingError::InvalidAccount);
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&data[TOKEN_MINT_OFFSET..TOKEN_MINT_OFFSET + 32]);
    Ok(Pubkey::from(key))
}

/// Read the owner of an SPL token account
pub fn token_account_owner(data: &[u8]) -> Result<Pubkey, LendingError> {
    if data.len() != TOKEN_ACCOUNT_LEN {
        return Err(LendingError::InvalidAccount);
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&data[TOKEN_OWNER_OFFSET..TOKEN_OWNER_OFFSET + 32]);
    Ok(Pubkey::from(key))
}

/// Read the balance of an SPL token account
pub fn token_account_amount(data: &[u8]) -> Result<u64, LendingError> {
    if data.len() != TOKEN_ACCOUNT_LEN {
        return Err(LendingError::InvalidAccount);
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[TOKEN_AMOUNT_OFFSET..TOKEN_AMOUNT_OFFSET + 8]);
    Ok(u64::from_le_bytes(bytes))
}

/// Check that a token account belongs to `owner`, holds `mint`, and covers
/// `amount`
pub fn check_token_balance(
    data: &[u8],
    mint: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Result<(), LendingError> {
    if &token_account_mint(data)? != mint {
        return Err(LendingError::MintMismatch);
    }
    if &token_account_owner(data)? != owner {
        return Err(LendingError::InvalidAccount);
    }
    if token_account_amount(data)? < amount {
        return Err(LendingError::InsufficientBalance);
    }
    Ok(())
}
