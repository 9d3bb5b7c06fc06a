//! Program entrypoint

use crate::instructions;
use cascade_common::{InstructionReader, LendingError};
use pinocchio::{
    account_info::AccountInfo,
    entrypoint,
    msg,
    pubkey::Pubkey,
    sysvars::{clock::Clock, Sysvar},
    ProgramResult,
};

entrypoint!(process_instruction);

/// Main entrypoint
///
/// Instruction layout: single-byte discriminator followed by little-endian
/// fields, decoded with `InstructionReader`.
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    if instruction_data.is_empty() {
        msg!("Error: No instruction data provided");
        return Err(LendingError::InvalidInstruction.into());
    }

    let discriminator = instruction_data[0];
    let mut reader = InstructionReader::new(&instruction_data[1..]);

    match discriminator {
        0 => {
            // initialize_pool: mint_a(32) + mint_b(32) + ltv(1) +
            //                  threshold(1) + penalty(1) + rate_bps(2)
            let mint_a = reader.read_pubkey()?;
            let mint_b = reader.read_pubkey()?;
            let ltv_ratio = reader.read_u8()?;
            let liquidation_threshold = reader.read_u8()?;
            let liquidation_penalty = reader.read_u8()?;
            let interest_rate_bps = reader.read_u16()?;
            let now = Clock::get()?.unix_timestamp;

            instructions::process_initialize_pool(
                program_id,
                accounts,
                mint_a,
                mint_b,
                ltv_ratio,
                liquidation_threshold,
                liquidation_penalty,
                interest_rate_bps,
                now,
            )
        }
        1 => {
            // update_pool_parameters: ltv(1) + threshold(1) + penalty(1) + rate_bps(2)
            let ltv_ratio = reader.read_u8()?;
            let liquidation_threshold = reader.read_u8()?;
            let liquidation_penalty = reader.read_u8()?;
            let interest_rate_bps = reader.read_u16()?;

            instructions::process_update_parameters(
                accounts,
                ltv_ratio,
                liquidation_threshold,
                liquidation_penalty,
                interest_rate_bps,
            )
        }
        2 => instructions::process_initialize_provider(program_id, accounts),
        3 => {
            // provide_liquidity: amount_a(8) + amount_b(8)
            let amount_a = reader.read_u64()?;
            let amount_b = reader.read_u64()?;

            instructions::process_provide_liquidity(accounts, amount_a, amount_b)
        }
        4 => {
            // borrow_funds: wanted_mint(32) + giving_mint(32) +
            //               collateral(8) + borrow(8) + duration(1)
            let wanted_mint = reader.read_pubkey()?;
            let giving_mint = reader.read_pubkey()?;
            let collateral_amount = reader.read_u64()?;
            let borrow_amount = reader.read_u64()?;
            let duration = reader.read_u8()?;
            let now = Clock::get()?.unix_timestamp;

            instructions::process_borrow_funds(
                program_id,
                accounts,
                wanted_mint,
                giving_mint,
                collateral_amount,
                borrow_amount,
                duration,
                now,
            )
        }
        5 => {
            // repay_funds: amount(8)
            let repay_amount = reader.read_u64()?;
            let now = Clock::get()?.unix_timestamp;

            instructions::process_repay_funds(accounts, repay_amount, now)
        }
        6 => {
            let now = Clock::get()?.unix_timestamp;

            instructions::process_liquidate(accounts, now)
        }
        7 => {
            // withdraw_liquidity: lp_amount(8)
            let lp_amount = reader.read_u64()?;

            instructions::process_withdraw_liquidity(accounts, lp_amount)
        }
        8 => instructions::process_collect_fees(accounts),
        _ => {
            msg!("Error: Unknown instruction discriminator");
            Err(LendingError::InvalidInstruction.into())
        }
    }
}
