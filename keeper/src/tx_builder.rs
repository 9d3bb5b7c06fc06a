//! Transaction builder for liquidations

use anyhow::Result;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    transaction::Transaction,
};

/// Liquidate instruction discriminator
const LIQUIDATE_DISCRIMINATOR: u8 = 6;

/// Build a liquidate instruction
///
/// Accounts: pool (writable), borrow position (writable), liquidator
/// (signer), liquidator's repay token account (writable).
pub fn build_liquidate_instruction(
    lending_program: &Pubkey,
    pool: &Pubkey,
    position: &Pubkey,
    liquidator: &Pubkey,
    repay_token_account: &Pubkey,
) -> Instruction {
    let data = vec![LIQUIDATE_DISCRIMINATOR];

    let accounts = vec![
        AccountMeta::new(*pool, false),
        AccountMeta::new(*position, false),
        AccountMeta::new_readonly(*liquidator, true),
        AccountMeta::new(*repay_token_account, false),
    ];

    Instruction {
        program_id: *lending_program,
        accounts,
        data,
    }
}

/// Build a signed liquidation transaction
pub fn build_liquidation_transaction(
    lending_program: &Pubkey,
    pool: &Pubkey,
    position: &Pubkey,
    keeper: &Keypair,
    repay_token_account: &Pubkey,
    recent_blockhash: solana_sdk::hash::Hash,
) -> Result<Transaction> {
    let instruction = build_liquidate_instruction(
        lending_program,
        pool,
        position,
        &keeper.pubkey(),
        repay_token_account,
    );

    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&keeper.pubkey()),
        &[keeper],
        recent_blockhash,
    );

    Ok(transaction)
}
