//! Cascade Liquidation Keeper
//!
//! Off-chain service that monitors borrow positions and liquidates those
//! whose health ratio fell below 100% or whose loan term has expired.

mod config;
mod health;
mod priority_queue;
mod tx_builder;

use anyhow::{Context, Result};
use config::Config;
use health::{calculate_health, parse_pool, parse_position, projected_debt, PoolState};
use priority_queue::{HealthQueue, PositionHealth};
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::RpcFilterType,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Cascade Liquidation Keeper");

    // Load configuration
    let config = Config::load().unwrap_or_else(|_| {
        log::warn!("Failed to load config, using default devnet config");
        Config::default_devnet()
    });

    log::info!("Connected to RPC: {}", config.rpc_url);
    log::info!("Monitoring lending program: {}", config.lending_program);

    // Initialize RPC client
    let client = RpcClient::new_with_commitment(
        config.rpc_url.clone(),
        CommitmentConfig::confirmed(),
    );

    // Load keeper wallet
    let keeper = load_keypair(&config.keypair_path)?;
    log::info!("Keeper wallet: {}", keeper.pubkey());

    // Initialize health queue
    let mut queue = HealthQueue::new();

    log::info!("Keeper service started. Monitoring for liquidations...");

    // Main event loop
    let mut interval = time::interval(Duration::from_secs(config.poll_interval_secs));

    loop {
        interval.tick().await;

        let now = unix_now();

        if let Err(e) = refresh_health_queue(&mut queue, &client, &config, now) {
            log::error!("Error refreshing health queue: {}", e);
            continue;
        }

        if let Err(e) = process_liquidations(&mut queue, &client, &config, &keeper) {
            log::error!("Error processing liquidations: {}", e);
        }

        if !queue.is_empty() {
            log::debug!("Health queue size: {}", queue.len());

            if let Some(worst) = queue.peek() {
                log::debug!("Worst health: {}%", worst.health);
            }
        }
    }
}

/// Current unix timestamp
fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Scan borrow positions and rebuild the health queue
fn refresh_health_queue(
    queue: &mut HealthQueue,
    client: &RpcClient,
    config: &Config,
    now: i64,
) -> Result<()> {
    let accounts_config = RpcProgramAccountsConfig {
        filters: Some(vec![RpcFilterType::DataSize(health::POSITION_LEN as u64)]),
        account_config: RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::Base64),
            ..RpcAccountInfoConfig::default()
        },
        ..RpcProgramAccountsConfig::default()
    };

    let accounts = client
        .get_program_accounts_with_config(&config.lending_program, accounts_config)
        .context("Failed to fetch borrow position accounts")?;

    // Pools are fetched once per tick
    let mut pools: HashMap<Pubkey, PoolState> = HashMap::new();

    for (address, account) in accounts {
        let position = match parse_position(&account.data) {
            Ok(p) => p,
            Err(e) => {
                log::debug!("Skipping account {}: {}", address, e);
                continue;
            }
        };

        if !position.is_active() {
            queue.remove(&position.borrower);
            continue;
        }

        let pool = match pools.get(&position.pool) {
            Some(p) => p.clone(),
            None => {
                let account = client
                    .get_account(&position.pool)
                    .context("Failed to fetch pool account")?;
                let pool = parse_pool(&account.data)
                    .context("Failed to parse pool account")?;
                pools.insert(position.pool, pool.clone());
                pool
            }
        };

        // Only positions repayable with the configured mint
        if position.wanted_mint(&pool) != config.repay_mint {
            continue;
        }

        queue.push(PositionHealth {
            borrower: position.borrower,
            position: address,
            pool: position.pool,
            wanted_mint: position.wanted_mint(&pool),
            health: calculate_health(&position, &pool, now),
            debt: projected_debt(&position, &pool, now),
            expired: position.is_expired(now),
            last_update: now,
        });
    }

    Ok(())
}

/// Process liquidations for positions in the queue
fn process_liquidations(
    queue: &mut HealthQueue,
    client: &RpcClient,
    config: &Config,
    keeper: &Keypair,
) -> Result<()> {
    let liquidatable = queue.get_liquidatable();

    if liquidatable.is_empty() {
        log::debug!("No positions need liquidation");
        return Ok(());
    }

    log::info!("Found {} positions needing liquidation", liquidatable.len());

    let batch_size = config.max_liquidations_per_batch.min(liquidatable.len());

    for position_health in liquidatable.iter().take(batch_size) {
        log::info!(
            "Liquidating borrower {} (health: {}%, debt: {})",
            position_health.borrower,
            position_health.health,
            position_health.debt,
        );

        match execute_liquidation(client, config, keeper, position_health) {
            Ok(signature) => {
                log::info!("Liquidation submitted: {}", signature);
                queue.remove(&position_health.borrower);
            }
            Err(e) => {
                log::error!(
                    "Failed to liquidate borrower {}: {}",
                    position_health.borrower,
                    e
                );
            }
        }
    }

    Ok(())
}

/// Execute a single liquidation
fn execute_liquidation(
    client: &RpcClient,
    config: &Config,
    keeper: &Keypair,
    position_health: &PositionHealth,
) -> Result<String> {
    let recent_blockhash = client
        .get_latest_blockhash()
        .context("Failed to fetch recent blockhash")?;

    let transaction = tx_builder::build_liquidation_transaction(
        &config.lending_program,
        &position_health.pool,
        &position_health.position,
        keeper,
        &config.repay_token_account,
        recent_blockhash,
    )?;

    let signature = client
        .send_and_confirm_transaction(&transaction)
        .context("Failed to submit liquidation transaction")?;

    Ok(signature.to_string())
}

/// Load keeper keypair from file
fn load_keypair(path: &str) -> Result<Keypair> {
    let expanded_path = shellexpand::tilde(path);
    let bytes = std::fs::read(expanded_path.as_ref())
        .context(format!("Failed to read keypair from {}", path))?;

    let keypair = if bytes[0] == b'[' {
        // JSON format
        let json_data: Vec<u8> = serde_json::from_slice(&bytes)
            .context("Failed to parse keypair JSON")?;
        Keypair::try_from(&json_data[..])
            .context("Failed to create keypair from bytes")?
    } else {
        // Binary format
        Keypair::try_from(&bytes[..])
            .context("Failed to create keypair from bytes")?
    };

    Ok(keypair)
}
