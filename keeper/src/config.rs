//! Keeper configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC URL for Solana cluster
    pub rpc_url: String,

    /// WebSocket URL for event subscription
    pub ws_url: String,

    /// Lending program ID
    pub lending_program: Pubkey,

    /// Keeper wallet keypair path
    pub keypair_path: String,

    /// Mint the keeper repays debt in; positions wanting other mints are skipped
    pub repay_mint: Pubkey,

    /// Keeper's token account for repay_mint
    pub repay_token_account: Pubkey,

    /// Polling interval in seconds
    pub poll_interval_secs: u64,

    /// Maximum liquidations per batch
    pub max_liquidations_per_batch: usize,
}

impl Config {
    /// Load configuration from TOML file
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("CASCADE_KEEPER_CONFIG")
            .unwrap_or_else(|_| "keeper-config.toml".to_string());

        let config_str = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {}", config_path))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config TOML")?;

        Ok(config)
    }

    /// Create default configuration
    pub fn default_devnet() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            ws_url: "wss://api.devnet.solana.com".to_string(),
            lending_program: Pubkey::from_str("3cPUnTmHcQtpLQKTE9cVJUZuc7WEovqvFh1H1Sfd1hSZ")
                .unwrap(),
            keypair_path: "~/.config/solana/id.json".to_string(),
            repay_mint: Pubkey::default(),
            repay_token_account: Pubkey::default(),
            poll_interval_secs: 5,
            max_liquidations_per_batch: 5,
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_devnet();
        let toml_str = toml::to_string_pretty(&config)
            .context("Failed to serialize config")?;

        std::fs::write(path, toml_str)
            .context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips() {
        let config = Config::default_devnet();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.rpc_url, config.rpc_url);
        assert_eq!(parsed.lending_program, config.lending_program);
        assert_eq!(parsed.poll_interval_secs, 5);
    }
}
