//! Liquidity provider ledger

use cascade_common::{add_u64, sub_u64, LendingError};
use pinocchio::pubkey::Pubkey;

/// Per-provider deposit ledger and LP-share claim
/// PDA: ["liquidity_provider", provider]
///
/// Bound to the first pool deposited into; the binding clears when the last
/// LP token is withdrawn.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ProviderPosition {
    /// Magic bytes for validation
    pub magic: [u8; 8],
    /// Layout version (=1)
    pub version: u32,
    /// Padding
    pub _padding0: u32,

    /// Provider identity
    pub provider: Pubkey,
    /// Pool this position is bound to (zero when unbound)
    pub pool: Pubkey,

    /// Cumulative mint A deposited
    pub deposited_a: u64,
    /// Cumulative mint B deposited
    pub deposited_b: u64,
    /// LP tokens held
    pub lp_tokens: u64,

    /// PDA bump seed
    pub bump: u8,
    /// Padding
    pub _padding: [u8; 7],
}

impl ProviderPosition {
    pub const MAGIC: &'static [u8; 8] = b"CASCPROV";
    pub const VERSION: u32 = 1;
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// PDA seed prefix
    pub const SEED: &'static [u8] = b"liquidity_provider";

    /// Initialize provider fields in place with zeroed ledgers
    pub fn initialize_in_place(&mut self, provider: Pubkey, bump: u8) {
        self.magic = *Self::MAGIC;
        self.version = Self::VERSION;
        self._padding0 = 0;
        self.provider = provider;
        self.pool = [0u8; 32];
        self.deposited_a = 0;
        self.deposited_b = 0;
        self.lp_tokens = 0;
        self.bump = bump;
        self._padding = [0; 7];
    }

    /// Validate magic and version
    pub fn validate(&self) -> bool {
        &self.magic == Self::MAGIC && self.version == Self::VERSION
    }

    /// Record a consumed deposit, binding the position to `pool` on first use
    pub fn record_deposit(
        &mut self,
        pool: &Pubkey,
        used_a: u64,
        used_b: u64,
        minted: u64,
    ) -> Result<(), LendingError> {
        if self.lp_tokens == 0 {
            self.pool = *pool;
        } else if &self.pool != pool {
            return Err(LendingError::MintMismatch);
        }
        self.deposited_a = add_u64(self.deposited_a, used_a)?;
        self.deposited_b = add_u64(self.deposited_b, used_b)?;
        self.lp_tokens = add_u64(self.lp_tokens, minted)?;
        Ok(())
    }

    /// Record an LP burn; clears the deposit ledger and pool binding when
    /// the position empties
    pub fn record_withdraw(&mut self, lp_amount: u64) -> Result<(), LendingError> {
        self.lp_tokens = sub_u64(self.lp_tokens, lp_amount)?;
        if self.lp_tokens == 0 {
            self.pool = [0u8; 32];
            self.deposited_a = 0;
            self.deposited_b = 0;
        }
        Ok(())
    }
}
