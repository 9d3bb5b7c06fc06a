//! Liquidity pool state machine

use cascade_common::{add_u64, sub_u64, LendingError};
use pinocchio::pubkey::Pubkey;

use crate::math;

/// Which of the pool's mints a borrower wants to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowSide {
    /// Draw mint A, post mint B as collateral
    WantedA,
    /// Draw mint B, post mint A as collateral
    WantedB,
}

impl BorrowSide {
    /// True when the posted collateral is mint A
    pub fn collateral_is_a(&self) -> bool {
        matches!(self, BorrowSide::WantedB)
    }
}

/// Lending pool account
/// PDA: ["liquidity_pool", mint_a, mint_b, creator]
///
/// Reserves hold lendable liquidity; posted collateral is ledgered
/// separately and never participates in spot pricing.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LendingPool {
    /// Magic bytes for validation
    pub magic: [u8; 8],
    /// Layout version (=1)
    pub version: u32,
    /// Sequence number (incremented on any ledger change)
    pub seqno: u32,

    /// Pool creator, the only identity allowed to update parameters
    pub authority: Pubkey,
    /// First pool token mint
    pub mint_a: Pubkey,
    /// Second pool token mint
    pub mint_b: Pubkey,
    /// LP token mint PDA
    pub lp_mint: Pubkey,
    /// Vault PDA holding mint A reserves and collateral
    pub vault_a: Pubkey,
    /// Vault PDA holding mint B reserves and collateral
    pub vault_b: Pubkey,
    /// Fee vault PDA for mint A
    pub fee_vault_a: Pubkey,
    /// Fee vault PDA for mint B
    pub fee_vault_b: Pubkey,

    /// Lendable mint A balance
    pub reserve_a: u64,
    /// Lendable mint B balance
    pub reserve_b: u64,
    /// Accrued protocol fees, mint A
    pub fee_a: u64,
    /// Accrued protocol fees, mint B
    pub fee_b: u64,
    /// Posted borrower collateral, mint A
    pub collateral_a: u64,
    /// Posted borrower collateral, mint B
    pub collateral_b: u64,
    /// Outstanding LP tokens
    pub lp_supply: u64,
    /// Outstanding borrowed principal, mint A
    pub total_borrowed_a: u64,
    /// Outstanding borrowed principal, mint B
    pub total_borrowed_b: u64,
    /// Reserve floor no borrow or debt-encumbered withdrawal may breach
    pub min_liquidity: u64,
    /// Pool creation timestamp
    pub created_at: i64,

    /// Loan-to-value ratio, percent
    pub ltv_ratio: u8,
    /// Health threshold for forced closure, percent
    pub liquidation_threshold: u8,
    /// Extra percent of debt value seized at liquidation
    pub liquidation_penalty: u8,
    /// PDA bump seed
    pub bump: u8,
    /// Annualized interest rate, basis points
    pub interest_rate_bps: u16,
    /// Padding
    pub _padding: [u8; 2],
}

impl LendingPool {
    pub const MAGIC: &'static [u8; 8] = b"CASCPOOL";
    pub const VERSION: u32 = 1;
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// PDA seed prefixes
    pub const SEED: &'static [u8] = b"liquidity_pool";
    pub const LP_MINT_SEED: &'static [u8] = b"lp_token_mint";
    pub const VAULT_A_SEED: &'static [u8] = b"token_vault_a";
    pub const VAULT_B_SEED: &'static [u8] = b"token_vault_b";
    pub const FEE_VAULT_A_SEED: &'static [u8] = b"fee_vault_a";
    pub const FEE_VAULT_B_SEED: &'static [u8] = b"fee_vault_b";

    /// Default reserve floor (raw token units)
    pub const MIN_LIQUIDITY: u64 = 100;

    /// Check the risk-parameter ordering invariant:
    /// 0 < ltv < threshold < 100, penalty < 100, rate within one year of 100%
    pub fn validate_parameters(
        ltv_ratio: u8,
        liquidation_threshold: u8,
        liquidation_penalty: u8,
        interest_rate_bps: u16,
    ) -> Result<(), LendingError> {
        if ltv_ratio == 0 || ltv_ratio >= liquidation_threshold || liquidation_threshold >= 100 {
            return Err(LendingError::InvalidParameters);
        }
        if liquidation_penalty >= 100 {
            return Err(LendingError::InvalidParameters);
        }
        if interest_rate_bps as u64 > math::BPS_SCALE {
            return Err(LendingError::InvalidParameters);
        }
        Ok(())
    }

    /// Initialize pool fields in place with zeroed ledgers
    #[allow(clippy::too_many_arguments)]
    pub fn initialize_in_place(
        &mut self,
        authority: Pubkey,
        mint_a: Pubkey,
        mint_b: Pubkey,
        lp_mint: Pubkey,
        vault_a: Pubkey,
        vault_b: Pubkey,
        fee_vault_a: Pubkey,
        fee_vault_b: Pubkey,
        ltv_ratio: u8,
        liquidation_threshold: u8,
        liquidation_penalty: u8,
        interest_rate_bps: u16,
        created_at: i64,
        bump: u8,
    ) {
        self.magic = *Self::MAGIC;
        self.version = Self::VERSION;
        self.seqno = 0;
        self.authority = authority;
        self.mint_a = mint_a;
        self.mint_b = mint_b;
        self.lp_mint = lp_mint;
        self.vault_a = vault_a;
        self.vault_b = vault_b;
        self.fee_vault_a = fee_vault_a;
        self.fee_vault_b = fee_vault_b;
        self.reserve_a = 0;
        self.reserve_b = 0;
        self.fee_a = 0;
        self.fee_b = 0;
        self.collateral_a = 0;
        self.collateral_b = 0;
        self.lp_supply = 0;
        self.total_borrowed_a = 0;
        self.total_borrowed_b = 0;
        self.min_liquidity = Self::MIN_LIQUIDITY;
        self.created_at = created_at;
        self.ltv_ratio = ltv_ratio;
        self.liquidation_threshold = liquidation_threshold;
        self.liquidation_penalty = liquidation_penalty;
        self.bump = bump;
        self.interest_rate_bps = interest_rate_bps;
        self._padding = [0; 2];
    }

    /// Validate magic and version
    pub fn validate(&self) -> bool {
        &self.magic == Self::MAGIC && self.version == Self::VERSION
    }

    /// Increment sequence number (on any ledger change)
    pub fn increment_seqno(&mut self) -> u32 {
        self.seqno = self.seqno.wrapping_add(1);
        self.seqno
    }

    /// Resolve a (wanted, giving) mint pair against the pool's mints
    pub fn side_for(&self, wanted: &Pubkey, giving: &Pubkey) -> Result<BorrowSide, LendingError> {
        if wanted == &self.mint_a && giving == &self.mint_b {
            Ok(BorrowSide::WantedA)
        } else if wanted == &self.mint_b && giving == &self.mint_a {
            Ok(BorrowSide::WantedB)
        } else {
            Err(LendingError::MintMismatch)
        }
    }

    /// (wanted reserve, giving reserve) for a side
    pub fn reserves_for(&self, side: BorrowSide) -> (u64, u64) {
        match side {
            BorrowSide::WantedA => (self.reserve_a, self.reserve_b),
            BorrowSide::WantedB => (self.reserve_b, self.reserve_a),
        }
    }

    /// Total outstanding borrowed principal across both mints
    pub fn total_borrowed(&self) -> u64 {
        self.total_borrowed_a.saturating_add(self.total_borrowed_b)
    }

    /// Apply a consumed deposit quote
    pub fn apply_provide(
        &mut self,
        used_a: u64,
        used_b: u64,
        minted: u64,
    ) -> Result<(), LendingError> {
        self.reserve_a = add_u64(self.reserve_a, used_a)?;
        self.reserve_b = add_u64(self.reserve_b, used_b)?;
        self.lp_supply = add_u64(self.lp_supply, minted)?;
        self.increment_seqno();
        Ok(())
    }

    /// Burn LP tokens and release the proportional reserves
    pub fn apply_withdraw(
        &mut self,
        lp_amount: u64,
        out_a: u64,
        out_b: u64,
    ) -> Result<(), LendingError> {
        self.reserve_a = sub_u64(self.reserve_a, out_a)?;
        self.reserve_b = sub_u64(self.reserve_b, out_b)?;
        self.lp_supply = sub_u64(self.lp_supply, lp_amount)?;
        self.increment_seqno();
        Ok(())
    }

    /// Apply a borrow draw: collateral in, reserve out, fee diverted
    pub fn apply_borrow(
        &mut self,
        side: BorrowSide,
        collateral: u64,
        borrow: u64,
        fee: u64,
    ) -> Result<(), LendingError> {
        match side {
            BorrowSide::WantedA => {
                self.reserve_a = sub_u64(self.reserve_a, borrow)?;
                self.fee_a = add_u64(self.fee_a, fee)?;
                self.collateral_b = add_u64(self.collateral_b, collateral)?;
                self.total_borrowed_a = add_u64(self.total_borrowed_a, borrow)?;
            }
            BorrowSide::WantedB => {
                self.reserve_b = sub_u64(self.reserve_b, borrow)?;
                self.fee_b = add_u64(self.fee_b, fee)?;
                self.collateral_a = add_u64(self.collateral_a, collateral)?;
                self.total_borrowed_b = add_u64(self.total_borrowed_b, borrow)?;
            }
        }
        self.increment_seqno();
        Ok(())
    }

    /// Apply a repayment: principal back to the reserve, interest to the
    /// fee vault
    pub fn apply_repay(
        &mut self,
        side: BorrowSide,
        principal: u64,
        interest: u64,
    ) -> Result<(), LendingError> {
        match side {
            BorrowSide::WantedA => {
                self.reserve_a = add_u64(self.reserve_a, principal)?;
                self.fee_a = add_u64(self.fee_a, interest)?;
                self.total_borrowed_a = sub_u64(self.total_borrowed_a, principal)?;
            }
            BorrowSide::WantedB => {
                self.reserve_b = add_u64(self.reserve_b, principal)?;
                self.fee_b = add_u64(self.fee_b, interest)?;
                self.total_borrowed_b = sub_u64(self.total_borrowed_b, principal)?;
            }
        }
        self.increment_seqno();
        Ok(())
    }

    /// Release posted collateral back to a borrower
    pub fn release_collateral(&mut self, side: BorrowSide, amount: u64) -> Result<(), LendingError> {
        if side.collateral_is_a() {
            self.collateral_a = sub_u64(self.collateral_a, amount)?;
        } else {
            self.collateral_b = sub_u64(self.collateral_b, amount)?;
        }
        self.increment_seqno();
        Ok(())
    }

    /// Apply a liquidation: the liquidator repays the debt, the position's
    /// collateral leaves the ledger (seized + returned)
    pub fn apply_liquidation(
        &mut self,
        side: BorrowSide,
        principal: u64,
        interest: u64,
        seized: u64,
        returned: u64,
    ) -> Result<(), LendingError> {
        self.apply_repay(side, principal, interest)?;
        let released = add_u64(seized, returned)?;
        self.release_collateral(side, released)
    }

    /// Drain both fee vault ledgers, returning (fee_a, fee_b)
    pub fn collect_fees(&mut self) -> (u64, u64) {
        let out = (self.fee_a, self.fee_b);
        self.fee_a = 0;
        self.fee_b = 0;
        self.increment_seqno();
        out
    }
}
