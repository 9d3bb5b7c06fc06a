//! Simulated market harness
//!
//! Drives the pool/position state machine through the same sequence the
//! instruction processors run (settle, check, apply), without the account
//! plumbing. Scenario tests build on this instead of hand-rolling ledger
//! mutations.

use cascade_common::{add_u64, sub_u64, LendingError};
use cascade_lending::math;
use cascade_lending::state::{
    BorrowDuration, BorrowPosition, LendingPool, ProviderPosition,
};

type Pubkey = [u8; 32];

/// A pool plus its simulated account address
pub struct SimMarket {
    pub pool: LendingPool,
    pub pool_key: Pubkey,
}

impl SimMarket {
    /// Create a pool the way initialize_pool does
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        creator: Pubkey,
        mint_a: Pubkey,
        mint_b: Pubkey,
        ltv_ratio: u8,
        liquidation_threshold: u8,
        liquidation_penalty: u8,
        interest_rate_bps: u16,
        now: i64,
    ) -> Result<Self, LendingError> {
        if mint_a == mint_b {
            return Err(LendingError::InvalidParameters);
        }
        LendingPool::validate_parameters(
            ltv_ratio,
            liquidation_threshold,
            liquidation_penalty,
            interest_rate_bps,
        )?;

        let pool_key = crate::unique_key();
        let mut pool: LendingPool = unsafe { core::mem::zeroed() };
        pool.initialize_in_place(
            creator,
            mint_a,
            mint_b,
            crate::unique_key(),
            crate::unique_key(),
            crate::unique_key(),
            crate::unique_key(),
            crate::unique_key(),
            ltv_ratio,
            liquidation_threshold,
            liquidation_penalty,
            interest_rate_bps,
            now,
            255,
        );
        Ok(Self { pool, pool_key })
    }

    /// Fresh provider ledger
    pub fn new_provider(&self, provider: Pubkey) -> ProviderPosition {
        let mut position: ProviderPosition = unsafe { core::mem::zeroed() };
        position.initialize_in_place(provider, 254);
        position
    }

    /// Fresh borrower position
    pub fn new_borrower(&self, borrower: Pubkey) -> BorrowPosition {
        let mut position: BorrowPosition = unsafe { core::mem::zeroed() };
        position.initialize_in_place(borrower, 253);
        position
    }

    /// Creator-only parameter update
    pub fn update_parameters(
        &mut self,
        caller: &Pubkey,
        ltv_ratio: u8,
        liquidation_threshold: u8,
        liquidation_penalty: u8,
        interest_rate_bps: u16,
    ) -> Result<(), LendingError> {
        if &self.pool.authority != caller {
            return Err(LendingError::Unauthorized);
        }
        LendingPool::validate_parameters(
            ltv_ratio,
            liquidation_threshold,
            liquidation_penalty,
            interest_rate_bps,
        )?;
        self.pool.ltv_ratio = ltv_ratio;
        self.pool.liquidation_threshold = liquidation_threshold;
        self.pool.liquidation_penalty = liquidation_penalty;
        self.pool.interest_rate_bps = interest_rate_bps;
        self.pool.increment_seqno();
        Ok(())
    }

    /// Deposit liquidity, returning the consumed quote
    pub fn provide(
        &mut self,
        provider: &mut ProviderPosition,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<math::DepositQuote, LendingError> {
        let quote = math::lp_tokens_for_deposit(
            self.pool.reserve_a,
            self.pool.reserve_b,
            self.pool.lp_supply,
            amount_a,
            amount_b,
        )?;
        self.pool
            .apply_provide(quote.used_a, quote.used_b, quote.minted)?;
        provider.record_deposit(&self.pool_key, quote.used_a, quote.used_b, quote.minted)?;
        Ok(quote)
    }

    /// Burn LP tokens, returning the released amounts
    pub fn withdraw(
        &mut self,
        provider: &mut ProviderPosition,
        lp_amount: u64,
    ) -> Result<(u64, u64), LendingError> {
        if &provider.pool != &self.pool_key {
            return Err(LendingError::MintMismatch);
        }
        if lp_amount == 0 {
            return Err(LendingError::InvalidParameters);
        }
        if lp_amount > provider.lp_tokens {
            return Err(LendingError::InsufficientBalance);
        }
        let (out_a, out_b) = math::withdraw_amounts(
            self.pool.reserve_a,
            self.pool.reserve_b,
            self.pool.lp_supply,
            lp_amount,
        )?;
        if self.pool.total_borrowed() > 0 {
            let left_a = sub_u64(self.pool.reserve_a, out_a)?;
            let left_b = sub_u64(self.pool.reserve_b, out_b)?;
            if left_a < self.pool.min_liquidity || left_b < self.pool.min_liquidity {
                return Err(LendingError::InsufficientLiquidity);
            }
        }
        self.pool.apply_withdraw(lp_amount, out_a, out_b)?;
        provider.record_withdraw(lp_amount)?;
        Ok((out_a, out_b))
    }

    /// Borrow against posted collateral, returning the origination fee
    #[allow(clippy::too_many_arguments)]
    pub fn borrow(
        &mut self,
        position: &mut BorrowPosition,
        wanted_mint: &Pubkey,
        giving_mint: &Pubkey,
        collateral_amount: u64,
        borrow_amount: u64,
        duration: u8,
        now: i64,
    ) -> Result<u64, LendingError> {
        let side = self.pool.side_for(wanted_mint, giving_mint)?;
        let duration = BorrowDuration::from_u8(duration)?;
        if borrow_amount == 0 {
            return Err(LendingError::InvalidParameters);
        }
        if position.is_active()
            && (position.side() != side || &position.pool != &self.pool_key)
        {
            return Err(LendingError::MintMismatch);
        }

        position.settle(self.pool.interest_rate_bps, now)?;

        let (reserve_wanted, reserve_giving) = self.pool.reserves_for(side);
        if borrow_amount > reserve_wanted
            || sub_u64(reserve_wanted, borrow_amount)? < self.pool.min_liquidity
        {
            return Err(LendingError::InsufficientLiquidity);
        }

        let collateral_total = if position.is_active() {
            add_u64(position.collateral, collateral_amount)?
        } else {
            collateral_amount
        };
        if collateral_total == 0 {
            return Err(LendingError::InvalidParameters);
        }
        let debt_after = add_u64(position.debt_total()?, borrow_amount)?;
        let limit = math::borrow_limit(
            collateral_total,
            reserve_wanted,
            reserve_giving,
            borrow_amount,
            self.pool.ltv_ratio,
        )?;
        if debt_after > limit {
            return Err(LendingError::ExceedsLtv);
        }

        let fee = math::origination_fee(borrow_amount, self.pool.interest_rate_bps)?;
        self.pool
            .apply_borrow(side, collateral_amount, borrow_amount, fee)?;
        position.apply_borrow(
            &self.pool_key,
            side,
            collateral_amount,
            borrow_amount,
            duration,
            now,
        )?;
        Ok(fee)
    }

    /// Repay debt, returning released collateral (zero unless fully repaid)
    pub fn repay(
        &mut self,
        position: &mut BorrowPosition,
        repay_amount: u64,
        now: i64,
    ) -> Result<u64, LendingError> {
        if &position.pool != &self.pool_key || !position.is_active() {
            return Err(LendingError::InvalidRepayAmount);
        }
        position.settle(self.pool.interest_rate_bps, now)?;

        let debt = position.debt_total()?;
        if repay_amount == 0 || repay_amount > debt {
            return Err(LendingError::InvalidRepayAmount);
        }

        let side = position.side();
        let interest_paid = repay_amount.min(position.accrued_interest);
        let principal_paid = repay_amount - interest_paid;

        self.pool.apply_repay(side, principal_paid, interest_paid)?;
        let released = position.apply_repay(interest_paid, principal_paid)?;
        if released > 0 {
            self.pool.release_collateral(side, released)?;
        }
        Ok(released)
    }

    /// Liquidate an unhealthy or expired position, returning
    /// (seized, returned) collateral
    pub fn liquidate(
        &mut self,
        position: &mut BorrowPosition,
        now: i64,
    ) -> Result<(u64, u64), LendingError> {
        if &position.pool != &self.pool_key || !position.is_active() {
            return Err(LendingError::NotLiquidatable);
        }
        position.settle(self.pool.interest_rate_bps, now)?;

        let side = position.side();
        let (reserve_wanted, reserve_giving) = self.pool.reserves_for(side);
        let debt = position.debt_total()?;
        let health = math::health_ratio(
            position.collateral,
            reserve_wanted,
            reserve_giving,
            debt,
            self.pool.liquidation_threshold,
        )?;
        if health >= math::HEALTHY_RATIO && !position.is_expired(now)? {
            return Err(LendingError::NotLiquidatable);
        }

        let (seized, returned) = math::seizure_split(
            debt,
            self.pool.liquidation_penalty,
            reserve_wanted,
            reserve_giving,
            position.collateral,
        )?;
        self.pool.apply_liquidation(
            side,
            position.borrowed,
            position.accrued_interest,
            seized,
            returned,
        )?;
        position.apply_liquidation();
        Ok((seized, returned))
    }

    /// Creator-only fee extraction
    pub fn collect_fees(&mut self, caller: &Pubkey) -> Result<(u64, u64), LendingError> {
        if &self.pool.authority != caller {
            return Err(LendingError::Unauthorized);
        }
        Ok(self.pool.collect_fees())
    }

    /// Current health ratio of a position, in percent
    pub fn health_of(&self, position: &BorrowPosition) -> u64 {
        let side = position.side();
        let (reserve_wanted, reserve_giving) = self.pool.reserves_for(side);
        math::health_ratio(
            position.collateral,
            reserve_wanted,
            reserve_giving,
            position.debt_total().unwrap_or(u64::MAX),
            self.pool.liquidation_threshold,
        )
        .unwrap_or(0)
    }
}
