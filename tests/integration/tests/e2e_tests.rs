//! End-to-end scenario tests for the lending protocol
//!
//! Each test drives the full operation sequence (settle, check, apply)
//! through the simulated market harness, mirroring what the instruction
//! processors run on-chain.

use cascade_common::LendingError;
use cascade_integration_tests::harness::SimMarket;
use cascade_integration_tests::unique_key;
use cascade_lending::math;
use cascade_lending::state::PositionStatus;
use solana_program_test::tokio;

const RATE_BPS: u16 = 300; // 3% annual

fn standard_market() -> (SimMarket, [u8; 32], [u8; 32], [u8; 32]) {
    let creator = unique_key();
    let mint_a = unique_key();
    let mint_b = unique_key();
    let market = SimMarket::create(creator, mint_a, mint_b, 80, 85, 5, RATE_BPS, 0).unwrap();
    (market, creator, mint_a, mint_b)
}

/// The reference scenario: create, seed 150/150, borrow 15 against 150
#[tokio::test]
async fn test_e2e_pool_provide_borrow() {
    let (mut market, _creator, mint_a, mint_b) = standard_market();

    // First deposit from zero reserves mints sqrt(150 * 150) = 150 LP
    let mut provider = market.new_provider(unique_key());
    let quote = market.provide(&mut provider, 150, 150).unwrap();
    assert_eq!(quote.minted, 150);
    assert_eq!(market.pool.reserve_a, 150);
    assert_eq!(market.pool.reserve_b, 150);
    assert_eq!(market.pool.lp_supply, 150);
    assert_eq!(provider.lp_tokens, 150);

    // Borrow 15 of A against 150 of B, duration tier 0
    let mut borrower = market.new_borrower(unique_key());
    market
        .borrow(&mut borrower, &mint_a, &mint_b, 150, 15, 0, 0)
        .unwrap();

    // Reserve A decreases by the draw, collateral B increases by 150
    assert_eq!(market.pool.reserve_a, 135);
    assert_eq!(market.pool.reserve_b, 150);
    assert_eq!(market.pool.collateral_b, 150);
    assert_eq!(market.pool.total_borrowed_a, 15);
    assert_eq!(borrower.borrowed, 15);
    assert_eq!(borrower.collateral, 150);

    // Debt sits comfortably under the post-trade limit
    let limit = math::borrow_limit(150, 150, 150, 15, 80).unwrap();
    assert_eq!(limit, 108);
    assert!(borrower.debt_total().unwrap() <= limit);

    // And the position is healthy
    assert!(market.health_of(&borrower) >= math::HEALTHY_RATIO);
}

/// LP minting stays proportional and a full exit returns the deposits
#[tokio::test]
async fn test_e2e_lp_proportionality_round_trip() {
    let (mut market, _creator, _mint_a, _mint_b) = standard_market();

    let mut first = market.new_provider(unique_key());
    let quote = market.provide(&mut first, 1_000_000, 4_000_000).unwrap();
    assert_eq!(quote.minted, 2_000_000); // sqrt(1e6 * 4e6)

    // A proportional second deposit mints proportional LP
    let mut second = market.new_provider(unique_key());
    let quote = market.provide(&mut second, 500_000, 2_000_000).unwrap();
    assert_eq!(quote.minted, 1_000_000);
    assert_eq!(quote.used_a, 500_000);
    assert_eq!(quote.used_b, 2_000_000);

    // An over-supplied deposit consumes only the proportional amounts
    let mut third = market.new_provider(unique_key());
    let quote = market.provide(&mut third, 300_000, 9_999_999).unwrap();
    assert_eq!(quote.used_a, 300_000);
    assert_eq!(quote.used_b, 1_200_000);

    // Full exit for the second provider returns exactly the deposits
    let (out_a, out_b) = market.withdraw(&mut second, 1_000_000).unwrap();
    assert_eq!(out_a, 500_000);
    assert_eq!(out_b, 2_000_000);
    assert_eq!(second.lp_tokens, 0);
    assert_eq!(second.pool, [0u8; 32]);
}

/// Borrow, accrue a year of interest, repay in two installments, exit
#[tokio::test]
async fn test_e2e_borrow_repay_lifecycle() {
    let (mut market, creator, mint_a, mint_b) = standard_market();

    let mut provider = market.new_provider(unique_key());
    market.provide(&mut provider, 1_000_000, 1_000_000).unwrap();

    let mut borrower = market.new_borrower(unique_key());
    let fee = market
        .borrow(&mut borrower, &mint_a, &mint_b, 500_000, 100_000, 0, 0)
        .unwrap();

    // Origination fee: 30 bps of the draw, diverted into the fee vault
    assert_eq!(fee, 300);
    assert_eq!(market.pool.reserve_a, 900_000);
    assert_eq!(market.pool.fee_a, 300);
    assert_eq!(market.pool.collateral_b, 500_000);

    // One year later: 3% simple interest on the principal
    let later = math::SECONDS_PER_YEAR;
    let released = market.repay(&mut borrower, 43_000, later).unwrap();
    assert_eq!(released, 0);
    assert_eq!(borrower.accrued_interest, 0); // 3_000 interest covered first
    assert_eq!(borrower.borrowed, 60_000);
    assert_eq!(market.pool.fee_a, 3_300);
    assert_eq!(market.pool.reserve_a, 940_000);
    assert_eq!(market.pool.total_borrowed_a, 60_000);

    // Settle the remainder at the same instant: no further interest
    let released = market.repay(&mut borrower, 60_000, later).unwrap();
    assert_eq!(released, 500_000);
    assert_eq!(borrower.status().unwrap(), PositionStatus::Repaid);
    assert_eq!(market.pool.reserve_a, 1_000_000);
    assert_eq!(market.pool.collateral_b, 0);
    assert_eq!(market.pool.total_borrowed(), 0);

    // Over- and zero-repayments are rejected once closed
    assert_eq!(
        market.repay(&mut borrower, 1, later),
        Err(LendingError::InvalidRepayAmount)
    );

    // Fee extraction is creator-only
    assert_eq!(
        market.collect_fees(&unique_key()),
        Err(LendingError::Unauthorized)
    );
    assert_eq!(market.collect_fees(&creator).unwrap(), (3_300, 0));

    // The provider exits with the full reserves
    let (out_a, out_b) = market.withdraw(&mut provider, 1_000_000).unwrap();
    assert_eq!(out_a, 1_000_000);
    assert_eq!(out_b, 1_000_000);
}

/// Parameter updates are creator-gated and re-price health lazily
#[tokio::test]
async fn test_e2e_update_parameters_and_liquidation() {
    let (mut market, creator, mint_a, mint_b) = standard_market();

    let mut provider = market.new_provider(unique_key());
    market.provide(&mut provider, 1_000_000, 1_000_000).unwrap();

    let mut borrower = market.new_borrower(unique_key());
    market
        .borrow(&mut borrower, &mint_a, &mint_b, 100_000, 60_000, 1, 0)
        .unwrap();

    // Healthy at the original threshold: 94_000 * 85 / 60_000 = 133%
    assert_eq!(market.health_of(&borrower), 133);
    assert_eq!(
        market.liquidate(&mut borrower, 0),
        Err(LendingError::NotLiquidatable)
    );

    // A stranger cannot move the parameters
    let ltv_before = market.pool.ltv_ratio;
    assert_eq!(
        market.update_parameters(&unique_key(), 40, 50, 5, RATE_BPS),
        Err(LendingError::Unauthorized)
    );
    assert_eq!(market.pool.ltv_ratio, ltv_before);

    // Ordering violations are rejected even for the creator
    assert_eq!(
        market.update_parameters(&creator, 50, 50, 5, RATE_BPS),
        Err(LendingError::InvalidParameters)
    );

    // The creator tightens the threshold; the position re-prices on touch
    market
        .update_parameters(&creator, 40, 50, 5, RATE_BPS)
        .unwrap();
    assert_eq!(market.health_of(&borrower), 78);

    let (seized, returned) = market.liquidate(&mut borrower, 0).unwrap();

    // Claim: 60_000 * 105% = 63_000 of A, at spot 940_000 A per 1_000_000 B
    assert_eq!(seized, 67_021);
    assert_eq!(returned, 32_979);
    assert_eq!(seized + returned, 100_000);

    // The liquidator's repayment restored the reserve
    assert_eq!(market.pool.reserve_a, 1_000_000);
    assert_eq!(market.pool.total_borrowed(), 0);
    assert_eq!(market.pool.collateral_b, 0);
    assert_eq!(borrower.status().unwrap(), PositionStatus::Liquidated);
    assert_eq!(borrower.collateral, 0);
}

/// A healthy loan becomes liquidatable once its term expires
#[tokio::test]
async fn test_e2e_expired_loan_liquidation() {
    let (mut market, _creator, mint_a, mint_b) = standard_market();

    let mut provider = market.new_provider(unique_key());
    market.provide(&mut provider, 1_000_000, 1_000_000).unwrap();

    let mut borrower = market.new_borrower(unique_key());
    market
        .borrow(&mut borrower, &mint_a, &mint_b, 100_000, 10_000, 0, 0)
        .unwrap();

    let term = 10 * 86_400;

    // Still healthy and still within term
    assert_eq!(
        market.liquidate(&mut borrower, term),
        Err(LendingError::NotLiquidatable)
    );

    // One second past expiry the position goes regardless of health
    assert!(market.health_of(&borrower) >= math::HEALTHY_RATIO);
    let (seized, returned) = market.liquidate(&mut borrower, term + 1).unwrap();
    assert_eq!(seized + returned, 100_000);
    assert_eq!(market.pool.total_borrowed(), 0);
    assert_eq!(borrower.status().unwrap(), PositionStatus::Liquidated);
}

/// Borrow-side guard rails: LTV, liquidity floor, mint pairing
#[tokio::test]
async fn test_e2e_borrow_rejections() {
    let (mut market, _creator, mint_a, mint_b) = standard_market();

    let mut provider = market.new_provider(unique_key());
    market.provide(&mut provider, 1_000_000, 1_000_000).unwrap();

    let mut borrower = market.new_borrower(unique_key());

    // Over the post-trade limit: 100_000 * 920_000 * 80 / 1e8 = 73_600
    assert_eq!(
        market.borrow(&mut borrower, &mint_a, &mint_b, 100_000, 80_000, 0, 0),
        Err(LendingError::ExceedsLtv)
    );

    // Draining the reserve past the floor
    assert_eq!(
        market.borrow(&mut borrower, &mint_a, &mint_b, 100_000_000, 999_950, 0, 0),
        Err(LendingError::InsufficientLiquidity)
    );

    // Wrong asset pair
    let stranger_mint = unique_key();
    assert_eq!(
        market.borrow(&mut borrower, &stranger_mint, &mint_b, 100_000, 1_000, 0, 0),
        Err(LendingError::MintMismatch)
    );

    // Unknown duration tier
    assert_eq!(
        market.borrow(&mut borrower, &mint_a, &mint_b, 100_000, 1_000, 9, 0),
        Err(LendingError::InvalidDuration)
    );

    // Nothing was applied along the way
    assert_eq!(market.pool.reserve_a, 1_000_000);
    assert_eq!(market.pool.total_borrowed(), 0);
    assert!(!borrower.is_active());
}

/// The invariant product only decreases via withdrawal or fee extraction
#[tokio::test]
async fn test_e2e_invariant_product_across_deposits() {
    let (mut market, _creator, _mint_a, _mint_b) = standard_market();

    let mut product = 0u128;
    for (a, b) in [(150u64, 150u64), (75, 75), (1_000, 333), (9, 9_999)] {
        let mut provider = market.new_provider(unique_key());
        if market.provide(&mut provider, a, b).is_ok() {
            let next = (market.pool.reserve_a as u128) * (market.pool.reserve_b as u128);
            assert!(next >= product);
            product = next;
        }
    }
}
