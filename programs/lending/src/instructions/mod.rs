//! Instruction processors

pub mod borrow_funds;
pub mod collect_fees;
pub mod init_provider;
pub mod initialize_pool;
pub mod liquidate;
pub mod provide_liquidity;
pub mod repay_funds;
pub mod withdraw_liquidity;

pub use borrow_funds::process_borrow_funds;
pub use collect_fees::process_collect_fees;
pub use init_provider::process_initialize_provider;
pub use initialize_pool::{process_initialize_pool, process_update_parameters};
pub use liquidate::process_liquidate;
pub use provide_liquidity::process_provide_liquidity;
pub use repay_funds::process_repay_funds;
pub use withdraw_liquidity::process_withdraw_liquidity;
