//! Account state

pub mod borrower;
pub mod pool;
pub mod provider;

pub use borrower::*;
pub use pool::*;
pub use provider::*;
