//! Cascade Integration Tests
//!
//! End-to-end scenario tests for the lending protocol state machine.
//!
//! Note: These tests drive the pool/position state and math directly rather
//! than through a deployed BPF binary. For full on-chain tests with
//! solana-program-test, the program must be compiled to a .so file and
//! loaded via ProgramTest::add_program().

pub mod harness;

pub use cascade_common;
pub use cascade_lending;

/// Make a unique 32-byte key for simulated accounts
pub fn unique_key() -> [u8; 32] {
    solana_sdk::pubkey::Pubkey::new_unique().to_bytes()
}
