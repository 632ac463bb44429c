//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm for fast, deterministic random draws.
//! CRITICAL: All randomness in an episode MUST go through this module —
//! detection outcomes and ensemble detection thresholds are the only
//! stochastic operations in the core.

mod xorshift;

pub use xorshift::RngManager;
