//! Crate-wide error type.
//!
//! Follows the teacher's "precise error, never UB" discipline
//! (`lib.rs`'s module doc: "the failure mode is a **precise error**") and its
//! `thiserror`-derived enums (`scheduler::ProveError`,
//! `scheduler::VerifySchedError`, `domain::DomainError`). A rejected client
//! packet is deliberately **not** an error variant here: failing the
//! validity check is a non-fatal negative result, surfaced as `Ok(false)`
//! from `Verifier::is_valid`, not an `Err`.

use thiserror::Error;

/// Errors produced by this crate's constructors and stateful operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Heap exhaustion during construction of a sized buffer.
    #[error("allocation failure: {0}")]
    Allocation(String),

    /// Invalid argument: length mismatch, wrong-server packet, zero modulus
    /// passed to `rand_int`, malformed domain size, etc.
    #[error("domain error: {0}")]
    Domain(&'static str),

    /// The underlying field/big-integer operation failed (e.g. inverting
    /// zero). Treated as fatal; callers should not retry.
    #[error("arithmetic failure: {0}")]
    Arithmetic(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
