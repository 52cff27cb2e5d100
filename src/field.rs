//! Field arithmetic wrapper.
//!
//! The field is ℤ/Mℤ where `M` is the Prio prime
//! `0x8000000000000000080001` (87 significant bits, `M - 1` divisible by
//! `2^19`). We do not hand-roll modular arithmetic: [`Field`] is a thin
//! adapter over `ark-ff`'s `Fp` family (the crate's external big-integer
//! library, per the teacher's own `pub type F = ark_bn254::Fr;` alias in
//! `lib.rs`), instantiated here for a custom modulus via `MontConfig`
//! rather than reusing a curve's scalar field, since Prio has no elliptic
//! curve in it.

#![allow(missing_docs)]

use ark_ff::{BigInteger, Field as ArkField, Fp128, MontBackend, MontConfig, PrimeField};

/// Montgomery configuration for the Prio modulus.
///
/// `generator = 3` is a primitive root of `(Z/MZ)*`; the crate never uses
/// `ark-ff`'s own two-adic FFT machinery (we implement `domain::fft`
/// ourselves against a precomputed root-of-unity table), so only the
/// modulus itself is load-bearing here.
#[derive(MontConfig)]
#[modulus = "154742504910672534362914817"]
#[generator = "3"]
pub struct PrioFieldConfig;

/// The Prio scalar field, `ℤ/Mℤ`.
pub type Field = Fp128<MontBackend<PrioFieldConfig, 2>>;

/// `M` as a `u128`, for rejection-sampling bounds checks that need to compare
/// against the modulus without going through field arithmetic.
pub const MODULUS_U128: u128 = 154742504910672534362914817;

/// `2^{-1} mod M`, used when folding the two halves of a proof polynomial's
/// cross term into a single share.
pub fn inv2() -> Field {
    Field::from(2u64).inverse().expect("2 is invertible mod an odd prime")
}

/// Build a field element from a big-endian byte string, reduced mod `M`.
///
/// Used to derive a shared evaluation point from a shorter shared secret;
/// the reduction is lossy and non-uniform by construction, which is fine
/// since the secret is far shorter than `M` and the resulting bias is
/// cryptographically negligible.
pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Field {
    Field::from_be_bytes_mod_order(bytes)
}

/// Truncate a field element to its low-order 64 bits.
///
/// Mirrors `examples/original_source/prio/server.c`'s
/// `output[i] = tmp.dp[0]` in `PrioTotalShare_final`: callers are
/// responsible for ensuring aggregated sums fit in the output type.
pub fn low_u64(f: &Field) -> u64 {
    f.into_bigint().as_ref()[0]
}
