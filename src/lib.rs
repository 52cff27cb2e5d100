//! Crate root: public surface for the two-server private Boolean
//! aggregation engine.
//!
//! This module centralizes the module list and the small set of top-level
//! re-exports downstream callers need to drive one client packet through
//! both servers: build a [`Config`], encode a client's Boolean vector with
//! [`Client`], stage and run the two-round [`Verifier`] protocol on each
//! server, and recombine accepted [`TotalShare`]s.
//!
//! ## Invariants
//!
//! - All field arithmetic happens modulo the configured prime; there is no
//!   implicit conversion between [`Field`] and plain integers outside the
//!   `rand_source`/`prg` boundary.
//! - A [`Verifier`] is single-use: its state machine
//!   (`Created → DataSet → Round1Sent → Round2Sent → Decided`) is linear
//!   and non-retryable. A new verifier is required per client packet.
//! - This crate performs no network I/O and no packet encryption to a
//!   target server; transport and key management are the caller's
//!   responsibility.
//!
//! If any invariant is violated at runtime, the failure mode is a
//! **precise error** (never UB, never a panic in non-test code).

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

/// Crate-wide error type.
pub mod error;
/// Field arithmetic wrapper over `ark-ff`.
pub mod field;
/// Byte-source capability and rejection-sampled integer generation.
pub mod rand_source;
/// AES-128-CTR pseudorandom generator.
pub mod prg;
/// Dynamically sized array of field elements.
pub mod farray;
/// Immutable, shareable protocol configuration.
pub mod config;
/// FFT over roots of unity and polynomial evaluation.
pub mod domain;
/// Beaver triples for one-round secret multiplication.
pub mod beaver;
/// Client-side packet construction.
pub mod client;
/// Per-server aggregate state and final recombination.
pub mod server;
/// The two-round SNIP validation protocol.
pub mod verifier;

pub use beaver::BeaverTriple;
pub use client::{Client, ClientPacket, ClientPacketRole};
pub use config::Config;
pub use error::{Error, Result};
pub use farray::FieldArray;
pub use field::Field;
pub use prg::{Prg, Seed};
pub use server::{Server, ServerId, TotalShare};
pub use verifier::{MasterSeed, Verifier, VerifyMessage1, VerifyMessage2, SOUNDNESS_PARAM};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand_source::OsByteSource;

    /// Drive one client's packet pair through both servers end to end and
    /// fold it into each server's running aggregate.
    fn submit_client(cfg: &Config, data: &[bool], server_a: &mut Server, server_b: &mut Server) {
        let mut src = OsByteSource;
        let (pa, pb) = Client::encode(cfg, data, &mut src).unwrap();
        let secret = [9u8; SOUNDNESS_PARAM];

        let mut va = Verifier::new(cfg, ServerId::A);
        let mut vb = Verifier::new(cfg, ServerId::B);
        va.set_data(pa, &secret).unwrap();
        vb.set_data(pb, &secret).unwrap();

        let m1a = va.round1().unwrap();
        let m1b = vb.round1().unwrap();
        let m2a = va.round2(&m1a, &m1b).unwrap();
        let m2b = vb.round2(&m1a, &m1b).unwrap();

        assert!(va.is_valid(&m2a, &m2b).unwrap());
        assert!(vb.is_valid(&m2a, &m2b).unwrap());

        server_a.aggregate(&va).unwrap();
        server_b.aggregate(&vb).unwrap();
    }

    /// `L = 100`; ten clients `c = 0..9` each submitting
    /// `b[i] = (i % 3 == 1) || (c % 5 == 3)`. Verifies mixed-sparsity
    /// aggregation end to end through the public API only.
    #[test]
    fn mixed_sparsity_aggregation_matches_expected_counts() {
        let l = 100;
        let cfg = Config::new(l).unwrap();
        let mut server_a = Server::new(&cfg, ServerId::A);
        let mut server_b = Server::new(&cfg, ServerId::B);

        let clients_with_c_mod_5_eq_3 = (0..10).filter(|c| c % 5 == 3).count() as u64;

        for c in 0..10u32 {
            let data: Vec<bool> = (0..l).map(|i| (i % 3 == 1) || (c % 5 == 3)).collect();
            submit_client(&cfg, &data, &mut server_a, &mut server_b);
        }

        let ta = server_a.total_share();
        let tb = server_b.total_share();
        let out = TotalShare::finalize(&cfg, &ta, &tb).unwrap();

        for i in 0..l {
            let expected = if i % 3 == 1 { 10 } else { clients_with_c_mod_5_eq_3 };
            assert_eq!(out[i], expected, "field {i} mismatch");
        }
    }

    /// Order of aggregation must not affect the final result: mod-M
    /// addition is commutative and associative.
    #[test]
    fn aggregation_is_order_independent() {
        let cfg = Config::new(4).unwrap();
        let inputs: Vec<Vec<bool>> = vec![
            vec![true, false, true, true],
            vec![false, false, true, false],
            vec![true, true, false, false],
        ];

        let mut server_a_fwd = Server::new(&cfg, ServerId::A);
        let mut server_b_fwd = Server::new(&cfg, ServerId::B);
        for data in &inputs {
            submit_client(&cfg, data, &mut server_a_fwd, &mut server_b_fwd);
        }
        let out_fwd = TotalShare::finalize(&cfg, &server_a_fwd.total_share(), &server_b_fwd.total_share()).unwrap();

        let mut server_a_rev = Server::new(&cfg, ServerId::A);
        let mut server_b_rev = Server::new(&cfg, ServerId::B);
        for data in inputs.iter().rev() {
            submit_client(&cfg, data, &mut server_a_rev, &mut server_b_rev);
        }
        let out_rev = TotalShare::finalize(&cfg, &server_a_rev.total_share(), &server_b_rev.total_share()).unwrap();

        assert_eq!(out_fwd, out_rev);
    }
}
