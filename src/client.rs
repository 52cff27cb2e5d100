//! Client-side encoding: turn a Boolean vector into a role-tagged packet
//! pair, one for each server, carrying additive shares of the data plus a
//! SNIP proof that every entry is actually Boolean.

use ark_ff::Zero;
use tracing::debug;

use crate::beaver::BeaverTriple;
use crate::config::Config;
use crate::domain::fft;
use crate::error::{Error, Result};
use crate::farray::FieldArray;
use crate::field::Field;
use crate::prg::{Prg, Seed};
use crate::rand_source::{rand_field, share_int, ByteSource};

/// One server's half of a client submission.
///
/// Server A's payload is explicit; server B's is a single seed the PRG
/// compression trick lets it re-derive at verification time.
#[derive(Clone, Debug, ark_serialize::CanonicalSerialize, ark_serialize::CanonicalDeserialize)]
pub enum ClientPacketRole {
    ServerA {
        data_shares: FieldArray,
        h_points: FieldArray,
    },
    ServerB {
        seed: Seed,
    },
}

/// A complete per-server client packet: the role-specific payload plus the
/// parts common to both servers (the f(0)/g(0)/h(0) shares and this
/// server's half of the Beaver triple).
#[derive(Clone, Debug, ark_serialize::CanonicalSerialize, ark_serialize::CanonicalDeserialize)]
pub struct ClientPacket {
    pub f0_share: Field,
    pub g0_share: Field,
    pub h0_share: Field,
    pub triple: BeaverTriple,
    pub role: ClientPacketRole,
}

impl ClientPacket {
    /// `true` if this packet's role matches server A's shape.
    pub fn is_server_a(&self) -> bool {
        matches!(self.role, ClientPacketRole::ServerA { .. })
    }
}

pub fn next_power_of_two(n: usize) -> usize {
    n.next_power_of_two()
}

/// Stateless client-side packet construction.
pub struct Client;

impl Client {
    /// Encode `data` (one Boolean per configured data field) into the
    /// packet pair for servers A and B.
    ///
    /// Grounded on `examples/original_source/prio/client.c`'s
    /// `PrioPacketClient_set_data` / `share_polynomials` /
    /// `data_polynomial_evals`.
    pub fn encode(
        cfg: &Config,
        data: &[bool],
        source: &mut impl ByteSource,
    ) -> Result<(ClientPacket, ClientPacket)> {
        let l = cfg.num_data_fields();
        if data.len() != l {
            return Err(Error::Domain("data length does not match configured field count"));
        }

        let n = l + 1;
        let big_n = next_power_of_two(n);

        let seed = Seed::random(source);
        let mut prg_b = Prg::new(&seed);

        let (triple_a, triple_b) = BeaverTriple::rand_pair(source)?;

        let client_data = FieldArray::from_vec(
            data.iter().map(|&b| if b { Field::from(1u64) } else { Field::zero() }).collect(),
        );
        let data_shares_a = client_data.share_split(&mut prg_b)?;

        let mut points_f = FieldArray::new(big_n);
        let f0 = rand_field(source)?;
        points_f.set(0, f0);
        for i in 1..n {
            points_f.set(i, client_data.get(i - 1));
        }

        let mut points_g = FieldArray::new(big_n);
        let g0 = rand_field(source)?;
        points_g.set(0, g0);
        for i in 1..n {
            points_g.set(i, client_data.get(i - 1) - Field::from(1u64));
        }

        let evals_f = evaluate_at_all_2n_roots(cfg, &points_f)?;
        let evals_g = evaluate_at_all_2n_roots(cfg, &points_g)?;

        let h0 = f0 * g0;

        let (f0_share_a, f0_share_b) = share_int(source, f0)?;
        let (g0_share_a, g0_share_b) = share_int(source, g0)?;
        let (h0_share_a, h0_share_b) = share_int(source, h0)?;

        let mut h_points_a = FieldArray::new(big_n);
        let mut j = 0;
        let mut i = 1;
        while i < 2 * big_n {
            let h_val = evals_f.get(i) * evals_g.get(i);
            h_points_a.set(j, prg_b.share_int(h_val)?);
            j += 1;
            i += 2;
        }

        debug!(num_data_fields = l, n = big_n, "client packet encoded");

        let packet_a = ClientPacket {
            f0_share: f0_share_a,
            g0_share: g0_share_a,
            h0_share: h0_share_a,
            triple: triple_a,
            role: ClientPacketRole::ServerA { data_shares: data_shares_a, h_points: h_points_a },
        };
        let packet_b = ClientPacket {
            f0_share: f0_share_b,
            g0_share: g0_share_b,
            h0_share: h0_share_b,
            triple: triple_b,
            role: ClientPacketRole::ServerB { seed },
        };

        Ok((packet_a, packet_b))
    }
}

/// Interpolate `points` (length `N`, a power of two) through the `N`-th
/// roots of unity, zero-extend the resulting coefficients to `2N`, and
/// evaluate at every `2N`-th root — i.e. degree-`<N` polynomial coefficients
/// reinterpreted as evaluations over a domain twice the size.
fn evaluate_at_all_2n_roots(cfg: &Config, points: &FieldArray) -> Result<FieldArray> {
    let coeffs = fft(cfg, points.as_slice(), true)?;
    let mut coeffs = FieldArray::from_vec(coeffs);
    coeffs.resize(2 * points.len());
    let evals = fft(cfg, coeffs.as_slice(), false)?;
    Ok(FieldArray::from_vec(evals))
}
