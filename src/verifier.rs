//! The two-round SNIP validation protocol: check that a client's secret
//! shared `f`, `g`, `h` satisfy `f(r)·g(r) = h(r)` at a point `r` neither
//! server controls, without reconstructing `f`, `g`, or `h` in the clear.

use ark_ff::Zero;
use tracing::{debug, info};

use crate::client::{next_power_of_two, ClientPacket, ClientPacketRole};
use crate::config::Config;
use crate::domain::interp_evaluate;
use crate::error::{Error, Result};
use crate::farray::FieldArray;
use crate::field::{from_be_bytes_mod_order, Field};
use crate::prg::{Prg, Seed};
use crate::server::ServerId;

/// Length in bytes of the shared secret from which the SNIP evaluation
/// point `r` is derived.
pub const SOUNDNESS_PARAM: usize = 20;

/// A long-lived secret shared between the two servers, expanded into a
/// fresh per-packet evaluation secret via AES-CTR keyed on the master seed
/// and a packet counter both servers agree on.
///
/// Supplements the distilled validation protocol with the master-seed /
/// per-packet-secret split `examples/original_source/prio/server.c` assumes
/// but never names as a standalone type.
pub struct MasterSeed(Seed);

impl MasterSeed {
    pub fn new(seed: Seed) -> Self {
        MasterSeed(seed)
    }

    /// Derive the `SOUNDNESS_PARAM`-byte secret for packet `counter`. Both
    /// servers must call this with the same counter for the same packet.
    pub fn derive_packet_secret(&self, counter: u64) -> [u8; SOUNDNESS_PARAM] {
        let mut prg = Prg::new_with_nonce(&self.0, counter);
        let bytes = prg.get_bytes(SOUNDNESS_PARAM);
        let mut out = [0u8; SOUNDNESS_PARAM];
        out.copy_from_slice(&bytes);
        out
    }
}

/// Per-packet verifier lifecycle. Transitions are linear and
/// non-retryable — a new [`Verifier`] is required per client packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VerifierState {
    Created,
    DataSet,
    Round1Sent,
    Round2Sent,
    Decided(bool),
}

/// Additive shares of the Beaver-triple corrections `d = f(r) - a` and
/// `e = g(r) - b`, exchanged between the two servers after round 1.
#[derive(Clone, Copy, Debug, ark_serialize::CanonicalSerialize, ark_serialize::CanonicalDeserialize)]
pub struct VerifyMessage1 {
    pub share_d: Field,
    pub share_e: Field,
}

/// A server's share of the output-wire value; the packet is valid iff the
/// two servers' shares sum to zero.
#[derive(Clone, Copy, Debug, ark_serialize::CanonicalSerialize, ark_serialize::CanonicalDeserialize)]
pub struct VerifyMessage2 {
    pub share_out: Field,
}

/// State owned by one server while validating one client packet.
///
/// Grounded on `examples/original_source/prio/server.c`'s `PrioVerifier`
/// and its `compute_shares` / `PrioPacketVerify1_set_data` /
/// `PrioPacketVerify2_set_data` / `PrioVerifier_isValid`.
pub struct Verifier<'cfg> {
    cfg: &'cfg Config,
    idx: ServerId,
    state: VerifierState,
    packet: Option<ClientPacket>,
    data_share: Option<FieldArray>,
    share_f_r: Field,
    share_g_r: Field,
    share_h_r: Field,
}

impl<'cfg> Verifier<'cfg> {
    pub fn new(cfg: &'cfg Config, idx: ServerId) -> Self {
        Verifier {
            cfg,
            idx,
            state: VerifierState::Created,
            packet: None,
            data_share: None,
            share_f_r: Field::zero(),
            share_g_r: Field::zero(),
            share_h_r: Field::zero(),
        }
    }

    pub fn idx(&self) -> ServerId {
        self.idx
    }

    /// Stage a client packet: reconstitute this server's data/h-point
    /// arrays (directly for A, PRG-expanded for B), derive the shared
    /// evaluation point `r` from `secret`, and compute this server's shares
    /// of `f(r)`, `g(r)`, `h(r)`.
    pub fn set_data(&mut self, packet: ClientPacket, secret: &[u8; SOUNDNESS_PARAM]) -> Result<()> {
        if self.state != VerifierState::Created {
            return Err(Error::Domain("set_data called out of order"));
        }
        let expects_a = matches!(self.idx, ServerId::A);
        if packet.is_server_a() != expects_a {
            return Err(Error::Domain("packet is tagged for the wrong server"));
        }

        let l = self.cfg.num_data_fields();
        let n = next_power_of_two(l + 1);

        let (data_share, h_points) = match &packet.role {
            ClientPacketRole::ServerA { data_shares, h_points } => {
                if data_shares.len() != l {
                    return Err(Error::Domain("data share array has the wrong length"));
                }
                if h_points.len() != n {
                    return Err(Error::Domain("h-points array has the wrong length"));
                }
                (data_shares.clone(), h_points.clone())
            }
            ClientPacketRole::ServerB { seed } => {
                let mut prg = Prg::new(seed);
                let mut data_share = FieldArray::new(l);
                prg.get_array(&mut data_share)?;
                let mut h_points = FieldArray::new(n);
                prg.get_array(&mut h_points)?;
                (data_share, h_points)
            }
        };

        let r = from_be_bytes_mod_order(secret);

        let mut points_f = FieldArray::new(n);
        points_f.set(0, packet.f0_share);
        let mut points_g = FieldArray::new(n);
        points_g.set(0, packet.g0_share);
        for i in 1..(l + 1) {
            let share = data_share.get(i - 1);
            points_f.set(i, share);
            points_g.set(i, if expects_a { share - Field::from(1u64) } else { share });
        }

        let mut points_h = FieldArray::new(2 * n);
        points_h.set(0, packet.h0_share);
        let mut j = 0;
        let mut i = 1;
        while i < 2 * n {
            points_h.set(i, h_points.get(j));
            j += 1;
            i += 2;
        }

        self.share_f_r = interp_evaluate(self.cfg, points_f.as_slice(), r)?;
        self.share_g_r = interp_evaluate(self.cfg, points_g.as_slice(), r)?;
        self.share_h_r = interp_evaluate(self.cfg, points_h.as_slice(), r)?;

        self.data_share = Some(data_share);
        self.packet = Some(packet);
        self.state = VerifierState::DataSet;
        debug!(server = ?self.idx, "verifier staged client packet");
        Ok(())
    }

    /// Compute this server's round-1 message: shares of the Beaver-triple
    /// corrections `d = f(r) - a`, `e = g(r) - b`.
    pub fn round1(&mut self) -> Result<VerifyMessage1> {
        if self.state != VerifierState::DataSet {
            return Err(Error::Domain("round1 called out of order"));
        }
        let triple = &self.packet.as_ref().expect("DataSet implies packet is set").triple;
        let msg = VerifyMessage1 {
            share_d: self.share_f_r - triple.a,
            share_e: self.share_g_r - triple.b,
        };
        self.state = VerifierState::Round1Sent;
        Ok(msg)
    }

    /// Compute this server's round-2 message: its share of the output-wire
    /// value `f(r)·g(r) - h(r)`, given both servers' round-1 messages.
    pub fn round2(&mut self, m1_a: &VerifyMessage1, m1_b: &VerifyMessage1) -> Result<VerifyMessage2> {
        if self.state != VerifierState::Round1Sent {
            return Err(Error::Domain("round2 called out of order"));
        }
        let triple = &self.packet.as_ref().expect("Round1Sent implies packet is set").triple;

        let d = m1_a.share_d + m1_b.share_d;
        let e = m1_a.share_e + m1_b.share_e;

        let share_out =
            d * e * self.cfg.inv2() + d * triple.b + e * triple.a + triple.c - self.share_h_r;

        self.state = VerifierState::Round2Sent;
        Ok(VerifyMessage2 { share_out })
    }

    /// Combine both servers' round-2 messages into the final accept/reject
    /// decision. `Ok(false)` is a normal, non-fatal rejection; `Err` marks a
    /// hard failure (out-of-order call).
    pub fn is_valid(&mut self, m2_a: &VerifyMessage2, m2_b: &VerifyMessage2) -> Result<bool> {
        if self.state != VerifierState::Round2Sent {
            return Err(Error::Domain("is_valid called out of order"));
        }
        let sum = m2_a.share_out + m2_b.share_out;
        let accept = sum.is_zero();
        self.state = VerifierState::Decided(accept);
        info!(server = ?self.idx, accept, "validation decision");
        Ok(accept)
    }

    /// This server's reconstituted data-share array, available only once
    /// the packet has been decided valid.
    pub fn data_share_for(&self, idx: ServerId) -> Result<&FieldArray> {
        if idx != self.idx {
            return Err(Error::Domain("data_share_for: wrong server index"));
        }
        match self.state {
            VerifierState::Decided(true) => {
                Ok(self.data_share.as_ref().expect("Decided implies data_share is set"))
            }
            VerifierState::Decided(false) => Err(Error::Domain("cannot aggregate a rejected packet")),
            _ => Err(Error::Domain("data_share_for called before a validity decision")),
        }
    }
}
