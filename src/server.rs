//! Per-server aggregate state and final recombination.

use tracing::trace;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::farray::FieldArray;
use crate::field::{low_u64, Field};
use crate::verifier::Verifier;

/// Which of the two non-colluding servers this state belongs to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, ark_serialize::CanonicalSerialize, ark_serialize::CanonicalDeserialize,
)]
pub enum ServerId {
    A,
    B,
}

/// A single server's running, element-wise sum of accepted client shares.
///
/// Grounded on `examples/original_source/prio/server.c`'s `PrioServer` /
/// `PrioServer_aggregate`.
pub struct Server {
    idx: ServerId,
    aggregate: FieldArray,
}

impl Server {
    pub fn new(cfg: &Config, idx: ServerId) -> Self {
        Server { idx, aggregate: FieldArray::new(cfg.num_data_fields()) }
    }

    pub fn idx(&self) -> ServerId {
        self.idx
    }

    /// Fold `verifier`'s data-share array into this server's running
    /// aggregate. Callers must only pass verifiers that have already
    /// returned `Ok(true)` from [`Verifier::is_valid`] — this function
    /// performs no validity check of its own.
    pub fn aggregate(&mut self, verifier: &Verifier) -> Result<()> {
        let share = verifier.data_share_for(self.idx)?;
        self.aggregate.add_mod_assign(share);
        trace!(server = ?self.idx, "aggregated one client share");
        Ok(())
    }

    /// A deep-copy snapshot of this server's current aggregate.
    pub fn total_share(&self) -> TotalShare {
        TotalShare { idx: self.idx, data_shares: self.aggregate.duplicate() }
    }
}

/// A snapshot of one server's aggregate, exchanged out-of-band and combined
/// via [`TotalShare::finalize`].
#[derive(Clone, Debug, ark_serialize::CanonicalSerialize, ark_serialize::CanonicalDeserialize)]
pub struct TotalShare {
    idx: ServerId,
    data_shares: FieldArray,
}

impl TotalShare {
    pub fn idx(&self) -> ServerId {
        self.idx
    }

    /// Recombine server A's and server B's total shares into cleartext
    /// counts. Matches `examples/original_source/prio/server.c`'s
    /// `PrioTotalShare_final`: fails on length mismatch or if the shares
    /// are not tagged one-each for A and B; truncates each recombined sum
    /// to its low-order 64 bits (callers are responsible for ensuring
    /// aggregate counts fit).
    pub fn finalize(cfg: &Config, a: &TotalShare, b: &TotalShare) -> Result<Vec<u64>> {
        if !matches!(a.idx, ServerId::A) || !matches!(b.idx, ServerId::B) {
            return Err(Error::Domain("finalize requires one A share and one B share"));
        }
        if a.data_shares.len() != cfg.num_data_fields() || a.data_shares.len() != b.data_shares.len() {
            return Err(Error::Domain("total share length mismatch"));
        }

        let mut out = Vec::with_capacity(a.data_shares.len());
        for i in 0..a.data_shares.len() {
            let sum: Field = a.data_shares.get(i) + b.data_shares.get(i);
            out.push(low_u64(&sum));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::rand_source::OsByteSource;
    use crate::verifier::Verifier;

    fn accept_one_client(cfg: &Config, data: &[bool], server_a: &mut Server, server_b: &mut Server) {
        let mut src = OsByteSource;
        let (pa, pb) = Client::encode(cfg, data, &mut src).unwrap();
        let secret = [7u8; 20];

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

    #[test]
    fn single_client_recombines_to_input() {
        let cfg = Config::new(4).unwrap();
        let mut server_a = Server::new(&cfg, ServerId::A);
        let mut server_b = Server::new(&cfg, ServerId::B);

        accept_one_client(&cfg, &[true, false, true, true], &mut server_a, &mut server_b);

        let ta = server_a.total_share();
        let tb = server_b.total_share();
        let out = TotalShare::finalize(&cfg, &ta, &tb).unwrap();
        assert_eq!(out, vec![1, 0, 1, 1]);
    }

    #[test]
    fn ten_identical_clients_sum() {
        let cfg = Config::new(4).unwrap();
        let mut server_a = Server::new(&cfg, ServerId::A);
        let mut server_b = Server::new(&cfg, ServerId::B);

        for _ in 0..10 {
            accept_one_client(&cfg, &[true, false, true, true], &mut server_a, &mut server_b);
        }

        let ta = server_a.total_share();
        let tb = server_b.total_share();
        let out = TotalShare::finalize(&cfg, &ta, &tb).unwrap();
        assert_eq!(out, vec![10, 0, 10, 10]);
    }

    #[test]
    fn finalize_rejects_mismatched_roles() {
        let cfg = Config::new(4).unwrap();
        let server_a = Server::new(&cfg, ServerId::A);
        let ta = server_a.total_share();
        let tb = server_a.total_share(); // wrong role on purpose
        assert!(TotalShare::finalize(&cfg, &ta, &tb).is_err());
    }
}
