//! Pseudorandom generator: AES-128 in counter mode, zero IV.
//!
//! Built on the `aes`/`ctr` crates (RustCrypto), the same pairing used for
//! AES-CTR keystreams in `hashcloak-smol-mpc`, one of the other retrieved
//! MPC repositories — the teacher crate has no AES dependency of its own
//! since it never needed a symmetric PRG.

use aes::Aes128;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read as ArkRead, SerializationError, Valid,
    Validate, Write as ArkWrite,
};
use ctr::cipher::{KeyIvInit, StreamCipher};

use crate::error::Result;
use crate::farray::FieldArray;
use crate::field::{Field, MODULUS_U128};
use crate::rand_source::{rand_int_rng, ByteSource};

/// AES-128 key / PRG seed length in bytes.
pub const SEED_LEN: usize = 16;

/// Opaque 16-byte PRG seed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Seed(pub [u8; SEED_LEN]);

// Manual canonical ser/de, matching the teacher's pattern for non-field
// plain-data types (`pcs::Basis`): a fixed 16-byte write/read, no length
// prefix needed since the size is constant.
impl CanonicalSerialize for Seed {
    fn serialize_with_mode<W: ArkWrite>(
        &self,
        mut w: W,
        _cm: Compress,
    ) -> core::result::Result<(), SerializationError> {
        w.write_all(&self.0)?;
        Ok(())
    }
    fn serialized_size(&self, _cm: Compress) -> usize {
        SEED_LEN
    }
}

impl Valid for Seed {
    fn check(&self) -> core::result::Result<(), SerializationError> {
        Ok(())
    }
}

impl CanonicalDeserialize for Seed {
    fn deserialize_with_mode<R: ArkRead>(
        mut r: R,
        _cm: Compress,
        _validate: Validate,
    ) -> core::result::Result<Self, SerializationError> {
        let mut bytes = [0u8; SEED_LEN];
        r.read_exact(&mut bytes)?;
        Ok(Seed(bytes))
    }
}

impl Seed {
    /// Generate a fresh seed from `source`, mirroring
    /// `examples/original_source/prio/prg.c`'s `PRGSeed_randomize`.
    pub fn random(source: &mut impl ByteSource) -> Self {
        let mut bytes = [0u8; SEED_LEN];
        source.fill_bytes(&mut bytes);
        Seed(bytes)
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Seed").field(&"<redacted>").finish()
    }
}

type Aes128Ctr = ctr::Ctr64BE<Aes128>;

/// Seeded pseudorandom byte stream: AES-128-CTR with an all-zero IV keyed by
/// the seed. Two PRGs constructed from the same seed produce bit-identical
/// output streams — this is the basis of server B's compressed share
/// reconstruction, where a 16-byte seed stands in for an explicit array.
pub struct Prg {
    cipher: Aes128Ctr,
}

impl Prg {
    /// Construct a PRG from a 16-byte seed.
    pub fn new(seed: &Seed) -> Self {
        let iv = [0u8; 16];
        let cipher = Aes128Ctr::new((&seed.0).into(), (&iv).into());
        Prg { cipher }
    }

    /// Construct a PRG from a 16-byte seed and a 64-bit nonce occupying the
    /// low 8 bytes of the IV, giving each `nonce` an independent keystream
    /// under the same key. Used to expand a long-lived master seed into a
    /// fresh per-packet secret without re-keying AES per packet.
    pub fn new_with_nonce(seed: &Seed, nonce: u64) -> Self {
        let mut iv = [0u8; 16];
        iv[8..].copy_from_slice(&nonce.to_be_bytes());
        let cipher = Aes128Ctr::new((&seed.0).into(), (&iv).into());
        Prg { cipher }
    }

    /// Return the next `len` bytes of the keystream.
    pub fn get_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.cipher.apply_keystream(&mut buf);
        buf
    }
}

impl ByteSource for Prg {
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        // Keystream XORed into zeroed output is just the keystream.
        for b in dst.iter_mut() {
            *b = 0;
        }
        self.cipher.apply_keystream(dst);
    }
}

impl Prg {
    /// Uniform field element from the keystream.
    pub fn get_int(&mut self, max: u128) -> Result<u128> {
        rand_int_rng(self, max)
    }

    /// Uniform field element drawn from the keystream, reduced into `[0, M)`.
    pub fn get_field(&mut self) -> Result<Field> {
        Ok(Field::from(self.get_int(MODULUS_U128)?))
    }

    /// Fill every entry of `dst` with a PRG-derived field element.
    pub fn get_array(&mut self, dst: &mut FieldArray) -> Result<()> {
        for i in 0..dst.len() {
            dst.set(i, self.get_field()?);
        }
        Ok(())
    }

    /// `shareA := (src - PRG_get_int(M)) mod M`.
    ///
    /// The PRG's own draw is implicitly server B's share; this returns only
    /// server A's complementary share, matching
    /// `examples/original_source/prio/prg.c`'s `PRG_share_int`.
    pub fn share_int(&mut self, src: Field) -> Result<Field> {
        let b_share = self.get_field()?;
        Ok(src - b_share)
    }

    /// Element-wise [`Prg::share_int`] over a whole array.
    pub fn share_array(&mut self, src: &FieldArray) -> Result<FieldArray> {
        let mut out = FieldArray::new(src.len());
        for i in 0..src.len() {
            out.set(i, self.share_int(src.get(i))?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand_source::OsByteSource;

    #[test]
    fn identical_seeds_produce_identical_streams() {
        let seed = Seed([7u8; SEED_LEN]);
        let mut a = Prg::new(&seed);
        let mut b = Prg::new(&seed);
        assert_eq!(a.get_bytes(64), b.get_bytes(64));
    }

    #[test]
    fn nonces_under_the_same_seed_diverge() {
        let seed = Seed([4u8; SEED_LEN]);
        let mut a = Prg::new_with_nonce(&seed, 0);
        let mut b = Prg::new_with_nonce(&seed, 1);
        assert_ne!(a.get_bytes(32), b.get_bytes(32));
    }

    #[test]
    fn same_nonce_is_deterministic() {
        let seed = Seed([4u8; SEED_LEN]);
        let mut a = Prg::new_with_nonce(&seed, 42);
        let mut b = Prg::new_with_nonce(&seed, 42);
        assert_eq!(a.get_bytes(32), b.get_bytes(32));
    }

    #[test]
    fn different_seeds_diverge() {
        let s1 = Seed([1u8; SEED_LEN]);
        let s2 = Seed([2u8; SEED_LEN]);
        let mut a = Prg::new(&s1);
        let mut b = Prg::new(&s2);
        assert_ne!(a.get_bytes(64), b.get_bytes(64));
    }

    #[test]
    fn share_int_recombines_to_source() {
        let mut src = OsByteSource;
        let seed = Seed::random(&mut src);
        let x = Field::from(12345u64);
        let mut prg_for_a = Prg::new(&seed);
        let share_a = prg_for_a.share_int(x).unwrap();
        let mut prg_for_b = Prg::new(&seed);
        let share_b = prg_for_b.get_field().unwrap();
        assert_eq!(share_a + share_b, x);
    }

    #[test]
    fn share_array_elementwise_matches_share_int() {
        let seed = Seed([9u8; SEED_LEN]);
        let mut arr = FieldArray::new(3);
        arr.set(0, Field::from(1u64));
        arr.set(1, Field::from(2u64));
        arr.set(2, Field::from(3u64));

        let mut prg1 = Prg::new(&seed);
        let shared = prg1.share_array(&arr).unwrap();

        let mut prg2 = Prg::new(&seed);
        for i in 0..3 {
            let b = prg2.get_field().unwrap();
            assert_eq!(shared.get(i) + b, arr.get(i));
        }
    }
}
