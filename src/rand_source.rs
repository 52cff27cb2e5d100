//! Byte-source capability and rejection-sampled integer generation.
//!
//! The OS CSPRNG and the deterministic PRG both need the same
//! rejection-sampling skeleton, differing only in where the bytes come
//! from. We abstract that into a single [`ByteSource`] trait with one
//! method and parameterize the sampler over it once, rather than
//! duplicating the loop for each source.

use crate::error::{Error, Result};
use crate::field::{Field, MODULUS_U128};

/// A blocking source of cryptographic-quality (or, for the PRG, pseudo-)
/// random bytes.
pub trait ByteSource {
    /// Fill `dst` completely with bytes from this source.
    fn fill_bytes(&mut self, dst: &mut [u8]);
}

/// The operating system's CSPRNG, used by the client to generate fresh
/// per-field shares, Beaver triples, and PRG seeds.
#[derive(Default)]
pub struct OsByteSource;

impl ByteSource for OsByteSource {
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        use rand::RngCore;
        rand::rngs::OsRng.fill_bytes(dst);
    }
}

/// Number of bytes needed to hold `max - 1`, and the mask that zeroes the
/// unused high bits of that representation's most-significant byte.
fn byte_len_and_msb_mask(max_minus_one: u128) -> (usize, u8) {
    if max_minus_one == 0 {
        return (1, 0);
    }
    let bits = 128 - max_minus_one.leading_zeros() as usize;
    let nbytes = bits.div_ceil(8);
    let msb_bits = bits - (nbytes - 1) * 8;
    let mask = if msb_bits == 8 { 0xff } else { (1u8 << msb_bits) - 1 };
    (nbytes, mask)
}

/// Uniformly sample an integer in `[0, max)` from `source`, by rejection
/// sampling over the minimal big-endian byte width of `max - 1`.
/// Rejection probability is < 1/2 per iteration, so this terminates in O(1)
/// expected iterations.
pub fn rand_int_rng(source: &mut impl ByteSource, max: u128) -> Result<u128> {
    if max == 0 {
        return Err(Error::Domain("rand_int: max must be nonzero"));
    }
    let (nbytes, mask) = byte_len_and_msb_mask(max - 1);
    let mut buf = [0u8; 16];
    loop {
        source.fill_bytes(&mut buf[16 - nbytes..]);
        buf[16 - nbytes] &= mask;
        let candidate = u128::from_be_bytes(buf);
        if candidate < max {
            return Ok(candidate);
        }
    }
}

/// Uniformly sample a field element in `[0, M)` from `source`.
pub fn rand_field(source: &mut impl ByteSource) -> Result<Field> {
    let v = rand_int_rng(source, MODULUS_U128)?;
    Ok(Field::from(v))
}

/// Split `src` into two additive shares, `shareA` drawn uniformly at random
/// from `source` and `shareB := src - shareA`. Matches
/// `examples/original_source/libmprio/share.c`'s `share_int`: unlike
/// [`crate::prg::Prg::share_int`], both shares are returned explicitly —
/// this is used for values (`f(0)`, `g(0)`, `h(0)`) that are not part of the
/// PRG-compression optimization.
pub fn share_int(source: &mut impl ByteSource, src: Field) -> Result<(Field, Field)> {
    let share_a = rand_field(source)?;
    let share_b = src - share_a;
    Ok((share_a, share_b))
}
