//! Beaver triples: one-round multiplicative secret sharing.

use crate::error::Result;
use crate::field::Field;
use crate::rand_source::{rand_field, ByteSource};

/// One server's share of a multiplicative triple `(a, b, c)`.
///
/// Two triples, one held by each server, form a *shared* Beaver triple iff
/// `(a_A + a_B)(b_A + b_B) ≡ c_A + c_B (mod M)`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, ark_serialize::CanonicalSerialize, ark_serialize::CanonicalDeserialize,
)]
pub struct BeaverTriple {
    pub a: Field,
    pub b: Field,
    pub c: Field,
}

impl BeaverTriple {
    /// Sample a pair of triple shares satisfying the multiplicative
    /// relation, matching `examples/original_source/libprio/triple.c`'s
    /// `triple_rand`: `a_A, b_A, a_B, b_B` are independent uniform draws;
    /// `c_B` is an independent uniform blind; `c_A` is solved for so the
    /// product relation holds exactly.
    pub fn rand_pair(source: &mut impl ByteSource) -> Result<(BeaverTriple, BeaverTriple)> {
        let a_a = rand_field(source)?;
        let b_a = rand_field(source)?;
        let a_b = rand_field(source)?;
        let b_b = rand_field(source)?;
        let c_b = rand_field(source)?;

        let c_a = (a_a + a_b) * (b_a + b_b) - c_b;

        Ok((
            BeaverTriple { a: a_a, b: b_a, c: c_a },
            BeaverTriple { a: a_b, b: b_b, c: c_b },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rand_source::OsByteSource;

    #[test]
    fn triple_relation_holds() {
        let mut src = OsByteSource;
        let (ta, tb) = BeaverTriple::rand_pair(&mut src).unwrap();
        assert_eq!((ta.a + tb.a) * (ta.b + tb.b), ta.c + tb.c);
    }

    #[test]
    fn triples_are_not_trivially_zero() {
        let mut src = OsByteSource;
        let (ta, _tb) = BeaverTriple::rand_pair(&mut src).unwrap();
        use ark_ff::Zero;
        assert!(!ta.a.is_zero() || !ta.b.is_zero());
    }
}
