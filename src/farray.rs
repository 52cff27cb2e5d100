//! Dynamically sized array of field elements.

use ark_ff::Zero;

use crate::field::Field;

/// An ordered, resizable sequence of field elements, addressed by index.
///
/// Grounded on `examples/original_source/libmprio/mparray.c`'s `MPArray`:
/// the C type is a manually-managed buffer of `mp_int`s with explicit
/// `new`/`resize`/`marshal`/`unmarshal` entry points; here the same shape is
/// a thin `Vec<Field>` newtype, since `ark_ff::Fp` is already a plain value
/// type with no destructor of its own.
#[derive(
    Clone, Debug, PartialEq, Eq, ark_serialize::CanonicalSerialize, ark_serialize::CanonicalDeserialize,
)]
pub struct FieldArray(Vec<Field>);

impl FieldArray {
    /// A new array of `len` zeroed elements.
    pub fn new(len: usize) -> Self {
        FieldArray(vec![Field::zero(); len])
    }

    /// Wrap an existing vector of field elements.
    pub fn from_vec(v: Vec<Field>) -> Self {
        FieldArray(v)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Field {
        self.0[i]
    }

    pub fn set(&mut self, i: usize, v: Field) {
        self.0[i] = v;
    }

    pub fn as_slice(&self) -> &[Field] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [Field] {
        &mut self.0
    }

    /// Element-wise `self[i] += other[i] mod M`. Panics if lengths differ —
    /// callers must size-check first, matching the reference's `MPArray_addmod`
    /// precondition that both arrays share a length.
    pub fn add_mod_assign(&mut self, other: &FieldArray) {
        assert_eq!(self.len(), other.len(), "add_mod_assign: length mismatch");
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a += b;
        }
    }

    /// A deep copy of this array (distinct backing storage).
    pub fn duplicate(&self) -> FieldArray {
        self.clone()
    }

    /// Resize to `new_len`, preserving the existing prefix and zero-filling
    /// any newly added tail entries. Shrinking simply truncates.
    pub fn resize(&mut self, new_len: usize) {
        self.0.resize(new_len, Field::zero());
    }

    /// Overwrite `self` with the contents of `other` (same length required).
    pub fn copy_from(&mut self, other: &FieldArray) {
        assert_eq!(self.len(), other.len(), "copy_from: length mismatch");
        self.0.copy_from_slice(&other.0);
    }

    /// Split `self` into two arrays whose element-wise sum (mod M) is `self`:
    /// one drawn from `prg` (server B's implicit share) and the complementary
    /// share returned here (server A's explicit share). Mirrors
    /// `examples/original_source/prio/prg.c`'s `PRG_share_array`.
    pub fn share_split(&self, prg: &mut crate::prg::Prg) -> crate::error::Result<FieldArray> {
        prg.share_array(self)
    }
}

impl std::ops::Index<usize> for FieldArray {
    type Output = Field;
    fn index(&self, i: usize) -> &Field {
        &self.0[i]
    }
}

impl std::ops::IndexMut<usize> for FieldArray {
    fn index_mut(&mut self, i: usize) -> &mut Field {
        &mut self.0[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zero_filled() {
        let a = FieldArray::new(5);
        assert_eq!(a.len(), 5);
        for i in 0..5 {
            assert_eq!(a.get(i), Field::zero());
        }
    }

    #[test]
    fn add_mod_assign_sums_elementwise() {
        let mut a = FieldArray::from_vec(vec![Field::from(1u64), Field::from(2u64)]);
        let b = FieldArray::from_vec(vec![Field::from(10u64), Field::from(20u64)]);
        a.add_mod_assign(&b);
        assert_eq!(a.get(0), Field::from(11u64));
        assert_eq!(a.get(1), Field::from(22u64));
    }

    #[test]
    fn resize_preserves_prefix_and_zero_extends() {
        let mut a = FieldArray::from_vec(vec![Field::from(7u64), Field::from(8u64)]);
        a.resize(4);
        assert_eq!(a.get(0), Field::from(7u64));
        assert_eq!(a.get(1), Field::from(8u64));
        assert_eq!(a.get(2), Field::zero());
        assert_eq!(a.get(3), Field::zero());
        a.resize(1);
        assert_eq!(a.len(), 1);
        assert_eq!(a.get(0), Field::from(7u64));
    }

    #[test]
    fn duplicate_is_independent() {
        let a = FieldArray::from_vec(vec![Field::from(3u64)]);
        let mut b = a.duplicate();
        b.set(0, Field::from(9u64));
        assert_eq!(a.get(0), Field::from(3u64));
        assert_eq!(b.get(0), Field::from(9u64));
    }

    #[test]
    fn share_split_recombines() {
        use crate::prg::{Prg, Seed};
        let seed = Seed([3u8; 16]);
        let original = FieldArray::from_vec(vec![Field::from(1u64), Field::from(2u64), Field::from(3u64)]);
        let mut prg_a = Prg::new(&seed);
        let share_a = original.share_split(&mut prg_a).unwrap();

        let mut prg_b = Prg::new(&seed);
        let mut recombined = share_a.duplicate();
        let mut share_b = FieldArray::new(original.len());
        prg_b.get_array(&mut share_b).unwrap();
        recombined.add_mod_assign(&share_b);
        assert_eq!(recombined, original);
    }
}
