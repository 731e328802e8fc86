//! Elements of GF(2^128) in the POLYVAL bit order.
//!
//! RFC 8452 defines POLYVAL over the field GF(2)[x] / P(x) with
//!
//! ```text
//! P(x) = x^128 + x^127 + x^126 + x^121 + 1
//! ```
//!
//! and encodes elements little-endian: bit 0 of byte 0 is the coefficient of
//! `x^0`, bit 7 of byte 15 the coefficient of `x^127`. Read as a `u128` with
//! [`u128::from_le_bytes`], bit `i` of the integer is the coefficient of
//! `x^i`. This differs from GHASH, which reverses the bits of every byte.

use core::{
    fmt,
    ops::{BitXor, BitXorAssign, Mul, MulAssign},
};

use crate::backend::soft;

/// Size of an encoded field element in bytes.
pub(crate) const ELEMENT_SIZE: usize = 16;

/// High word of `x^127 + x^126 + x^121`.
const POLY_HI: u64 = 0xc200_0000_0000_0000;
/// Low word of `1`.
const POLY_LO: u64 = 0x0000_0000_0000_0001;

/// An element of GF(2^128).
///
/// Every bit pattern is a valid element. `hi` holds the coefficients of
/// `x^64..x^127` (bytes 8..16 of the encoding), `lo` those of `x^0..x^63`.
///
/// Multiplication is the POLYVAL product `dot(a, b) = a * b * x^-128`, which
/// is what the accumulator evaluates. Its identity is [`FieldElement::ONE`].
#[derive(Clone, Copy, Default)]
pub struct FieldElement {
    pub(crate) hi: u64,
    pub(crate) lo: u64,
}

impl FieldElement {
    /// The zero element.
    pub const ZERO: Self = Self { hi: 0, lo: 0 };

    /// The identity of the POLYVAL product, `x^128 mod P(x)`.
    ///
    /// Encodes as `010000000000000000000000000000c2`.
    pub const ONE: Self = Self {
        hi: POLY_HI,
        lo: POLY_LO,
    };

    /// Creates an element from its high and low 64-bit words.
    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// Returns the high 64-bit word.
    pub const fn hi(&self) -> u64 {
        self.hi
    }

    /// Returns the low 64-bit word.
    pub const fn lo(&self) -> u64 {
        self.lo
    }

    /// Decodes an element from its 16-byte little-endian encoding.
    pub const fn from_le_bytes(bytes: &[u8; ELEMENT_SIZE]) -> Self {
        let x = u128::from_le_bytes(*bytes);
        Self {
            hi: (x >> 64) as u64,
            lo: x as u64,
        }
    }

    /// Encodes the element into 16 little-endian bytes.
    pub const fn to_le_bytes(self) -> [u8; ELEMENT_SIZE] {
        self.to_u128().to_le_bytes()
    }

    /// Returns the element as a `u128`, bit `i` being the coefficient of `x^i`.
    pub const fn to_u128(self) -> u128 {
        ((self.hi as u128) << 64) | self.lo as u128
    }

    /// Multiplies the element by `x`, as `mulX_POLYVAL` in RFC 8452.
    ///
    /// The bit shifted out of `x^127` is folded back in by a masked XOR with
    /// `x^127 + x^126 + x^121 + 1`, so there is no branch on the value.
    #[must_use = "this returns the result of the operation \
                  without modifying the original"]
    pub const fn double(self) -> Self {
        let mask = 0u64.wrapping_sub(self.hi >> 63);

        Self {
            hi: ((self.hi << 1) | (self.lo >> 63)) ^ (mask & POLY_HI),
            lo: (self.lo << 1) ^ (mask & POLY_LO),
        }
    }
}

impl From<[u8; ELEMENT_SIZE]> for FieldElement {
    fn from(bytes: [u8; ELEMENT_SIZE]) -> Self {
        Self::from_le_bytes(&bytes)
    }
}

impl From<FieldElement> for [u8; ELEMENT_SIZE] {
    fn from(fe: FieldElement) -> Self {
        fe.to_le_bytes()
    }
}

impl From<u128> for FieldElement {
    fn from(x: u128) -> Self {
        Self {
            hi: (x >> 64) as u64,
            lo: x as u64,
        }
    }
}

impl From<FieldElement> for u128 {
    fn from(fe: FieldElement) -> Self {
        fe.to_u128()
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        // Compares all bits before branching.
        ((self.hi ^ other.hi) | (self.lo ^ other.lo)) == 0
    }
}

impl Eq for FieldElement {}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(")?;
        for b in self.to_le_bytes() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

impl BitXor for FieldElement {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Self {
            hi: self.hi ^ rhs.hi,
            lo: self.lo ^ rhs.lo,
        }
    }
}

impl BitXorAssign for FieldElement {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.hi ^= rhs.hi;
        self.lo ^= rhs.lo;
    }
}

/// POLYVAL product using the portable constant-time multiplier.
impl Mul for FieldElement {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        soft::polymul(self, rhs)
    }
}

impl MulAssign for FieldElement {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

#[cfg(feature = "zeroize")]
impl zeroize::Zeroize for FieldElement {
    fn zeroize(&mut self) {
        use zeroize::Zeroize;
        self.hi.zeroize();
        self.lo.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use polyval_data_fixtures::polyval::DOUBLE;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;

    fn elem(s: &str) -> FieldElement {
        let bytes: [u8; 16] = hex::decode(s).unwrap().try_into().unwrap();
        FieldElement::from_le_bytes(&bytes)
    }

    #[rstest]
    #[case::rfc_one("01000000000000000000000000000000", "02000000000000000000000000000000")]
    #[case::rfc_random("9c98c04df9387ded828175a92ba652d8", "3931819bf271fada0503eb52574ca572")]
    #[case::wrap("00000000000000000000000000000080", "010000000000000000000000000000c2")]
    #[case::zero("00000000000000000000000000000000", "00000000000000000000000000000000")]
    fn test_double(#[case] input: &str, #[case] output: &str) {
        assert_eq!(elem(input).double(), elem(output));
    }

    #[test]
    fn test_double_sequence() {
        let expected = std::str::from_utf8(DOUBLE)
            .unwrap()
            .lines()
            .map(elem)
            .collect::<Vec<_>>();
        assert_eq!(expected.len(), 128);

        let mut r = elem("01000000000000000000000000000000");
        for (i, want) in expected.into_iter().enumerate() {
            r = r.double();
            assert_eq!(r, want, "step {i}");
        }
        assert_eq!(r, FieldElement::ONE);
    }

    #[test]
    fn test_double_is_mul_by_x() {
        let mut rng = ChaCha12Rng::seed_from_u64(0);
        // x^1 scaled by x^128 so that `dot` multiplies by x.
        let x = FieldElement::ONE.double();
        for _ in 0..1000 {
            let a = FieldElement::from(rng.random::<u128>());
            assert_eq!(a.double(), a * x);
        }
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let bytes: [u8; 16] = rng.random();
            let fe = FieldElement::from_le_bytes(&bytes);
            assert_eq!(fe.to_le_bytes(), bytes);
            assert_eq!(FieldElement::from_le_bytes(&fe.to_le_bytes()), fe);
        }
    }

    #[test]
    fn test_word_layout() {
        let fe = elem("0102030405060708090a0b0c0d0e0f10");
        assert_eq!(fe.lo(), 0x0807_0605_0403_0201);
        assert_eq!(fe.hi(), 0x100f_0e0d_0c0b_0a09);
        assert_eq!(FieldElement::new(fe.hi(), fe.lo()), fe);
    }

    #[test]
    fn test_one_is_identity() {
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        assert_eq!(
            FieldElement::ONE.to_le_bytes(),
            elem("010000000000000000000000000000c2").to_le_bytes()
        );
        for _ in 0..1000 {
            let a = FieldElement::from(rng.random::<u128>());
            assert_eq!(a * FieldElement::ONE, a);
            assert_eq!(FieldElement::ONE * a, a);
            assert_eq!(a * FieldElement::ZERO, FieldElement::ZERO);
        }
    }

    #[test]
    fn test_mul_field_laws() {
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        for _ in 0..1000 {
            let a = FieldElement::from(rng.random::<u128>());
            let b = FieldElement::from(rng.random::<u128>());
            let c = FieldElement::from(rng.random::<u128>());
            assert_eq!(a * b, b * a);
            assert_eq!((a * b) * c, a * (b * c));
            assert_eq!(a * (b ^ c), (a * b) ^ (a * c));
        }
    }

    #[test]
    fn test_eq() {
        let a = elem("9c98c04df9387ded828175a92ba652d8");
        let mut b = a;
        assert_eq!(a, b);
        b.lo ^= 1;
        assert_ne!(a, b);
        b = a;
        b.hi ^= 1 << 63;
        assert_ne!(a, b);
    }
}
