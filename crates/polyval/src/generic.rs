//! Bit-serial POLYVAL, used as an independent oracle for the backends.
//!
//! Shares no code with the Karatsuba multipliers: the product is built one
//! bit of `y` at a time on `u128` values, then divided by `x^128` one bit at
//! a time.

use crate::{field::FieldElement, BLOCK_SIZE};

/// `x^127 + x^126 + x^121 + 1`, the low terms of the POLYVAL polynomial.
const R: u128 = 0xc200_0000_0000_0000_0000_0000_0000_0001;

/// Multiplies by `x` modulo the POLYVAL polynomial.
fn mul_x(a: u128) -> u128 {
    (a << 1) ^ ((a >> 127) * R)
}

/// Divides by `x` modulo the POLYVAL polynomial.
fn div_x(a: u128) -> u128 {
    let lsb = a & 1;
    ((a ^ (lsb * R)) >> 1) | (lsb << 127)
}

/// Galois field multiplication `x * y * x^-128` in the POLYVAL field.
pub(crate) fn mul(mut x: u128, y: u128) -> u128 {
    let mut result: u128 = 0;
    for i in 0..128 {
        result ^= x * ((y >> i) & 1);
        x = mul_x(x);
    }
    for _ in 0..128 {
        result = div_x(result);
    }
    result
}

/// Absorbs `blocks` into `y` under the key `h`.
///
/// `blocks.len()` must be a multiple of [`BLOCK_SIZE`].
pub(crate) fn polymul_generic(y: &mut FieldElement, h: &FieldElement, blocks: &[u8]) {
    assert_eq!(blocks.len() % BLOCK_SIZE, 0);

    let h = u128::from(*h);
    let mut acc = u128::from(*y);
    for block in blocks.chunks_exact(BLOCK_SIZE) {
        let x = u128::from_le_bytes(block.try_into().unwrap());
        acc = mul(acc ^ x, h);
    }
    *y = FieldElement::from(acc);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_x_inverts_mul_x() {
        for a in [0, 1, 1 << 127, R, u128::MAX, 0x0123_4567_89ab_cdef] {
            assert_eq!(div_x(mul_x(a)), a);
            assert_eq!(mul_x(div_x(a)), a);
        }
    }

    #[test]
    fn test_identity() {
        let one = u128::from(FieldElement::ONE);
        let a = 0x0123_4567_89ab_cdef_0011_2233_4455_6677;
        assert_eq!(mul(a, one), a);
        assert_eq!(mul(one, a), a);
    }
}
