//! Constant-time software multiplier for GF(2^128) in the POLYVAL bit order.
//!
//! The carryless product of two 64-bit words is computed with ordinary
//! integer multiplications on operands that have "holes" (runs of zero bits)
//! between the bits that are kept, following BearSSL's `ghash_ctmul64.c`:
//!
//! <https://www.bearssl.org/constanttime.html>
//!
//! Copyright (c) 2016 Thomas Pornin <pornin@bolet.org>
//!
//! Carries that occur land in a hole and are masked out of the result. With
//! five interleaved masks every kept bit position receives at most 13 partial
//! products, which the four-bit holes absorb.
//!
//! The 128x128 product is reduced to three 64x64 products with Karatsuba and
//! the 256-bit result is folded modulo `x^128 + x^127 + x^126 + x^121 + 1`
//! with the shift/XOR reflected reduction, which also applies the `x^-128`
//! factor of the POLYVAL product.

use crate::field::FieldElement;

const MASK0: u128 = 0x2108_4210_8421_0842_1084_2108_4210_8421;
const MASK1: u128 = 0x4210_8421_0842_1084_2108_4210_8421_0842;
const MASK2: u128 = 0x8421_0842_1084_2108_4210_8421_0842_1084;
const MASK3: u128 = 0x0842_1084_2108_4210_8421_0842_1084_2108;
const MASK4: u128 = 0x1084_2108_4210_8421_0842_1084_2108_4210;

/// Returns the 128-bit carryless product of `x` and `y` as `(hi, lo)`.
///
/// Runs in time independent of `x` and `y`: no branches, no table lookups.
#[inline]
pub(crate) const fn ctmul(x: u64, y: u64) -> (u64, u64) {
    let x = x as u128;
    let y = y as u128;

    let x0 = x & MASK0;
    let x1 = x & MASK1;
    let x2 = x & MASK2;
    let x3 = x & MASK3;
    let x4 = x & MASK4;
    let y0 = y & MASK0;
    let y1 = y & MASK1;
    let y2 = y & MASK2;
    let y3 = y & MASK3;
    let y4 = y & MASK4;

    // Operands are below 2^64, so none of these products overflow.
    let t0 = (x0 * y0) ^ (x1 * y4) ^ (x2 * y3) ^ (x3 * y2) ^ (x4 * y1);
    let t1 = (x0 * y1) ^ (x1 * y0) ^ (x2 * y4) ^ (x3 * y3) ^ (x4 * y2);
    let t2 = (x0 * y2) ^ (x1 * y1) ^ (x2 * y0) ^ (x3 * y4) ^ (x4 * y3);
    let t3 = (x0 * y3) ^ (x1 * y2) ^ (x2 * y1) ^ (x3 * y0) ^ (x4 * y4);
    let t4 = (x0 * y4) ^ (x1 * y3) ^ (x2 * y2) ^ (x3 * y1) ^ (x4 * y0);

    let z = (t0 & MASK0) | (t1 & MASK1) | (t2 & MASK2) | (t3 & MASK3) | (t4 & MASK4);

    ((z >> 64) as u64, z as u64)
}

/// Computes the unreduced 256-bit carryless product of `x` and `y`.
///
/// Returns the four 64-bit words of the product, least significant first.
#[inline]
pub(crate) const fn karatsuba(x: FieldElement, y: FieldElement) -> [u64; 4] {
    // (x1*y1) x^128 + (x1*y0 + x0*y1) x^64 + (x0*y0)
    //
    // with the middle term recovered from a single product:
    // x1*y0 + x0*y1 = (x1 + x0)(y1 + y0) + x1*y1 + x0*y0
    let (h1, h0) = ctmul(x.hi, y.hi);
    let (l1, l0) = ctmul(x.lo, y.lo);
    let (mut m1, mut m0) = ctmul(x.hi ^ x.lo, y.hi ^ y.lo);

    m0 ^= l0 ^ h0;
    m1 ^= l1 ^ h1;

    [l0, l1 ^ m0, h0 ^ m1, h1]
}

/// Folds a 256-bit carryless product into a field element.
///
/// Computes `v * x^-128 mod P(x)`. The low two words are cleared by adding
/// multiples of `P`, each fold being a fixed set of shifts and XORs.
#[inline]
pub(crate) const fn reduce(v: [u64; 4]) -> FieldElement {
    let [v0, mut v1, mut v2, mut v3] = v;

    v1 ^= (v0 << 63) ^ (v0 << 62) ^ (v0 << 57);
    v2 ^= v0 ^ (v0 >> 1) ^ (v0 >> 2) ^ (v0 >> 7);

    v2 ^= (v1 << 63) ^ (v1 << 62) ^ (v1 << 57);
    v3 ^= v1 ^ (v1 >> 1) ^ (v1 >> 2) ^ (v1 >> 7);

    FieldElement::new(v3, v2)
}

/// Returns the POLYVAL product `x * y * x^-128`.
#[inline]
pub(crate) const fn polymul(x: FieldElement, y: FieldElement) -> FieldElement {
    reduce(karatsuba(x, y))
}
