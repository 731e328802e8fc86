//! Intel `CLMUL`-accelerated multiplier for modern x86/x86_64 CPUs
//! (i.e. Intel Sandy Bridge-compatible or newer)
//!
//! Computes the same Karatsuba product and reflected reduction as the soft
//! backend, with `PCLMULQDQ` standing in for the 64x64 carryless multiply.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::field::FieldElement;

/// Returns the POLYVAL product `x * y * x^-128`.
///
/// # Safety
///
/// The CPU must support `pclmulqdq` and `sse2`.
#[inline]
#[target_feature(enable = "pclmulqdq", enable = "sse2")]
pub(crate) unsafe fn polymul(x: FieldElement, y: FieldElement) -> FieldElement {
    let h = load(x);
    let y = load(y);

    let h0 = h;
    let h1 = _mm_shuffle_epi32(h, 0x0E);
    let h2 = _mm_xor_si128(h0, h1);
    let y0 = y;

    // Multiply values partitioned to 64-bit parts
    let y1 = _mm_shuffle_epi32(y, 0x0E);
    let y2 = _mm_xor_si128(y0, y1);
    let t0 = _mm_clmulepi64_si128(y0, h0, 0x00);
    let t1 = _mm_clmulepi64_si128(y, h, 0x11);
    let t2 = _mm_clmulepi64_si128(y2, h2, 0x00);
    let t2 = _mm_xor_si128(t2, _mm_xor_si128(t0, t1));
    let v0 = t0;
    let v1 = _mm_xor_si128(_mm_shuffle_epi32(t0, 0x0E), t2);
    let v2 = _mm_xor_si128(t1, _mm_shuffle_epi32(t2, 0x0E));
    let v3 = _mm_shuffle_epi32(t1, 0x0E);

    // Only the low 64-bit lane of each `v` is meaningful from here on.
    let v1 = xor4(
        v1,
        _mm_slli_epi64(v0, 63),
        _mm_slli_epi64(v0, 62),
        _mm_slli_epi64(v0, 57),
    );
    let v2 = xor5(
        v2,
        v0,
        _mm_srli_epi64(v0, 1),
        _mm_srli_epi64(v0, 2),
        _mm_srli_epi64(v0, 7),
    );

    let v2 = xor4(
        v2,
        _mm_slli_epi64(v1, 63),
        _mm_slli_epi64(v1, 62),
        _mm_slli_epi64(v1, 57),
    );
    let v3 = xor5(
        v3,
        v1,
        _mm_srli_epi64(v1, 1),
        _mm_srli_epi64(v1, 2),
        _mm_srli_epi64(v1, 7),
    );

    store(_mm_unpacklo_epi64(v2, v3))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load(fe: FieldElement) -> __m128i {
    _mm_set_epi64x(fe.hi as i64, fe.lo as i64)
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn store(v: __m128i) -> FieldElement {
    let mut bytes = [0u8; 16];
    // `_mm_storeu_si128` performs an unaligned store
    #[allow(clippy::cast_ptr_alignment)]
    _mm_storeu_si128(bytes.as_mut_ptr() as *mut __m128i, v);
    FieldElement::from_le_bytes(&bytes)
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn xor4(e1: __m128i, e2: __m128i, e3: __m128i, e4: __m128i) -> __m128i {
    _mm_xor_si128(_mm_xor_si128(e1, e2), _mm_xor_si128(e3, e4))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn xor5(e1: __m128i, e2: __m128i, e3: __m128i, e4: __m128i, e5: __m128i) -> __m128i {
    _mm_xor_si128(
        e1,
        _mm_xor_si128(_mm_xor_si128(e2, e3), _mm_xor_si128(e4, e5)),
    )
}
