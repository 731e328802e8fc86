//! POLYVAL, the universal hash of AES-GCM-SIV, per [RFC 8452].
//!
//! POLYVAL evaluates a message, split into 16-byte blocks `X_1..X_n`, as a
//! polynomial at the key `H` over GF(2^128):
//!
//! ```text
//! S_0 = 0
//! S_j = dot(S_{j-1} + X_j, H)
//! ```
//!
//! where `dot(a, b) = a * b * x^-128`. [`Polyval`] holds `H` and the running
//! `S_j`; callers pad partial trailing blocks themselves.
//!
//! # Supported backends
//!
//! ## "soft" portable backend
//! A constant-time pure Rust implementation based on [BearSSL]: carryless
//! multiplication with integer multiplies on operands with holes, Karatsuba,
//! and a shift/XOR reduction. No branches or memory accesses depend on
//! secret data.
//!
//! ## `x86`/`x86_64` intrinsics (`CLMUL`)
//! By default this crate uses runtime detection on `i686`/`x86_64` targets
//! in order to determine if `CLMUL` is available, and if it is not, it will
//! fallback to the soft backend. The `force-soft` feature disables detection.
//!
//! # Concurrency
//!
//! [`Polyval`] is plain data and is `Send + Sync`. Updating requires
//! `&mut self`; sharing one accumulator between threads requires a lock
//! provided by the caller. Independent accumulators share no state.
//!
//! [RFC 8452]: https://datatracker.ietf.org/doc/html/rfc8452
//! [BearSSL]: https://www.bearssl.org/constanttime.html

#![deny(missing_docs, unreachable_pub, unused_must_use)]
#![deny(clippy::all)]

mod backend;
mod error;
mod field;
#[cfg(test)]
mod generic;
mod state;

pub use backend::Backend;
pub use error::{PolyvalError, StateError};
pub use field::FieldElement;
pub use state::STATE_LEN;

use core::fmt;

use tracing::instrument;

/// Size of a POLYVAL block in bytes.
pub const BLOCK_SIZE: usize = 16;
/// Size of a POLYVAL key in bytes.
pub const KEY_SIZE: usize = 16;
/// Size of a POLYVAL digest in bytes.
pub const SIZE: usize = 16;

/// POLYVAL accumulator.
///
/// Holds the hash key `h`, fixed at construction, and the running digest `y`.
/// The pair `(h, y)` is the whole state, see [`Polyval::to_bytes`].
#[derive(Clone)]
pub struct Polyval {
    h: FieldElement,
    y: FieldElement,
    backend: Backend,
}

impl Polyval {
    /// Creates a new accumulator with the key `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not [`KEY_SIZE`] bytes long.
    #[instrument(level = "trace", skip_all, fields(len = key.len()), err)]
    pub fn new(key: &[u8]) -> Result<Self, PolyvalError> {
        Self::with_backend(key, Backend::detect())
    }

    /// Creates a new accumulator with the key `key`, using `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not [`KEY_SIZE`] bytes long.
    pub fn with_backend(key: &[u8], backend: Backend) -> Result<Self, PolyvalError> {
        let key: &[u8; KEY_SIZE] = key.try_into().map_err(|_| PolyvalError::KeyLength {
            expected: KEY_SIZE,
            actual: key.len(),
        })?;

        Ok(Self::from_key(key, backend))
    }

    /// Creates a new accumulator from a key of the right size.
    pub fn from_key(key: &[u8; KEY_SIZE], backend: Backend) -> Self {
        tracing::trace!(%backend, "initializing polyval");

        Self {
            h: FieldElement::from_le_bytes(key),
            y: FieldElement::ZERO,
            backend,
        }
    }

    /// Returns the backend performing the multiplications.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Returns the block size, [`BLOCK_SIZE`].
    pub const fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    /// Returns the digest size, [`SIZE`].
    pub const fn size(&self) -> usize {
        SIZE
    }

    /// Absorbs `blocks`, one [`BLOCK_SIZE`] chunk at a time, in order.
    ///
    /// Either every block is absorbed or, on error, the state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if `blocks` is empty or its length is not a multiple
    /// of [`BLOCK_SIZE`].
    #[instrument(level = "trace", skip_all, fields(len = blocks.len()), err)]
    pub fn update(&mut self, blocks: &[u8]) -> Result<(), PolyvalError> {
        if blocks.is_empty() || blocks.len() % BLOCK_SIZE != 0 {
            return Err(PolyvalError::InputLength(blocks.len()));
        }

        let mut rest = blocks;
        while let Some((block, tail)) = rest.split_first_chunk::<BLOCK_SIZE>() {
            self.update_block(block);
            rest = tail;
        }

        Ok(())
    }

    /// Absorbs a single block.
    #[inline]
    pub fn update_block(&mut self, block: &[u8; BLOCK_SIZE]) {
        let x = FieldElement::from_le_bytes(block);
        self.y = self.backend.mul(self.y ^ x, self.h);
    }

    /// Returns the digest of every block absorbed so far.
    ///
    /// The state is not modified; updates may continue afterwards.
    pub fn sum(&self) -> [u8; SIZE] {
        self.y.to_le_bytes()
    }

    /// Appends the digest of every block absorbed so far to `out`.
    pub fn append_sum(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.sum());
    }

    /// Clears the running digest, keeping the key.
    pub fn reset(&mut self) {
        self.y = FieldElement::ZERO;
    }

    /// Serializes the key and the running digest.
    pub fn to_bytes(&self) -> [u8; STATE_LEN] {
        state::encode(&self.h, &self.y)
    }

    /// Restores an accumulator serialized with [`Polyval::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not a serialized state of this version.
    #[instrument(level = "trace", skip_all, fields(len = bytes.len()), err)]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PolyvalError> {
        let (h, y) = state::decode(bytes)?;

        Ok(Self {
            h,
            y,
            backend: Backend::detect(),
        })
    }

    /// Replaces the state of `self` with a serialized state, keeping the
    /// backend.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not a serialized state of this version,
    /// in which case `self` is unchanged.
    #[instrument(level = "trace", skip_all, fields(len = bytes.len()), err)]
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), PolyvalError> {
        let (h, y) = state::decode(bytes)?;
        self.h = h;
        self.y = y;

        Ok(())
    }
}

impl fmt::Debug for Polyval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polyval")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "zeroize")]
impl Drop for Polyval {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.h.zeroize();
        self.y.zeroize();
    }
}
