//! Serialized accumulator state.
//!
//! Layout, [`STATE_LEN`] bytes:
//!
//! ```text
//! +---------------+---------+-----------+-----------+
//! | "polyval" (7) | ver (1) | h (16)    | y (16)    |
//! +---------------+---------+-----------+-----------+
//! ```
//!
//! `h` and `y` use the field byte encoding.

use crate::{
    error::StateError,
    field::{FieldElement, ELEMENT_SIZE},
};

/// Length of a serialized state in bytes.
pub const STATE_LEN: usize = MAGIC.len() + 1 + 2 * ELEMENT_SIZE;

const MAGIC: &[u8; 7] = b"polyval";
const VERSION: u8 = 1;

const H_OFFSET: usize = MAGIC.len() + 1;
const Y_OFFSET: usize = H_OFFSET + ELEMENT_SIZE;

pub(crate) fn encode(h: &FieldElement, y: &FieldElement) -> [u8; STATE_LEN] {
    let mut out = [0u8; STATE_LEN];
    out[..MAGIC.len()].copy_from_slice(MAGIC);
    out[MAGIC.len()] = VERSION;
    out[H_OFFSET..Y_OFFSET].copy_from_slice(&h.to_le_bytes());
    out[Y_OFFSET..].copy_from_slice(&y.to_le_bytes());
    out
}

/// Decodes `(h, y)` from a serialized state.
pub(crate) fn decode(bytes: &[u8]) -> Result<(FieldElement, FieldElement), StateError> {
    let bytes: &[u8; STATE_LEN] = bytes.try_into().map_err(|_| StateError::Length {
        expected: STATE_LEN,
        actual: bytes.len(),
    })?;

    let (magic, rest) = bytes.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err(StateError::Magic);
    }

    if rest[0] != VERSION {
        return Err(StateError::Version(rest[0]));
    }

    let mut h = [0u8; ELEMENT_SIZE];
    let mut y = [0u8; ELEMENT_SIZE];
    h.copy_from_slice(&bytes[H_OFFSET..Y_OFFSET]);
    y.copy_from_slice(&bytes[Y_OFFSET..]);

    Ok((FieldElement::from_le_bytes(&h), FieldElement::from_le_bytes(&y)))
}

#[cfg(feature = "serde")]
mod serde_impl {
    use core::fmt;

    use serde::{
        de::{self, SeqAccess, Visitor},
        Deserialize, Deserializer, Serialize, Serializer,
    };

    use super::STATE_LEN;
    use crate::Polyval;

    impl Serialize for Polyval {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }

    impl<'de> Deserialize<'de> for Polyval {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_bytes(StateVisitor)
        }
    }

    struct StateVisitor;

    impl<'de> Visitor<'de> for StateVisitor {
        type Value = Polyval;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a {STATE_LEN}-byte serialized POLYVAL state")
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Polyval, E> {
            Polyval::from_bytes(v).map_err(E::custom)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Polyval, A::Error> {
            let mut bytes = Vec::with_capacity(STATE_LEN);
            while let Some(b) = seq.next_element::<u8>()? {
                if bytes.len() == STATE_LEN {
                    return Err(de::Error::invalid_length(STATE_LEN + 1, &self));
                }
                bytes.push(b);
            }
            Polyval::from_bytes(&bytes).map_err(de::Error::custom)
        }
    }
}
