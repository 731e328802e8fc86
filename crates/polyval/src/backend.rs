//! Autodetection for CPU intrinsics, with fallback to the "soft" backend when
//! they are unavailable.

use core::fmt;

use cfg_if::cfg_if;

use crate::field::FieldElement;

pub(crate) mod soft;

cfg_if! {
    if #[cfg(all(any(target_arch = "x86_64", target_arch = "x86"), not(feature = "force-soft")))] {
        mod clmul;
        cpufeatures::new!(mul_intrinsics, "pclmulqdq", "sse2");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Soft,
    #[cfg(all(
        any(target_arch = "x86_64", target_arch = "x86"),
        not(feature = "force-soft")
    ))]
    Clmul,
}

/// The multiplier used by an accumulator.
///
/// Obtained from [`Backend::detect`] or [`Backend::soft`]. A backend using CPU
/// intrinsics can only be obtained after the CPU was checked to support them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backend(Kind);

impl Backend {
    /// Returns the fastest backend supported by the running CPU.
    pub fn detect() -> Self {
        cfg_if! {
            if #[cfg(all(any(target_arch = "x86_64", target_arch = "x86"), not(feature = "force-soft")))] {
                if mul_intrinsics::get() {
                    Self(Kind::Clmul)
                } else {
                    // Supported arch was found but intrinsics are not available.
                    Self(Kind::Soft)
                }
            } else {
                Self(Kind::Soft)
            }
        }
    }

    /// Returns the portable constant-time backend.
    pub const fn soft() -> Self {
        Self(Kind::Soft)
    }

    /// Returns `true` if this backend uses CPU carryless multiply instructions.
    pub fn is_intrinsic(&self) -> bool {
        self.0 != Kind::Soft
    }

    /// Returns the name of the backend.
    pub fn name(&self) -> &'static str {
        match self.0 {
            Kind::Soft => "soft",
            #[cfg(all(
                any(target_arch = "x86_64", target_arch = "x86"),
                not(feature = "force-soft")
            ))]
            Kind::Clmul => "clmul",
        }
    }

    /// Returns the POLYVAL product `x * y * x^-128`.
    #[inline]
    pub(crate) fn mul(self, x: FieldElement, y: FieldElement) -> FieldElement {
        match self.0 {
            Kind::Soft => soft::polymul(x, y),
            #[cfg(all(
                any(target_arch = "x86_64", target_arch = "x86"),
                not(feature = "force-soft")
            ))]
            // SAFETY: `Kind::Clmul` is only constructed after `mul_intrinsics`
            // confirmed CPU support.
            Kind::Clmul => unsafe { clmul::polymul(x, y) },
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
