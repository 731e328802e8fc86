//! Test vectors for the POLYVAL workspace.

pub mod polyval;

macro_rules! define_fixture {
    ($name:ident, $doc:tt, $path:tt) => {
        #[doc = $doc]
        pub const $name: &[u8] = include_bytes!($path);
    };
}

pub(crate) use define_fixture;
