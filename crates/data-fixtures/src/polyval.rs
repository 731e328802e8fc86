//! POLYVAL fixtures

use crate::define_fixture;

define_fixture!(
    VECTORS,
    "POLYVAL hash vectors in the hctr2 `Polyval.json` layout.\n\n\
     Each entry carries `input.key_hex`, `input.message_hex` and `hash_hex`. \
     The first two entries are the POLYVAL vectors from RFC 8452 Appendix A.",
    "../data/polyval/polyval.json"
);

define_fixture!(
    DOUBLE,
    "128 successive doublings of `01000000000000000000000000000000`, \
     one hex-encoded element per line.",
    "../data/polyval/double"
);
