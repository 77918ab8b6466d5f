// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Properties of version ordinals.

use lcio_codec::version::{check_supported, from_ordinal, ordinal, MIN_SUPPORTED};
use lcio_codec::LcioError;
use lcio_sio::BlockVersion;
use proptest::prelude::*;

fn version() -> impl Strategy<Value = BlockVersion> {
    (0u16..60, 0u16..1000).prop_map(|(major, minor)| BlockVersion::new(major, minor))
}

proptest! {
    #[test]
    fn ordinal_order_matches_version_order(a in version(), b in version()) {
        prop_assert_eq!(a.cmp(&b), ordinal(a).cmp(&ordinal(b)));
    }

    #[test]
    fn ordinals_invert(v in version()) {
        prop_assert_eq!(from_ordinal(ordinal(v)), v);
    }

    #[test]
    fn floor_is_exact(v in version()) {
        match check_supported(v) {
            Ok(ord) => {
                prop_assert!(ord >= MIN_SUPPORTED);
                prop_assert_eq!(ord, ordinal(v));
            }
            Err(LcioError::FormatTooOld { ordinal: ord, .. }) => prop_assert!(ord < MIN_SUPPORTED),
            Err(other) => prop_assert!(false, "unexpected {}", other),
        }
    }
}
