// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Format version ordinals.
//!
//! Field presence is decided by comparing `major * 1000 + minor` against a
//! per-field threshold. Thresholds only ever add fields.

use lcio_sio::BlockVersion;

use crate::LcioError;

/// Oldest ordinal the reader accepts.
pub const MIN_SUPPORTED: u32 = 8;

/// Version written by this crate.
pub const CURRENT: BlockVersion = BlockVersion::new(2, 8);

/// Ordinal of [`CURRENT`].
pub const CURRENT_ORDINAL: u32 = ordinal(CURRENT);

/// `major * 1000 + minor`.
pub const fn ordinal(version: BlockVersion) -> u32 {
    version.major as u32 * 1000 + version.minor as u32
}

/// Inverse of [`ordinal`] for the ordinals this crate writes in tests and tools.
pub const fn from_ordinal(ordinal: u32) -> BlockVersion {
    BlockVersion::new((ordinal / 1000) as u16, (ordinal % 1000) as u16)
}

/// Ordinal of `version`, or [`LcioError::FormatTooOld`].
pub fn check_supported(version: BlockVersion) -> Result<u32, LcioError> {
    let ord = ordinal(version);
    if ord < MIN_SUPPORTED {
        return Err(LcioError::FormatTooOld {
            major: version.major,
            minor: version.minor,
            ordinal: ord,
        });
    }
    Ok(ord)
}
