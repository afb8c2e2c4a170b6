// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Converts a slot count or slot position into the signed index space.
///
/// Window geometry is validated to fit `i64` when a config is built, so the
/// saturating fallback is never hit for slot-sized values.
#[inline]
pub(crate) fn to_index(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
