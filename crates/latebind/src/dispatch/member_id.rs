// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Member identifiers derived from member names.
//!
//! A [`MemberId`] is the 32-bit FNV-1a hash of the member's UTF-8 name. The
//! mapping is a pure function: the same name yields the same id in every
//! process and on every platform.
//!
//! # Collisions
//!
//! Collisions are **not** resolved. Two distinct names with the same hash are
//! indistinguishable to every registry and attribute store; registering the
//! second one overwrites the first. [`member_id`] is public so callers can
//! check their own member tables for clashes.

use std::fmt;

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Numeric handle of a late-bound member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct MemberId(pub u32);

impl MemberId {
    /// The "no member" id.
    ///
    /// Returned by verified lookups of unknown names, and used by hosts to
    /// address the object itself (construct / default-member calls).
    pub const NONE: Self = Self(0);

    /// Id of `name`.
    pub const fn of(name: &str) -> Self {
        member_id(name)
    }

    /// True for [`MemberId::NONE`].
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl From<u32> for MemberId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Hash a member name into its [`MemberId`] (32-bit FNV-1a).
pub const fn member_id(name: &str) -> MemberId {
    let bytes = name.as_bytes();
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    MemberId(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn known_vectors() {
        // Reference values of 32-bit FNV-1a.
        assert_eq!(member_id(""), MemberId(0x811C_9DC5));
        assert_eq!(member_id("a"), MemberId(0xE40C_292C));
        assert_eq!(member_id("foobar"), MemberId(0xBF9C_F968));
    }

    #[test]
    fn stable_and_distinct() {
        assert_eq!(member_id("open"), member_id("open"));
        assert_ne!(member_id("open"), member_id("Open"));
        assert_eq!(MemberId::of("send"), member_id("send"));
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(MemberId(0xAB).to_string(), "0x000000AB");
    }

    #[test]
    fn known_collisions() {
        for (a, b) in [
            ("costarring", "liquid"),
            ("declinate", "macallums"),
            ("altarage", "zinke"),
            ("altarages", "zinkes"),
        ] {
            assert_eq!(member_id(a), member_id(b), "{} / {}", a, b);
        }
    }

    #[test]
    fn no_collisions_among_short_sequential_names() {
        let mut seen: HashMap<MemberId, String> = HashMap::new();
        for i in 0..10_000u32 {
            let name = format!("m{}", i);
            if let Some(prev) = seen.insert(member_id(&name), name.clone()) {
                panic!("unexpected collision: {} / {}", prev, name);
            }
        }
    }
}
