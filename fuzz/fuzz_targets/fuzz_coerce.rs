// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use latebind::dispatch::{coerce, TypeTag, Variant};

const TARGETS: [TypeTag; 6] = [
    TypeTag::Bool,
    TypeTag::Int,
    TypeTag::UInt,
    TypeTag::Float,
    TypeTag::Text,
    TypeTag::Object,
];

/// Variant a successful coercion to `target` must produce.
fn expected_type(target: TypeTag) -> &'static str {
    match target {
        TypeTag::Bool => "bool",
        TypeTag::Int | TypeTag::UInt => "int",
        TypeTag::Float => "float",
        TypeTag::Text => "text",
        TypeTag::Object => "object",
        TypeTag::Any => "any",
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };
    let value = Variant::from(token);

    assert_eq!(coerce(&value, TypeTag::Any).ok(), Some(value.clone()));
    assert!(coerce(&value, TypeTag::Object).is_err());

    for target in TARGETS {
        if let Ok(converted) = coerce(&value, target) {
            assert_eq!(converted.type_name(), expected_type(target));
            if let Variant::Int(n) = converted {
                if target == TypeTag::UInt {
                    assert!(u32::try_from(n).is_ok());
                }
            }
        }
    }
});
