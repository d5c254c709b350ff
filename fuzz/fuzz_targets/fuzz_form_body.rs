// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use latebind::xhr::format::{response_text, to_lines};
use latebind::xhr::{parse_form_body, Dictionary};

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    let mut dict = Dictionary::default();
    let count = parse_form_body(body, &mut dict);
    assert!(dict.len() <= count);

    // Rendering never fails, with or without a callback token.
    let _ = to_lines(&dict);
    let _ = response_text(body, "callback=", &dict);
});
