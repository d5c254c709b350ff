// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use latebind::script::{Command, Interpreter};
use latebind::xhr::XmlHttpRequest;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    for line in source.lines() {
        if let Ok(Some(command)) = Command::parse(line) {
            // Rendered commands parse back to themselves.
            assert_eq!(Command::parse(&command.to_string()).ok().flatten(), Some(command));
        }
    }

    // Arbitrary scripts against a live request must fail cleanly, never panic.
    let request = XmlHttpRequest::create();
    let _ = Interpreter::new(&request).run(source);
});
