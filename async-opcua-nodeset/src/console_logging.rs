// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

//! Logger that writes to the console, configured through the `RUST_LOG` environment
//! variable.

use std::io::Write;

/// Install the console logger. Calling this more than once, or after another logger
/// has been installed, has no effect.
pub fn init() {
    let mut builder = env_logger::Builder::from_default_env();
    builder.format(|buf, record| {
        let now = chrono::Utc::now();
        writeln!(
            buf,
            "{} - {} - {} - {}",
            now.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });
    let _ = builder.try_init();
}
