// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Routes tracing output to a file. The terminal belongs to the TUI, so when
/// the file cannot be opened logs are dropped instead of written to stderr.
pub fn init(level: &str, file: Option<&Path>) {
    let filter = EnvFilter::try_from_env("CHATSUM_LOG")
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = file else {
        tracing_subscriber::registry().with(filter).init();
        return;
    };

    match open_log_file(path) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .init();
            tracing::info!(path = %path.display(), "logging initialized");
        }
        Err(_) => tracing_subscriber::registry().with(filter).init(),
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
