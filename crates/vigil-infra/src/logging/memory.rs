// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-memory capture of log lines.

use crate::logging::format::LineFormat;
use crate::logging::logger::LoggerSink;
use env_logger::Target;
use log::{Level, LevelFilter};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use vigil_core::LogSink;

/// The byte buffer an in-memory logger writes into.
#[derive(Debug, Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps every formatted line in memory.
///
/// Useful for asserting on instrumentation output without touching the disk.
#[derive(Debug)]
pub struct MemorySink {
    buffer: SharedBuffer,
    logger: LoggerSink,
}

impl MemorySink {
    /// Creates a sink formatting lines as `LEVEL - name - message`.
    pub fn new() -> Self {
        Self::with_format(
            LineFormat::new("{levelname} - {name} - {message}"),
            LevelFilter::Trace,
        )
    }

    /// Creates a sink with an explicit format and level threshold.
    pub fn with_format(format: LineFormat, level: LevelFilter) -> Self {
        let buffer = SharedBuffer::default();
        let logger = LoggerSink::new(
            Target::Pipe(Box::new(buffer.clone())),
            "memory",
            format,
            level,
        );
        Self { buffer, logger }
    }

    /// A copy of the captured lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buffer.lock())
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// The captured lines joined with newlines.
    pub fn contents(&self) -> String {
        self.lines().join("\n")
    }

    /// Returns `true` if any captured line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    /// Discards every captured line.
    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, level: Level, logger: &str, message: &str) {
        self.logger.emit(level, logger, message);
    }

    fn enabled(&self, level: Level) -> bool {
        self.logger.enabled(level)
    }
}
