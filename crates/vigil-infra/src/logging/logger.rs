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

//! Handlers backed by `env_logger`.
//!
//! Every configured console or file handler is a standalone
//! [`env_logger::Logger`] built for that handler alone: its own target, its
//! own [`LineFormat`] and its own level filter. Nothing is installed as the
//! global logger.

use crate::logging::format::LineFormat;
use env_logger::{Builder, Logger, Target, WriteStyle};
use log::{Level, LevelFilter, Log, Record};
use serde::Deserialize;
use std::fmt;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};
use vigil_core::LogSink;

/// How a file handler opens its file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileMode {
    /// Keep existing content and append.
    #[default]
    Append,
    /// Empty the file the first time a handler opens it in this process,
    /// then append.
    Truncate,
}

/// Files already emptied by a [`FileMode::Truncate`] handler.
static TRUNCATED: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();

/// Returns `true` the first time `path` is claimed in this process.
fn claim_truncation(path: &Path) -> bool {
    let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    TRUNCATED
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key)
}

/// Which standard stream a console handler writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    #[default]
    Stderr,
}

impl From<Stream> for Target {
    fn from(stream: Stream) -> Self {
        match stream {
            Stream::Stdout => Target::Stdout,
            Stream::Stderr => Target::Stderr,
        }
    }
}

/// A [`LogSink`] writing through its own `env_logger` logger.
///
/// `env_logger` formats each record into a buffer and hands it to the target
/// in one write, so lines from concurrent emitters never interleave.
pub struct LoggerSink {
    logger: Logger,
    destination: String,
}

impl LoggerSink {
    /// Builds a logger writing to `target`.
    pub fn new(
        target: Target,
        destination: impl Into<String>,
        format: LineFormat,
        level: LevelFilter,
    ) -> Self {
        let logger = Builder::new()
            .target(target)
            .write_style(WriteStyle::Never)
            .filter_level(level)
            .format(move |buf, record| format.write(buf, record))
            .build();
        Self {
            logger,
            destination: destination.into(),
        }
    }

    /// A handler writing to stdout or stderr.
    pub fn console(stream: Stream, format: LineFormat, level: LevelFilter) -> Self {
        let destination = match stream {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        };
        Self::new(stream.into(), destination, format, level)
    }

    /// A handler writing to the file at `path`, creating it and its parent
    /// directories if needed.
    ///
    /// The file is always written through an append handle, so several
    /// handlers on the same path (one per bound call) add whole lines after
    /// each other. [`FileMode::Truncate`] empties the file only for the first
    /// handler opened on it in this process.
    pub fn file(
        path: impl AsRef<Path>,
        mode: FileMode,
        format: LineFormat,
        level: LevelFilter,
    ) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        if mode == FileMode::Truncate && claim_truncation(path) {
            file.set_len(0)?;
        }
        Ok(Self::new(
            Target::Pipe(Box::new(file)),
            format!("file:{}", path.display()),
            format,
            level,
        ))
    }

    /// Where this handler writes, e.g. `stderr` or `file:logs/run.log`.
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

impl LogSink for LoggerSink {
    fn emit(&self, level: Level, logger: &str, message: &str) {
        self.logger.log(
            &Record::builder()
                .args(format_args!("{message}"))
                .level(level)
                .target(logger)
                .build(),
        );
    }

    fn enabled(&self, level: Level) -> bool {
        level <= self.logger.filter()
    }

    fn flush(&self) {
        self.logger.flush();
    }
}

impl fmt::Debug for LoggerSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerSink")
            .field("destination", &self.destination)
            .field("level", &self.logger.filter())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_file_handler_writes_one_line_per_emit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("test.log");
        let sink = LoggerSink::file(
            &path,
            FileMode::Append,
            LineFormat::new("{levelname} {message}"),
            LevelFilter::Info,
        )
        .unwrap();

        sink.emit(Level::Info, "clean", "started");
        sink.emit(Level::Debug, "clean", "hidden");
        sink.emit(Level::Error, "clean", "boom");

        assert_eq!(fs::read_to_string(&path).unwrap(), "INFO started\nERROR boom\n");
        assert!(!sink.enabled(Level::Debug));
        assert!(sink.destination().starts_with("file:"));
    }

    #[test]
    fn test_truncate_mode_empties_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        fs::write(&path, "stale\n").unwrap();

        let sink = LoggerSink::file(
            &path,
            FileMode::Truncate,
            LineFormat::new("{message}"),
            LevelFilter::Trace,
        )
        .unwrap();
        sink.emit(Level::Info, "clean", "fresh");
        sink.emit(Level::Info, "clean", "again");

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\nagain\n");

        let reopened = LoggerSink::file(
            &path,
            FileMode::Truncate,
            LineFormat::new("{message}"),
            LevelFilter::Trace,
        )
        .unwrap();
        reopened.emit(Level::Info, "clean", "third");

        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\nagain\nthird\n");
    }

    #[test]
    fn test_append_mode_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.log");
        fs::write(&path, "old\n").unwrap();

        let sink = LoggerSink::file(
            &path,
            FileMode::Append,
            LineFormat::new("{message}"),
            LevelFilter::Trace,
        )
        .unwrap();
        sink.emit(Level::Info, "clean", "new");

        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_two_truncating_handlers_on_one_file_keep_whole_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.log");
        let open = || {
            Arc::new(
                LoggerSink::file(
                    &path,
                    FileMode::Truncate,
                    LineFormat::new("{name} {message}"),
                    LevelFilter::Trace,
                )
                .unwrap(),
            )
        };
        let (first, second) = (open(), open());

        thread::scope(|s| {
            for (sink, name) in [(&first, "first_handler_with_long_name"), (&second, "b")] {
                s.spawn(move || {
                    for i in 0..50 {
                        sink.emit(Level::Info, name, &format!("line {i}"));
                    }
                });
            }
        });

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 100);
        assert!(lines.iter().all(|l| {
            l.starts_with("first_handler_with_long_name line ") || l.starts_with("b line ")
        }));
    }

    #[test]
    fn test_console_destination() {
        let sink = LoggerSink::console(Stream::Stdout, LineFormat::default(), LevelFilter::Warn);
        assert_eq!(sink.destination(), "stdout");
        assert!(sink.enabled(Level::Error));
        assert!(!sink.enabled(Level::Info));
    }
}
