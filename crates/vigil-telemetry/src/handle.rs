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

//! A resolved logging handle with its serialising lock.

use log::Level;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use vigil_core::LogSink;

/// A named logging sink guarded by a lock.
///
/// Every emission holds the lock for the duration of the write only, so lines
/// coming from the execution thread and the monitor thread of one invocation
/// never interleave. Clones share the sink and the lock; a handle built with
/// [`LogHandle::new`] gets a fresh lock.
#[derive(Clone)]
pub struct LogHandle {
    name: Arc<str>,
    sink: Arc<dyn LogSink>,
    lock: Arc<Mutex<()>>,
}

impl LogHandle {
    /// Creates a handle named after the profile it was resolved from.
    pub fn new(name: impl Into<Arc<str>>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            name: name.into(),
            sink,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// The profile name this handle was resolved from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying sink.
    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    /// Writes one line under the handle's lock.
    pub fn emit(&self, level: Level, message: &str) {
        if !self.sink.enabled(level) {
            return;
        }
        // A panic while writing must not silence every later line.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.sink.emit(level, &self.name, message);
    }

    /// Writes an `INFO` line.
    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    /// Writes a `WARN` line.
    pub fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    /// Writes an `ERROR` line.
    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    /// Flushes the sink under the handle's lock.
    pub fn flush(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.sink.flush();
    }
}

impl fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogHandle")
            .field("name", &self.name)
            .field("sink", &self.sink)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Debug, Default)]
    struct RecordingSink {
        lines: Mutex<Vec<(Level, String, String)>>,
        min_level: Option<Level>,
    }

    impl LogSink for RecordingSink {
        fn emit(&self, level: Level, logger: &str, message: &str) {
            self.lines
                .lock()
                .unwrap()
                .push((level, logger.to_string(), message.to_string()));
        }

        fn enabled(&self, level: Level) -> bool {
            self.min_level.map_or(true, |min| level <= min)
        }
    }

    #[test]
    fn test_emit_passes_profile_name() {
        let sink = Arc::new(RecordingSink::default());
        let handle = LogHandle::new("clean", sink.clone());

        handle.info("hello");
        handle.warn("careful");

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (Level::Info, "clean".to_string(), "hello".to_string()));
        assert_eq!(lines[1].0, Level::Warn);
    }

    #[test]
    fn test_disabled_levels_are_dropped() {
        let sink = Arc::new(RecordingSink {
            min_level: Some(Level::Warn),
            ..Default::default()
        });
        let handle = LogHandle::new("quiet", sink.clone());

        handle.info("dropped");
        handle.error("kept");

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].2, "kept");
    }

    #[test]
    fn test_concurrent_emitters_keep_every_line() {
        let sink = Arc::new(RecordingSink::default());
        let handle = LogHandle::new("clean", sink.clone());

        thread::scope(|s| {
            for t in 0..4 {
                let handle = handle.clone();
                s.spawn(move || {
                    for i in 0..50 {
                        handle.info(&format!("thread {t} line {i}"));
                    }
                });
            }
        });

        assert_eq!(sink.lines.lock().unwrap().len(), 200);
    }
}
