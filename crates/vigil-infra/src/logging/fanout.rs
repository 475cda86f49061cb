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

//! Dispatching one logger to several handlers.

use log::{Level, LevelFilter};
use std::sync::Arc;
use vigil_core::LogSink;

/// Sends each line to every child sink that accepts its level.
///
/// The fanout's own threshold is the logger level; each child applies its
/// handler level on top.
#[derive(Debug, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn LogSink>>,
    level: LevelFilter,
}

impl FanoutSink {
    /// Creates a fanout over `sinks` with a logger-level threshold.
    pub fn new(sinks: Vec<Arc<dyn LogSink>>, level: LevelFilter) -> Self {
        Self { sinks, level }
    }
}

impl LogSink for FanoutSink {
    fn emit(&self, level: Level, logger: &str, message: &str) {
        if level > self.level {
            return;
        }
        for sink in self.sinks.iter().filter(|s| s.enabled(level)) {
            sink.emit(level, logger, message);
        }
    }

    fn enabled(&self, level: Level) -> bool {
        level <= self.level && self.sinks.iter().any(|s| s.enabled(level))
    }

    fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }
}
