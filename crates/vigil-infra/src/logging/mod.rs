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

//! Concrete log sinks and the default handle.

pub mod facade;
pub mod fanout;
pub mod format;
pub mod logger;
pub mod memory;

pub use facade::FacadeSink;
pub use fanout::FanoutSink;
pub use format::{LineFormat, DEFAULT_FORMAT};
pub use logger::{FileMode, LoggerSink, Stream};
pub use memory::MemorySink;

use log::LevelFilter;
use std::sync::Arc;
use vigil_telemetry::LogHandle;

/// The name of the handle used when no profile can be resolved.
pub const DEFAULT_LOGGER: &str = "default_root";

/// Returns the fallback handle: lines are forwarded to the `log` facade under
/// the `default_root` target, so whatever logger the application installed
/// decides where they go.
pub fn default_handle() -> LogHandle {
    LogHandle::new(DEFAULT_LOGGER, Arc::new(FacadeSink::new()))
}

/// Parses a level name. Besides the `log` names (`error` to `trace`, `off`),
/// the `warning`, `critical`, `fatal` and `notset` aliases are accepted.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    let name = name.trim();
    match name.to_ascii_lowercase().as_str() {
        "warning" => Some(LevelFilter::Warn),
        "critical" | "fatal" => Some(LevelFilter::Error),
        "notset" => Some(LevelFilter::Trace),
        _ => name.parse().ok(),
    }
}
