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

//! Forwarding to the `log` facade.

use log::Level;
use vigil_core::LogSink;

/// Forwards every line to the `log` facade, using the profile name as target.
#[derive(Debug, Default, Clone, Copy)]
pub struct FacadeSink;

impl FacadeSink {
    /// Creates a facade sink.
    pub fn new() -> Self {
        Self
    }
}

impl LogSink for FacadeSink {
    fn emit(&self, level: Level, logger: &str, message: &str) {
        log::log!(target: logger, level, "{message}");
    }

    fn enabled(&self, level: Level) -> bool {
        level <= log::max_level()
    }

    fn flush(&self) {
        log::logger().flush();
    }
}
