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

//! The logging sink contract.
//!
//! Vigil does not implement a logging backend. Instrumentation lines are handed
//! to a [`LogSink`], which the configuration layer in `vigil-infra` resolves
//! from a named profile (file, console, or the `log` facade).

use log::Level;
use std::fmt::Debug;

/// A destination for instrumentation log lines.
pub trait LogSink: Send + Sync + Debug + 'static {
    /// Writes one line. `logger` is the name of the resolved profile.
    fn emit(&self, level: Level, logger: &str, message: &str);

    /// Returns `true` if a line at `level` would be written.
    fn enabled(&self, _level: Level) -> bool {
        true
    }

    /// Flushes buffered output, if any.
    fn flush(&self) {}
}
