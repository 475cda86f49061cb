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

//! # Vigil Infra
//!
//! Concrete implementations of the contracts defined in `vigil-core`: the
//! `sysinfo`-backed usage probe, the log sinks, and the YAML configuration
//! collaborator that resolves a named profile into a
//! [`LogHandle`](vigil_telemetry::LogHandle).

pub mod config;
pub mod logging;
pub mod platform;

pub use config::{resolve_config_path, resolve_profile, ConfigError, LogConfig};
pub use logging::{default_handle, DEFAULT_LOGGER};
pub use platform::sysinfo_probe::{NullProbe, SysinfoProbe};
