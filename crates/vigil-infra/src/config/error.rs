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

//! Errors raised while resolving a logging profile.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A configuration file could not be turned into a log handle.
///
/// [`resolve_profile`](super::resolve_profile) never surfaces these; it logs
/// them and falls back to the default handle.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration path was set.
    #[error("no configuration file path was set")]
    NoPath,
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The file is not valid YAML for the expected layout.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// The configuration file.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_yaml::Error,
    },
    /// The `loggers` section has no entry for the requested profile.
    #[error("profile `{0}` is not defined under `loggers`")]
    MissingProfile(String),
    /// A logger references a handler that is not defined.
    #[error("logger `{logger}` references unknown handler `{handler}`")]
    UnknownHandler {
        /// The logger entry.
        logger: String,
        /// The missing handler name.
        handler: String,
    },
    /// A handler references a formatter that is not defined.
    #[error("handler `{handler}` references unknown formatter `{formatter}`")]
    UnknownFormatter {
        /// The handler entry.
        handler: String,
        /// The missing formatter name.
        formatter: String,
    },
    /// A file handler has no `path`.
    #[error("file handler `{0}` has no path")]
    MissingPath(String),
    /// A level name could not be parsed.
    #[error("invalid level `{0}`")]
    InvalidLevel(String),
    /// A file handler's log file could not be opened.
    #[error("failed to open log file {}: {source}", path.display())]
    OpenLogFile {
        /// The log file.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}
