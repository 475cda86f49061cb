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

//! The on-disk layout of a logging configuration file.

use crate::logging::{FileMode, Stream};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// A whole configuration file: named formatters, handlers and loggers.
///
/// Each entry under `loggers` is a profile that an instrumented call can
/// select by name.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Line templates by name, referenced from `handlers`.
    #[serde(default)]
    pub formatters: HashMap<String, FormatterConfig>,
    /// Output destinations by name, referenced from `loggers`.
    #[serde(default)]
    pub handlers: HashMap<String, HandlerConfig>,
    /// The selectable profiles. A file without this section is malformed.
    pub loggers: HashMap<String, LoggerConfig>,
}

/// A named line template.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatterConfig {
    /// Template with `{asctime}`, `{name}`, `{levelname}` and `{message}`
    /// placeholders; `{{` and `}}` are literal braces.
    pub format: String,
}

/// Where a handler writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    /// A file at [`HandlerConfig::path`].
    File,
    /// Standard output or standard error, per [`HandlerConfig::stream`].
    Console,
    /// The global `log` facade.
    Facade,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HandlerConfig {
    /// The destination type.
    pub kind: HandlerKind,
    /// Required for file handlers. Relative paths are resolved against the
    /// configuration file's directory.
    pub path: Option<PathBuf>,
    /// File handlers only: `append` (default) or `truncate`.
    #[serde(default)]
    pub mode: FileMode,
    /// Console handlers only: `stderr` (default) or `stdout`.
    #[serde(default)]
    pub stream: Stream,
    /// Name of an entry in [`LogConfig::formatters`]; without one the
    /// default template is used.
    pub formatter: Option<String>,
    /// Lowest level this handler writes. Without one it writes everything.
    pub level: Option<String>,
}

/// A profile: a level threshold and the handlers it fans out to.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggerConfig {
    /// Lowest level the profile lets through. Without one everything passes.
    pub level: Option<String>,
    /// Names of entries in [`LogConfig::handlers`]. An empty list forwards to
    /// the `log` facade.
    #[serde(default)]
    pub handlers: Vec<String>,
}
