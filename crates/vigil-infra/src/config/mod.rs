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

//! The configuration collaborator: resolves a named logging profile from a
//! YAML file into a [`LogHandle`].
//!
//! ```yaml
//! formatters:
//!   simple:
//!     format: "{asctime} - {name} - {levelname} - {message}"
//! handlers:
//!   logfile:
//!     kind: file
//!     path: logs/test.log
//!     formatter: simple
//! loggers:
//!   clean:
//!     level: info
//!     handlers: [logfile]
//! ```

pub mod error;
pub mod schema;

pub use error::ConfigError;
pub use schema::{FormatterConfig, HandlerConfig, HandlerKind, LogConfig, LoggerConfig};

use crate::logging::{
    default_handle, parse_level, FacadeSink, FanoutSink, LineFormat, LoggerSink, DEFAULT_LOGGER,
};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vigil_core::LogSink;
use vigil_telemetry::LogHandle;

/// Resolves `path` against `base_dir` unless it is already absolute.
pub fn resolve_config_path(path: impl AsRef<Path>, base_dir: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.as_ref().join(path)
    }
}

/// Reads and parses a configuration file.
pub fn load_config(path: &Path) -> Result<LogConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds the handle for `profile`. Relative file handler paths are resolved
/// against `base_dir`.
pub fn build_handle(
    config: &LogConfig,
    profile: &str,
    base_dir: &Path,
) -> Result<LogHandle, ConfigError> {
    let logger = config
        .loggers
        .get(profile)
        .ok_or_else(|| ConfigError::MissingProfile(profile.to_string()))?;
    let level = level_or_all(logger.level.as_deref())?;

    let mut sinks: Vec<Arc<dyn LogSink>> = Vec::with_capacity(logger.handlers.len());
    for name in &logger.handlers {
        let handler = config
            .handlers
            .get(name)
            .ok_or_else(|| ConfigError::UnknownHandler {
                logger: profile.to_string(),
                handler: name.clone(),
            })?;
        sinks.push(build_sink(config, name, handler, base_dir)?);
    }
    if sinks.is_empty() {
        // A logger without handlers propagates to the application's logger.
        sinks.push(Arc::new(FacadeSink::new()));
    }

    log::debug!(
        "[config] resolved profile `{}` with {} handler(s)",
        profile,
        sinks.len()
    );
    Ok(LogHandle::new(profile, Arc::new(FanoutSink::new(sinks, level))))
}

fn build_sink(
    config: &LogConfig,
    name: &str,
    handler: &HandlerConfig,
    base_dir: &Path,
) -> Result<Arc<dyn LogSink>, ConfigError> {
    let format = match &handler.formatter {
        Some(formatter) => config
            .formatters
            .get(formatter)
            .map(|f| LineFormat::new(f.format.clone()))
            .ok_or_else(|| ConfigError::UnknownFormatter {
                handler: name.to_string(),
                formatter: formatter.clone(),
            })?,
        None => LineFormat::default(),
    };
    let level = level_or_all(handler.level.as_deref())?;

    let sink: Arc<dyn LogSink> = match handler.kind {
        HandlerKind::File => {
            let path = handler
                .path
                .as_ref()
                .ok_or_else(|| ConfigError::MissingPath(name.to_string()))?;
            let path = resolve_config_path(path, base_dir);
            let sink = LoggerSink::file(&path, handler.mode, format, level)
                .map_err(|source| ConfigError::OpenLogFile { path, source })?;
            Arc::new(sink)
        }
        HandlerKind::Console => Arc::new(LoggerSink::console(handler.stream, format, level)),
        HandlerKind::Facade => Arc::new(FacadeSink::new()),
    };
    Ok(sink)
}

fn level_or_all(level: Option<&str>) -> Result<LevelFilter, ConfigError> {
    match level {
        Some(name) => {
            parse_level(name).ok_or_else(|| ConfigError::InvalidLevel(name.to_string()))
        }
        None => Ok(LevelFilter::Trace),
    }
}

/// Loads `path` and builds the handle for `profile`.
pub fn try_resolve_profile(path: Option<&Path>, profile: &str) -> Result<LogHandle, ConfigError> {
    let path = path.ok_or(ConfigError::NoPath)?;
    let config = load_config(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    build_handle(&config, profile, base_dir)
}

/// Resolves a profile, degrading to the [`default_handle`] on any failure.
///
/// Failures are only visible as `debug` diagnostics on the `log` facade; they
/// never reach the caller.
pub fn resolve_profile(path: Option<&Path>, profile: Option<&str>) -> LogHandle {
    let Some(profile) = profile else {
        log::debug!("[config] no profile selected, using `{DEFAULT_LOGGER}`");
        return default_handle();
    };
    match try_resolve_profile(path, profile) {
        Ok(handle) => handle,
        Err(e) => {
            log::debug!("[config] {e}; using `{DEFAULT_LOGGER}`");
            default_handle()
        }
    }
}
