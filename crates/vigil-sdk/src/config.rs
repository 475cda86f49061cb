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

//! The process-wide configuration file path.
//!
//! Set once at start-up; every [`Instrument`](crate::Instrument) that does not
//! name its own file resolves its profile against this one.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use vigil_infra::resolve_config_path;

static CONFIG_PATH: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Sets the process-wide configuration file.
///
/// Relative paths are resolved against the current directory at the time of
/// the call. Use [`config_path!`](crate::config_path!) to resolve relative to
/// the calling crate instead.
pub fn set_config_path(path: impl AsRef<Path>) {
    let path = path.as_ref();
    let resolved = match std::env::current_dir() {
        Ok(cwd) => resolve_config_path(path, cwd),
        Err(e) => {
            log::debug!("[config] cannot read the current directory: {e}");
            path.to_path_buf()
        }
    };
    log::debug!("[config] configuration file set to {}", resolved.display());
    *CONFIG_PATH.write().unwrap_or_else(PoisonError::into_inner) = Some(resolved);
}

/// Clears the process-wide configuration file.
pub fn clear_config_path() {
    *CONFIG_PATH.write().unwrap_or_else(PoisonError::into_inner) = None;
}

/// The process-wide configuration file, if one was set.
pub fn config_path() -> Option<PathBuf> {
    CONFIG_PATH
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Resolves a configuration path relative to the calling crate's manifest
/// directory. Absolute paths are returned unchanged.
#[macro_export]
macro_rules! config_path {
    ($path:expr) => {
        $crate::__private::resolve_config_path($path, env!("CARGO_MANIFEST_DIR"))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let dir = std::env::temp_dir();
        let absolute = dir.join("vigil-config.yaml");

        set_config_path(&absolute);
        assert_eq!(config_path(), Some(absolute));

        set_config_path("relative.yaml");
        let resolved = config_path().unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("relative.yaml"));

        clear_config_path();
        assert_eq!(config_path(), None);
    }

    #[test]
    fn test_macro_resolves_against_manifest_dir() {
        let path = crate::config_path!("tests/config.yaml");
        assert_eq!(
            path,
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/config.yaml")
        );
    }
}
