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

//! Errors surfaced by an instrumented invocation.

use thiserror::Error;
use vigil_core::BindError;

/// Why an invocation produced no [`ExecutionResult`](vigil_core::ExecutionResult).
///
/// Target failures never appear here: they are recovered through the fallback
/// or reported as `ExecutionResult::NoResult`.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The arguments do not fit the target's signature. Nothing was executed.
    #[error(transparent)]
    Bind(#[from] BindError),
    /// The fallback itself failed or panicked.
    #[error("fallback for `{target}` failed: {error:#}")]
    Fallback {
        /// The target whose fallback failed.
        target: String,
        /// The fallback's error.
        error: anyhow::Error,
    },
}
