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

//! The public-facing API of vigil.
//!
//! Wrap any callable in an [`InstrumentedCall`] to get, on every invocation:
//!
//! - lifecycle log lines (`started executing`, `finished successfully in N seconds`),
//! - the process's average CPU and memory usage while the call ran,
//! - warnings for arguments whose runtime type differs from the declared one,
//! - a fallback run in place of a failed call.
//!
//! Log lines go to a handle resolved once, at bind time, from a named profile
//! of a YAML configuration file (see [`vigil_infra::config`]).

extern crate self as vigil_sdk;

pub mod config;
pub mod coordinator;
pub mod error;
pub mod instrument;
pub mod target;

pub use config::{clear_config_path, config_path, set_config_path};
pub use coordinator::{report_mismatches, ExecutionCoordinator, Fallback, Invocation};
pub use error::InvokeError;
pub use instrument::{Instrument, InstrumentedCall};
pub use target::FnTarget;
pub use vigil_macros::target;

pub use vigil_core;
pub use vigil_infra;
pub use vigil_telemetry;

pub mod prelude {
    pub use crate::{Instrument, InstrumentedCall, InvokeError};
    pub use vigil_core::{
        BoundArguments, ExecutionResult, FromValue, Mismatch, Param, Signature, Target, Value,
        ValueType,
    };
    pub use vigil_telemetry::LogHandle;
}

/// Paths used by code generated from `#[target]` and `config_path!`.
#[doc(hidden)]
pub mod __private {
    pub use anyhow;
    pub use vigil_core::{BoundArguments, FromValue, Param, Signature, Target, ValueType};
    pub use vigil_infra::resolve_config_path;
}
