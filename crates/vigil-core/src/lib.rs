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

//! # Vigil Core
//!
//! Foundational crate containing the contracts and plain data types shared by
//! every other vigil crate: dynamic argument values, call signatures, type
//! validation, resource usage samples and the logging sink interface.

#![warn(missing_docs)]

pub mod execution;
pub mod logging;
pub mod signature;
pub mod telemetry;
pub mod validation;
pub mod value;

pub use execution::{ExecutionResult, Target};
pub use logging::LogSink;
pub use signature::{BindError, BoundArguments, Param, Signature};
pub use telemetry::{UsageAccumulator, UsageAverage, UsageProbe, UsageSample};
pub use validation::{validate, Mismatch};
pub use value::{FromValue, Value, ValueError, ValueType};
