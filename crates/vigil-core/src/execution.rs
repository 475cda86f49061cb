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

//! Targets and the outcome of one instrumented invocation.

use crate::signature::{BoundArguments, Signature};

/// A callable that can be instrumented.
///
/// A target exposes its [`Signature`] (built once, at bind time) and is invoked
/// with arguments bound against it. Implemented by closures wrapped in the SDK
/// and by the `#[target]` attribute macro.
pub trait Target: Send + Sync + 'static {
    /// The value a successful call produces.
    type Output: Send;

    /// The target's name and parameter table.
    fn signature(&self) -> Signature;

    /// Calls the target.
    fn call(&self, args: &BoundArguments) -> anyhow::Result<Self::Output>;
}

/// The outcome of one invocation.
///
/// `NoResult` is distinct from any value the target could return, so a failed
/// call without a fallback can never be mistaken for a legitimate result.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult<T> {
    /// The target returned normally.
    Completed(T),
    /// The target failed and the fallback produced this value.
    Recovered(T),
    /// The target failed and no fallback was supplied.
    NoResult {
        /// The target's error, formatted.
        error: String,
    },
}

impl<T> ExecutionResult<T> {
    /// Returns the produced value, from the target or the fallback.
    pub fn value(&self) -> Option<&T> {
        match self {
            ExecutionResult::Completed(v) | ExecutionResult::Recovered(v) => Some(v),
            ExecutionResult::NoResult { .. } => None,
        }
    }

    /// Consumes the result, returning the produced value if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            ExecutionResult::Completed(v) | ExecutionResult::Recovered(v) => Some(v),
            ExecutionResult::NoResult { .. } => None,
        }
    }

    /// Returns `true` if the target itself succeeded.
    pub fn is_completed(&self) -> bool {
        matches!(self, ExecutionResult::Completed(_))
    }

    /// Returns `true` if the fallback produced the value.
    pub fn is_recovered(&self) -> bool {
        matches!(self, ExecutionResult::Recovered(_))
    }

    /// Returns `true` if the target failed and there was no fallback.
    pub fn is_no_result(&self) -> bool {
        matches!(self, ExecutionResult::NoResult { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_result_is_distinguishable() {
        let none_value: ExecutionResult<Option<i64>> = ExecutionResult::Completed(None);
        let missing: ExecutionResult<Option<i64>> = ExecutionResult::NoResult {
            error: "boom".to_string(),
        };

        assert_eq!(none_value.value(), Some(&None));
        assert_eq!(missing.value(), None);
        assert!(missing.is_no_result());
        assert!(!none_value.is_no_result());
    }

    #[test]
    fn test_recovered_value() {
        let res = ExecutionResult::Recovered(-1);
        assert!(res.is_recovered());
        assert!(!res.is_completed());
        assert_eq!(res.into_value(), Some(-1));
    }
}
