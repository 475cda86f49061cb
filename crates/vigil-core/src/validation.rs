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

//! Best-effort parameter type validation.
//!
//! Validation is purely observational: mismatches are returned for the caller
//! to report, never raised, and never block the call.

use crate::signature::{BoundArguments, Signature};
use crate::value::ValueType;

/// A divergence between a parameter's declared type and the runtime type of
/// the argument bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// The parameter's name.
    pub param: String,
    /// The declared type.
    pub expected: ValueType,
    /// The runtime type of the supplied argument.
    pub actual: ValueType,
}

impl Mismatch {
    /// Formats the warning line logged for this mismatch.
    pub fn describe(&self, target: &str) -> String {
        format!(
            "Type conflict of `{}` in `{}`: Expected {}; Received {}.",
            self.param, target, self.expected, self.actual
        )
    }
}

/// Compares each supplied argument against its parameter's declared type.
///
/// Parameters without a declaration and parameters the caller did not supply
/// (defaulted ones included) are skipped.
pub fn validate(signature: &Signature, bound: &BoundArguments) -> Vec<Mismatch> {
    signature
        .params()
        .iter()
        .filter_map(|param| {
            let expected = param.declared?;
            if !bound.is_supplied(&param.name) {
                return None;
            }
            let actual = bound.get(&param.name)?.value_type();
            (!expected.accepts(actual)).then(|| Mismatch {
                param: param.name.clone(),
                expected,
                actual,
            })
        })
        .collect()
}
