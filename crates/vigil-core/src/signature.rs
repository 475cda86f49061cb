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

//! Typed-parameter descriptor tables and argument binding.
//!
//! A [`Signature`] is built once, when a target is bound, and describes the
//! target's name and the declared type of each of its parameters. At each
//! invocation the caller's positional and keyword arguments are bound against
//! it, producing [`BoundArguments`].

use crate::value::{FromValue, Value, ValueError, ValueType};
use std::fmt::{self, Display};
use thiserror::Error;

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// The parameter's name.
    pub name: String,
    /// The declared type, or `None` for an unannotated parameter.
    pub declared: Option<ValueType>,
    /// The value used when the caller does not supply this parameter.
    pub default: Option<Value>,
}

impl Param {
    /// Creates a required parameter with a declared type.
    pub fn typed(name: impl Into<String>, declared: ValueType) -> Self {
        Self {
            name: name.into(),
            declared: Some(declared),
            default: None,
        }
    }

    /// Creates a required parameter without a type declaration.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: None,
            default: None,
        }
    }

    /// Gives this parameter a default value, making it optional.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// The name and parameter table of a target callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    name: String,
    params: Vec<Param>,
}

impl Signature {
    /// Creates a signature with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter, returning the updated signature.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Appends a typed, required parameter.
    pub fn typed(self, name: impl Into<String>, declared: ValueType) -> Self {
        self.param(Param::typed(name, declared))
    }

    /// Appends an unannotated, required parameter.
    pub fn untyped(self, name: impl Into<String>) -> Self {
        self.param(Param::untyped(name))
    }

    /// The target's name, as used in log messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared parameters, in order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Binds positional arguments, then keyword arguments, to the parameters.
    ///
    /// Unsupplied parameters with a default are bound to that default but are
    /// not marked as supplied.
    pub fn bind(
        &self,
        positional: Vec<Value>,
        keyword: Vec<(String, Value)>,
    ) -> Result<BoundArguments, BindError> {
        if positional.len() > self.params.len() {
            return Err(BindError::TooManyPositional {
                target: self.name.clone(),
                expected: self.params.len(),
                given: positional.len(),
            });
        }

        let mut slots: Vec<Option<Value>> = vec![None; self.params.len()];
        for (slot, value) in slots.iter_mut().zip(positional) {
            *slot = Some(value);
        }

        for (name, value) in keyword {
            let index = self
                .params
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| BindError::UnknownKeyword {
                    target: self.name.clone(),
                    name: name.clone(),
                })?;
            if slots[index].is_some() {
                return Err(BindError::MultipleValues {
                    target: self.name.clone(),
                    name,
                });
            }
            slots[index] = Some(value);
        }

        let mut entries = Vec::with_capacity(self.params.len());
        for (param, slot) in self.params.iter().zip(slots) {
            let entry = match (slot, &param.default) {
                (Some(value), _) => BoundEntry {
                    name: param.name.clone(),
                    value,
                    supplied: true,
                },
                (None, Some(default)) => BoundEntry {
                    name: param.name.clone(),
                    value: default.clone(),
                    supplied: false,
                },
                (None, None) => {
                    return Err(BindError::MissingArgument {
                        target: self.name.clone(),
                        name: param.name.clone(),
                    })
                }
            };
            entries.push(entry);
        }

        Ok(BoundArguments { entries })
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.name)?;
            if let Some(declared) = param.declared {
                write!(f, ": {declared}")?;
            }
            if let Some(default) = &param.default {
                write!(f, " = {default}")?;
            }
        }
        write!(f, ")")
    }
}

/// An error raised when call arguments do not fit a [`Signature`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// More positional arguments than parameters.
    #[error("`{target}` takes {expected} positional arguments but {given} were given")]
    TooManyPositional {
        /// The target's name.
        target: String,
        /// The number of parameters.
        expected: usize,
        /// The number of positional arguments supplied.
        given: usize,
    },
    /// A keyword argument names no parameter.
    #[error("`{target}` got an unexpected keyword argument `{name}`")]
    UnknownKeyword {
        /// The target's name.
        target: String,
        /// The unknown keyword.
        name: String,
    },
    /// A parameter was supplied both positionally and by keyword.
    #[error("`{target}` got multiple values for argument `{name}`")]
    MultipleValues {
        /// The target's name.
        target: String,
        /// The parameter supplied twice.
        name: String,
    },
    /// A required parameter was not supplied.
    #[error("`{target}` missing required argument `{name}`")]
    MissingArgument {
        /// The target's name.
        target: String,
        /// The missing parameter.
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct BoundEntry {
    name: String,
    value: Value,
    supplied: bool,
}

/// Arguments bound to a [`Signature`] for one invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundArguments {
    entries: Vec<BoundEntry>,
}

impl BoundArguments {
    /// Returns the value bound to `name`, supplied or defaulted.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.value)
    }

    /// Converts the value bound to `name` into a Rust type.
    pub fn extract<T: FromValue>(&self, name: &str) -> Result<T, ValueError> {
        let value = self
            .get(name)
            .ok_or_else(|| ValueError::Missing(name.to_string()))?;
        T::from_value(value)
    }

    /// Returns `true` if the caller explicitly supplied `name`.
    pub fn is_supplied(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name && e.supplied)
    }

    /// Iterates over the arguments the caller explicitly supplied.
    pub fn supplied(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter(|e| e.supplied)
            .map(|e| (e.name.as_str(), &e.value))
    }

    /// Iterates over every bound argument, in parameter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.value))
    }

    /// The number of bound arguments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no arguments are bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
