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

//! Dynamic argument values and their runtime types.
//!
//! Instrumented targets receive their arguments as [`Value`]s so that the
//! declared parameter types of a [`Signature`](crate::Signature) can be compared
//! against what the caller actually supplied.

use std::fmt::{self, Display};
use thiserror::Error;

/// A dynamically typed argument value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    None,
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// A UTF-8 string.
    Str(String),
    /// An ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// Returns the runtime type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::None => ValueType::None,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
            Value::List(_) => ValueType::List,
        }
    }

    /// Returns `true` if this is [`Value::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// The runtime type of a [`Value`], or the declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// The type of [`Value::None`].
    None,
    /// Boolean.
    Bool,
    /// Integer.
    Int,
    /// Float.
    Float,
    /// String.
    Str,
    /// List.
    List,
    /// Accepts any value. Used for parameters without a type declaration.
    Any,
}

impl ValueType {
    /// Returns `true` if a value of type `actual` satisfies this declared type.
    ///
    /// A `Bool` satisfies a declared `Int`, as booleans are integers 0 and 1.
    /// Nothing else widens: an `Int` does not satisfy a declared `Float`.
    pub fn accepts(self, actual: ValueType) -> bool {
        self == ValueType::Any
            || self == actual
            || (self == ValueType::Int && actual == ValueType::Bool)
    }

    /// The lowercase name used in log messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::None => "none",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
            ValueType::List => "list",
            ValueType::Any => "any",
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error raised when a [`Value`] cannot be converted into a Rust type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    /// The value had a different runtime type than the one requested.
    #[error("expected {expected}, found {found}")]
    WrongType {
        /// The type the conversion required.
        expected: ValueType,
        /// The type the value actually had.
        found: ValueType,
    },
    /// The value had the right type but does not fit the target representation.
    #[error("value {0} is out of range")]
    OutOfRange(String),
    /// No argument with this name was bound.
    #[error("missing argument `{0}`")]
    Missing(String),
}

/// Conversion from a dynamic [`Value`] into a concrete Rust type.
///
/// `VALUE_TYPE` is the type a parameter of this Rust type declares in a
/// [`Signature`](crate::Signature).
pub trait FromValue: Sized {
    /// The declared type of a parameter of this Rust type.
    const VALUE_TYPE: ValueType;

    /// Converts a borrowed value.
    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

fn wrong_type(expected: ValueType, value: &Value) -> ValueError {
    ValueError::WrongType {
        expected,
        found: value.value_type(),
    }
}

impl FromValue for Value {
    const VALUE_TYPE: ValueType = ValueType::Any;

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    const VALUE_TYPE: ValueType = ValueType::Int;

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Int(i) => Ok(*i),
            Value::Bool(b) => Ok(i64::from(*b)),
            other => Err(wrong_type(Self::VALUE_TYPE, other)),
        }
    }
}

impl FromValue for i32 {
    const VALUE_TYPE: ValueType = ValueType::Int;

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| ValueError::OutOfRange(wide.to_string()))
    }
}

impl FromValue for u64 {
    const VALUE_TYPE: ValueType = ValueType::Int;

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let wide = i64::from_value(value)?;
        u64::try_from(wide).map_err(|_| ValueError::OutOfRange(wide.to_string()))
    }
}

impl FromValue for usize {
    const VALUE_TYPE: ValueType = ValueType::Int;

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        let wide = i64::from_value(value)?;
        usize::try_from(wide).map_err(|_| ValueError::OutOfRange(wide.to_string()))
    }
}

impl FromValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(x) => Ok(*x),
            other => Err(wrong_type(Self::VALUE_TYPE, other)),
        }
    }
}

impl FromValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(wrong_type(Self::VALUE_TYPE, other)),
        }
    }
}

impl FromValue for String {
    const VALUE_TYPE: ValueType = ValueType::Str;

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            other => Err(wrong_type(Self::VALUE_TYPE, other)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    const VALUE_TYPE: ValueType = ValueType::List;

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            other => Err(wrong_type(Self::VALUE_TYPE, other)),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}
