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

//! Closure-backed targets.

use std::fmt;
use std::marker::PhantomData;
use vigil_core::{BoundArguments, Signature, Target};

/// A [`Target`] built from a closure and an explicit [`Signature`].
pub struct FnTarget<F, O> {
    signature: Signature,
    f: F,
    _output: PhantomData<fn() -> O>,
}

impl<F, O> FnTarget<F, O>
where
    F: Fn(&BoundArguments) -> anyhow::Result<O> + Send + Sync + 'static,
    O: Send + 'static,
{
    /// Wraps `f`, described by `signature`.
    pub fn new(signature: Signature, f: F) -> Self {
        Self {
            signature,
            f,
            _output: PhantomData,
        }
    }
}

impl<F, O> Target for FnTarget<F, O>
where
    F: Fn(&BoundArguments) -> anyhow::Result<O> + Send + Sync + 'static,
    O: Send + 'static,
{
    type Output = O;

    fn signature(&self) -> Signature {
        self.signature.clone()
    }

    fn call(&self, args: &BoundArguments) -> anyhow::Result<O> {
        (self.f)(args)
    }
}

impl<F, O> fmt::Debug for FnTarget<F, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTarget")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}
