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

//! The wrapper façade: bind a target once, invoke it many times.

use crate::config::config_path;
use crate::coordinator::{ExecutionCoordinator, Fallback, Invocation};
use crate::error::InvokeError;
use crate::target::FnTarget;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use vigil_core::{BoundArguments, ExecutionResult, Signature, Target, UsageProbe, Value};
use vigil_infra::{resolve_profile, NullProbe, SysinfoProbe};
use vigil_telemetry::{LogHandle, UsageSampler, DEFAULT_SAMPLE_INTERVAL};

/// Builder binding a target to an optional fallback and logging profile.
///
/// ```no_run
/// use vigil_sdk::prelude::*;
///
/// let add = Instrument::from_fn(
///     Signature::new("add").typed("x", ValueType::Int).typed("y", ValueType::Int),
///     |args| Ok(args.extract::<i64>("x")? + args.extract::<i64>("y")?),
/// )
/// .fallback(|| Ok(-1))
/// .profile("clean")
/// .bind();
///
/// let result = add.invoke(vec![Value::Int(10), Value::Int(20)]).unwrap();
/// assert_eq!(result.into_value(), Some(30));
/// ```
pub struct Instrument<O> {
    target: Arc<dyn Target<Output = O>>,
    fallback: Option<Fallback<O>>,
    profile: Option<String>,
    config_path: Option<PathBuf>,
    log_handle: Option<LogHandle>,
    probe: Option<Arc<dyn UsageProbe>>,
    sample_interval: Duration,
}

impl<O: Send + 'static> Instrument<O> {
    /// Starts building around any [`Target`].
    pub fn new(target: impl Target<Output = O>) -> Self {
        Self {
            target: Arc::new(target),
            fallback: None,
            profile: None,
            config_path: None,
            log_handle: None,
            probe: None,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }

    /// Starts building around a closure described by `signature`.
    pub fn from_fn<F>(signature: Signature, f: F) -> Self
    where
        F: Fn(&BoundArguments) -> anyhow::Result<O> + Send + Sync + 'static,
    {
        Self::new(FnTarget::new(signature, f))
    }

    /// Sets the function run in place of a failed target.
    pub fn fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn() -> anyhow::Result<O> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// Selects a logger profile from the configuration file.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Uses this configuration file instead of the process-wide one.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Uses an already resolved handle, skipping profile resolution.
    pub fn log_handle(mut self, handle: LogHandle) -> Self {
        self.log_handle = Some(handle);
        self
    }

    /// Replaces the default `sysinfo` probe.
    pub fn probe(mut self, probe: Arc<dyn UsageProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Sets the pause between two resource samples.
    pub fn sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Resolves the log handle and the probe, producing the call.
    ///
    /// Never fails: an unusable configuration degrades to the default handle
    /// and an unavailable probe to one that reads zero.
    pub fn bind(self) -> InstrumentedCall<O> {
        let handle = self.log_handle.unwrap_or_else(|| {
            let path = self.config_path.or_else(config_path);
            resolve_profile(path.as_deref(), self.profile.as_deref())
        });
        let probe = self.probe.unwrap_or_else(default_probe);
        let signature = Arc::new(self.target.signature());

        log::debug!(
            "[Instrument] bound `{}` to handle `{}` ({})",
            signature,
            handle.name(),
            probe.probe_id()
        );

        InstrumentedCall {
            target: self.target,
            signature,
            fallback: self.fallback,
            handle,
            sampler: UsageSampler::new(probe).with_interval(self.sample_interval),
        }
    }
}

fn default_probe() -> Arc<dyn UsageProbe> {
    match SysinfoProbe::new() {
        Ok(probe) => Arc::new(probe),
        Err(e) => {
            log::debug!("[Instrument] {e:#}; resource usage will read zero");
            Arc::new(NullProbe)
        }
    }
}

/// A target bound to its fallback, log handle and sampler.
///
/// Immutable once bound. Each invocation gets its own execution and monitor
/// threads and returns its own result; clones share the target, the handle
/// and the probe.
pub struct InstrumentedCall<O> {
    target: Arc<dyn Target<Output = O>>,
    signature: Arc<Signature>,
    fallback: Option<Fallback<O>>,
    handle: LogHandle,
    sampler: UsageSampler,
}

impl<O: Send + 'static> InstrumentedCall<O> {
    /// The target's name, as it appears in log lines.
    pub fn name(&self) -> &str {
        self.signature.name()
    }

    /// The target's parameter table.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The resolved log handle.
    pub fn log_handle(&self) -> &LogHandle {
        &self.handle
    }

    /// Invokes the target with positional arguments.
    pub fn invoke(&self, args: Vec<Value>) -> Result<ExecutionResult<O>, InvokeError> {
        self.invoke_with(args, Vec::new())
    }

    /// Invokes the target with positional and keyword arguments.
    pub fn invoke_with(
        &self,
        positional: Vec<Value>,
        keyword: Vec<(String, Value)>,
    ) -> Result<ExecutionResult<O>, InvokeError> {
        self.invoke_detailed(positional, keyword)
            .map(|invocation| invocation.result)
    }

    /// Invokes the target and also returns the mismatches and usage average.
    pub fn invoke_detailed(
        &self,
        positional: Vec<Value>,
        keyword: Vec<(String, Value)>,
    ) -> Result<Invocation<O>, InvokeError> {
        let bound = self.signature.bind(positional, keyword)?;
        ExecutionCoordinator::new(
            self.target.as_ref(),
            &self.signature,
            self.fallback.as_ref(),
            &self.handle,
            &self.sampler,
        )
        .run(bound)
    }
}

impl<O> Clone for InstrumentedCall<O> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
            signature: Arc::clone(&self.signature),
            fallback: self.fallback.clone(),
            handle: self.handle.clone(),
            sampler: self.sampler.clone(),
        }
    }
}

impl<O> fmt::Debug for InstrumentedCall<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentedCall")
            .field("signature", &self.signature.to_string())
            .field("has_fallback", &self.fallback.is_some())
            .field("handle", &self.handle.name())
            .finish_non_exhaustive()
    }
}
