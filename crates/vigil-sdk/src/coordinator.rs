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

//! The per-invocation execution coordinator.
//!
//! One invocation runs in three steps: the bound arguments are validated on
//! the caller's thread, then an execution thread and a monitor thread are
//! spawned in a scope, and finally both are joined before the result is
//! handed back. Nothing produced by one invocation is stored on the
//! [`InstrumentedCall`](crate::InstrumentedCall), so concurrent invocations
//! never observe each other's results.

use crate::error::InvokeError;
use anyhow::anyhow;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use vigil_core::{
    validate, BoundArguments, ExecutionResult, Mismatch, Signature, Target, UsageAverage,
};
use vigil_telemetry::utils::round_to;
use vigil_telemetry::{LogHandle, Stopwatch, UsageSampler};

/// A zero-argument function run in place of a failed target.
pub type Fallback<O> = Arc<dyn Fn() -> anyhow::Result<O> + Send + Sync>;

/// Everything one invocation produced.
#[derive(Debug)]
pub struct Invocation<O> {
    /// The target's value, the fallback's value, or `NoResult`.
    pub result: ExecutionResult<O>,
    /// Type mismatches found while validating the arguments.
    pub mismatches: Vec<Mismatch>,
    /// Averaged resource usage while the target ran.
    pub usage: UsageAverage,
}

/// Sets the liveness flag when the execution thread ends, even by unwinding.
struct FinishedGuard<'a>(&'a AtomicBool);

impl Drop for FinishedGuard<'_> {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Release);
    }
}

/// Runs one invocation of a target.
pub struct ExecutionCoordinator<'a, O> {
    target: &'a dyn Target<Output = O>,
    signature: &'a Signature,
    fallback: Option<&'a Fallback<O>>,
    handle: &'a LogHandle,
    sampler: &'a UsageSampler,
}

impl<'a, O: Send + 'static> ExecutionCoordinator<'a, O> {
    /// Creates a coordinator borrowing the pieces of an instrumented call.
    pub fn new(
        target: &'a dyn Target<Output = O>,
        signature: &'a Signature,
        fallback: Option<&'a Fallback<O>>,
        handle: &'a LogHandle,
        sampler: &'a UsageSampler,
    ) -> Self {
        Self {
            target,
            signature,
            fallback,
            handle,
            sampler,
        }
    }

    fn name(&self) -> &str {
        self.signature.name()
    }

    /// Validates `args`, then executes and monitors the target concurrently.
    ///
    /// Returns once both threads have finished. Only a failing fallback
    /// produces an error.
    pub fn run(&self, args: BoundArguments) -> Result<Invocation<O>, InvokeError> {
        let mismatches = self.check_types(&args);
        let finished = AtomicBool::new(false);

        let (outcome, usage) = thread::scope(|s| {
            let execution = s.spawn(|| {
                let _finished = FinishedGuard(&finished);
                self.execute(&args)
            });
            let monitor = s.spawn(|| {
                self.sampler
                    .monitor_and_report(self.handle, self.name(), || {
                        !finished.load(Ordering::Acquire)
                    })
            });

            let outcome = execution.join();
            let usage = monitor.join();
            (outcome, usage)
        });

        // Target and fallback panics are caught inside `execute`; anything
        // left came from a log sink and is re-raised on the caller's thread.
        let outcome = outcome.unwrap_or_else(|payload| panic::resume_unwind(payload));
        let usage = usage.unwrap_or_else(|payload| panic::resume_unwind(payload));

        Ok(Invocation {
            result: outcome?,
            mismatches,
            usage,
        })
    }

    fn check_types(&self, args: &BoundArguments) -> Vec<Mismatch> {
        let mismatches = validate(self.signature, args);
        report_mismatches(self.handle, self.name(), &mismatches);
        mismatches
    }

    fn execute(&self, args: &BoundArguments) -> Result<ExecutionResult<O>, InvokeError> {
        let name = self.name();
        self.handle.info(&format!("`{name}` started executing"));

        let stopwatch = Stopwatch::new();
        let outcome = catch_panic(|| self.target.call(args), "target");
        let elapsed = stopwatch.elapsed_secs_f64();

        match outcome {
            Ok(value) => {
                self.handle.info(&format!(
                    "`{name}` finished successfully in {} seconds",
                    round_to(elapsed, 4)
                ));
                Ok(ExecutionResult::Completed(value))
            }
            Err(error) => {
                self.handle.error(&format!(
                    "{error:#} occurred in `{name}`. Executing the backup function if provided."
                ));
                match self.fallback {
                    Some(fallback) => self.run_fallback(fallback).map(ExecutionResult::Recovered),
                    None => Ok(ExecutionResult::NoResult {
                        error: format!("{error:#}"),
                    }),
                }
            }
        }
    }

    fn run_fallback(&self, fallback: &Fallback<O>) -> Result<O, InvokeError> {
        catch_panic(|| fallback(), "backup function").map_err(|error| {
            self.handle.error(&format!(
                "{error:#} occurred in the backup function of `{}`.",
                self.name()
            ));
            InvokeError::Fallback {
                target: self.name().to_string(),
                error,
            }
        })
    }
}

/// Logs one `warn` line per mismatch found in a call to `target`.
pub fn report_mismatches(handle: &LogHandle, target: &str, mismatches: &[Mismatch]) {
    for mismatch in mismatches {
        handle.warn(&mismatch.describe(target));
    }
}

/// Calls `f`, turning a panic into an error.
fn catch_panic<T>(f: impl FnOnce() -> anyhow::Result<T>, what: &str) -> anyhow::Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(anyhow!("{what} panicked: {}", panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
