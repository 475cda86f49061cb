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

// Vigil Sandbox
// Runs a handful of instrumented calls against the bundled configuration.

use anyhow::Result;
use std::thread;
use std::time::Duration;
use vigil_sdk::prelude::*;

#[vigil_sdk::target]
fn add(x: i64, y: i64) -> i64 {
    x + y
}

#[vigil_sdk::target]
fn busy_sum(n: u64) -> u64 {
    (0..n).fold(0u64, |acc, i| acc.wrapping_add(i.wrapping_mul(i)))
}

#[vigil_sdk::target]
fn nap(millis: u64) {
    thread::sleep(Duration::from_millis(millis));
}

fn report<T: std::fmt::Debug>(label: &str, result: &ExecutionResult<T>) {
    match result {
        ExecutionResult::Completed(value) => log::info!("{label}: completed with {value:?}"),
        ExecutionResult::Recovered(value) => log::info!("{label}: recovered with {value:?}"),
        ExecutionResult::NoResult { error } => log::info!("{label}: no result ({error})"),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    vigil_sdk::set_config_path(vigil_sdk::config_path!("config.yaml"));

    let add = Instrument::new(AddTarget)
        .fallback(|| Ok(-1))
        .profile("clean")
        .bind();

    report("add(10, 20)", &add.invoke(vec![Value::Int(10), Value::Int(20)])?);
    report("add(10, None)", &add.invoke(vec![Value::Int(10), Value::None])?);
    report(
        "add(x=1, y=2)",
        &add.invoke_with(
            Vec::new(),
            vec![("x".into(), Value::Int(1)), ("y".into(), Value::Int(2))],
        )?,
    );

    let busy = Instrument::new(BusySumTarget).profile("forwarded").bind();
    let invocation = busy.invoke_detailed(vec![Value::Int(20_000_000)], Vec::new())?;
    report("busy_sum", &invocation.result);
    log::info!(
        "busy_sum: {} samples, CPU = {:.2}%",
        invocation.usage.samples,
        invocation.usage.cpu_percent
    );

    let nap = Instrument::new(NapTarget).profile("quiet").bind();
    thread::scope(|scope| {
        for millis in [10, 20, 30] {
            let nap = nap.clone();
            scope.spawn(move || nap.invoke(vec![Value::Int(millis)]));
        }
    });

    let missing = Instrument::new(AddTarget).profile("does_not_exist").bind();
    log::info!("unknown profile resolved to `{}`", missing.log_handle().name());
    report("add(1, 1)", &missing.invoke(vec![Value::Int(1), Value::Int(1)])?);

    Ok(())
}
