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

use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use vigil_infra::logging::MemorySink;
use vigil_infra::NullProbe;
use vigil_sdk::prelude::*;

fn capture(name: &str) -> (Arc<MemorySink>, LogHandle) {
    let sink = Arc::new(MemorySink::new());
    let handle = LogHandle::new(name, sink.clone());
    (sink, handle)
}

fn add_signature() -> Signature {
    Signature::new("add")
        .typed("x", ValueType::Int)
        .typed("y", ValueType::Int)
}

fn add(handle: LogHandle) -> Instrument<i64> {
    Instrument::from_fn(add_signature(), |args| {
        Ok(args.extract::<i64>("x")? + args.extract::<i64>("y")?)
    })
    .log_handle(handle)
}

#[test]
fn test_successful_call_logs_lifecycle() {
    let (sink, handle) = capture("clean");
    let call = add(handle).bind();

    let result = call.invoke(vec![Value::Int(10), Value::Int(20)]).unwrap();
    assert_eq!(result.into_value(), Some(30));

    let lines = sink.lines();
    assert_eq!(lines[0], "INFO - clean - `add` started executing");
    assert!(lines[1].starts_with("INFO - clean - `add` finished successfully in "));
    assert!(lines[1].ends_with(" seconds"));
    assert!(lines[2].starts_with("INFO - clean - `add` average usage: CPU = "));
    assert_eq!(lines.len(), 3, "no type warnings expected: {lines:?}");
}

#[test]
fn test_failed_call_recovers_through_fallback() {
    let (sink, handle) = capture("clean");
    let call = add(handle).fallback(|| Ok(-1)).bind();

    let invocation = call
        .invoke_detailed(vec![Value::Int(10), Value::None], Vec::new())
        .unwrap();

    assert_eq!(invocation.result, ExecutionResult::Recovered(-1));
    assert_eq!(invocation.mismatches.len(), 1);
    assert!(sink.contains("Type conflict of `y` in `add`: Expected int; Received none."));
    assert!(sink.contains("occurred in `add`. Executing the backup function if provided."));
    assert!(!sink.contains("finished successfully"));
    assert!(sink.contains("`add` average usage"));
}

#[test]
fn test_failed_call_without_fallback_has_no_result() {
    let (sink, handle) = capture("clean");
    let call = add(handle).bind();

    let result = call
        .invoke(vec![Value::Int(10), Value::from("twenty")])
        .unwrap();

    assert!(result.is_no_result());
    assert_eq!(result.value(), None);
    assert!(sink
        .lines()
        .iter()
        .any(|l| l.starts_with("ERROR - clean - ") && l.contains("occurred in `add`")));
}

#[test]
fn test_type_conflict_is_logged_but_call_proceeds() {
    let (sink, handle) = capture("clean");
    let call = Instrument::from_fn(
        Signature::new("describe").typed("x", ValueType::Int),
        |args| Ok(args.get("x").map(ToString::to_string).unwrap_or_default()),
    )
    .log_handle(handle)
    .bind();

    let result = call.invoke(vec![Value::from("one")]).unwrap();

    assert!(result.is_completed());
    let lines = sink.lines();
    assert_eq!(
        lines[0],
        "WARN - clean - Type conflict of `x` in `describe`: Expected int; Received str."
    );
    assert_eq!(lines[1], "INFO - clean - `describe` started executing");
}

#[test]
fn test_undeclared_parameters_are_not_checked() {
    let (sink, handle) = capture("clean");
    let call = Instrument::from_fn(
        Signature::new("echo").untyped("anything"),
        |args| Ok(args.extract::<Value>("anything")?),
    )
    .log_handle(handle)
    .bind();

    let result = call.invoke(vec![Value::Float(1.5)]).unwrap();

    assert_eq!(result.into_value(), Some(Value::Float(1.5)));
    assert!(!sink.contains("Type conflict"));
}

#[test]
fn test_keyword_arguments_and_defaults() {
    let (sink, handle) = capture("clean");
    let call = Instrument::from_fn(
        Signature::new("scale")
            .typed("x", ValueType::Int)
            .param(Param::typed("factor", ValueType::Int).with_default(2i64)),
        |args| Ok(args.extract::<i64>("x")? * args.extract::<i64>("factor")?),
    )
    .log_handle(handle)
    .bind();

    let doubled = call.invoke(vec![Value::Int(4)]).unwrap();
    assert_eq!(doubled.into_value(), Some(8));

    let tripled = call
        .invoke_with(Vec::new(), vec![
            ("x".to_string(), Value::Int(4)),
            ("factor".to_string(), Value::Int(3)),
        ])
        .unwrap();
    assert_eq!(tripled.into_value(), Some(12));
    assert!(!sink.contains("Type conflict"));
}

#[test]
fn test_arguments_that_do_not_bind_run_nothing() {
    let (sink, handle) = capture("clean");
    let call = add(handle).bind();

    let error = call
        .invoke(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        .unwrap_err();

    assert!(matches!(error, InvokeError::Bind(_)));
    assert!(sink.lines().is_empty());
}

#[test]
fn test_failing_fallback_is_an_error() {
    let (_sink, handle) = capture("clean");
    let call = Instrument::from_fn(Signature::new("broken"), |_| -> anyhow::Result<i64> {
        anyhow::bail!("target down")
    })
    .fallback(|| anyhow::bail!("backup down"))
    .log_handle(handle)
    .bind();

    let error = call.invoke(Vec::new()).unwrap_err();

    match error {
        InvokeError::Fallback { target, error } => {
            assert_eq!(target, "broken");
            assert_eq!(error.to_string(), "backup down");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_target_reports_non_negative_usage() {
    let (sink, handle) = capture("clean");
    let call = Instrument::from_fn(Signature::new("noop"), |_| Ok(()))
        .log_handle(handle)
        .bind();

    let invocation = call.invoke_detailed(Vec::new(), Vec::new()).unwrap();

    assert!(invocation.result.is_completed());
    assert!(invocation.usage.cpu_percent >= 0.0);
    assert!(invocation.usage.memory_mb >= 0.0);
    assert!(sink.contains("`noop` average usage: CPU = "));
}

#[test]
fn test_busy_target_reports_its_cpu_usage() {
    let (_sink, handle) = capture("clean");
    let call = Instrument::from_fn(Signature::new("spin"), |_| {
        let start = Instant::now();
        let mut x = 0u64;
        while start.elapsed() < Duration::from_millis(300) {
            x = black_box(x.wrapping_add(1));
        }
        Ok(x)
    })
    .log_handle(handle)
    .bind();

    let invocation = call.invoke_detailed(Vec::new(), Vec::new()).unwrap();

    // One thread spinning keeps at least one CPU busy.
    let cpus = thread::available_parallelism().map_or(1, |n| n.get()) as f64;
    assert!(invocation.usage.samples > 1);
    assert!(
        invocation.usage.cpu_percent > 50.0 / cpus,
        "a 300ms spin on {cpus} CPUs read {}%",
        invocation.usage.cpu_percent
    );
    assert!(invocation.usage.cpu_percent <= 100.0);
}

#[test]
fn test_slow_target_is_sampled() {
    let (_sink, handle) = capture("clean");
    let call = Instrument::from_fn(Signature::new("sleepy"), |_| {
        thread::sleep(Duration::from_millis(50));
        Ok(())
    })
    .log_handle(handle)
    .probe(Arc::new(NullProbe))
    .sample_interval(Duration::from_millis(1))
    .bind();

    let invocation = call.invoke_detailed(Vec::new(), Vec::new()).unwrap();

    assert!(invocation.usage.samples > 1);
    assert_eq!(invocation.usage.cpu_percent, 0.0);
}

#[test]
fn test_sequential_invocations_do_not_share_results() {
    let (sink, handle) = capture("clean");
    let call = add(handle).bind();

    let first = call.invoke(vec![Value::Int(1), Value::Int(2)]).unwrap();
    let second = call.invoke(vec![Value::Int(3), Value::Int(4)]).unwrap();

    assert_eq!(first.into_value(), Some(3));
    assert_eq!(second.into_value(), Some(7));
    assert_eq!(
        sink.lines()
            .iter()
            .filter(|l| l.contains("started executing"))
            .count(),
        2
    );
}

#[test]
fn test_concurrent_invocations_keep_lines_whole() {
    let (sink, handle) = capture("clean");
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let call = Instrument::from_fn(add_signature(), move |args| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(args.extract::<i64>("x")? * args.extract::<i64>("y")?)
    })
    .log_handle(handle)
    .bind();

    let results: Vec<i64> = thread::scope(|scope| {
        let workers: Vec<_> = (0..8i64)
            .map(|i| {
                let call = call.clone();
                scope.spawn(move || {
                    call.invoke(vec![Value::Int(i), Value::Int(i)])
                        .unwrap()
                        .into_value()
                        .unwrap()
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert_eq!(results, (0..8i64).map(|i| i * i).collect::<Vec<_>>());
    assert_eq!(calls.load(Ordering::SeqCst), 8);

    let lines = sink.lines();
    assert_eq!(lines.len(), 8 * 3);
    assert!(lines.iter().all(|l| l.starts_with("INFO - clean - `add` ")));
}

#[test]
fn test_unresolvable_profile_falls_back_to_default_handle() {
    let dir = tempfile::tempdir().unwrap();
    let call = Instrument::from_fn(add_signature(), |_| Ok(0i64))
        .config_path(dir.path().join("missing.yaml"))
        .profile("clean")
        .bind();

    assert_eq!(call.log_handle().name(), "default_root");
    assert_eq!(
        call.invoke(vec![Value::Int(1), Value::Int(1)])
            .unwrap()
            .into_value(),
        Some(0)
    );
}
