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

use std::fs;
use std::path::Path;
use vigil_sdk::prelude::*;
use vigil_sdk::{clear_config_path, set_config_path};

const CONFIG: &str = r#"
formatters:
  plain:
    format: "{levelname} | {name} | {message}"
handlers:
  run_log:
    kind: file
    path: run.log
    mode: append
    formatter: plain
loggers:
  clean:
    level: info
    handlers: [run_log]
"#;

fn square() -> Instrument<i64> {
    Instrument::from_fn(
        Signature::new("square").typed("x", ValueType::Int),
        |args| {
            let x = args.extract::<i64>("x")?;
            Ok(x * x)
        },
    )
}

fn read_log(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("run.log"))
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

// The configuration path is process-wide, so every step that touches it lives
// in this one test.
#[test]
fn test_profiles_resolve_against_configured_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("logging.yaml");
    fs::write(&config, CONFIG).unwrap();

    // An explicit path on the builder.
    let call = square().config_path(&config).profile("clean").bind();
    assert_eq!(call.log_handle().name(), "clean");
    assert_eq!(call.invoke(vec![Value::Int(7)]).unwrap().into_value(), Some(49));

    let lines = read_log(dir.path());
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "INFO | clean | `square` started executing");
    assert!(lines[1].starts_with("INFO | clean | `square` finished successfully in "));
    assert!(lines[2].starts_with("INFO | clean | `square` average usage: "));

    // The process-wide path, picked up at bind time.
    set_config_path(&config);
    let call = square().profile("clean").bind();
    call.invoke(vec![Value::from("seven")]).unwrap();

    let lines = read_log(dir.path());
    assert_eq!(
        lines[3],
        "WARN | clean | Type conflict of `x` in `square`: Expected int; Received str."
    );
    assert!(lines
        .iter()
        .any(|l| l.starts_with("ERROR | clean | ") && l.contains("occurred in `square`")));

    // A profile the file does not define.
    let call = square().profile("verbose").bind();
    assert_eq!(call.log_handle().name(), "default_root");

    // No profile at all.
    let call = square().bind();
    assert_eq!(call.log_handle().name(), "default_root");

    clear_config_path();
    let call = square().profile("clean").bind();
    assert_eq!(call.log_handle().name(), "default_root");
}

#[test]
fn test_calls_bound_to_one_truncating_profile_share_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("logging.yaml");
    fs::write(&config, CONFIG.replace("mode: append", "mode: truncate")).unwrap();
    fs::write(dir.path().join("run.log"), "left over from an earlier run\n").unwrap();

    let first = square().config_path(&config).profile("clean").bind();
    let second = square().config_path(&config).profile("clean").bind();
    first.invoke(vec![Value::Int(2)]).unwrap();
    second.invoke(vec![Value::Int(3)]).unwrap();

    let lines = read_log(dir.path());
    assert_eq!(lines.len(), 6);
    assert!(lines.iter().all(|l| l.starts_with("INFO | clean | `square` ")));
    assert_eq!(
        lines
            .iter()
            .filter(|l| l.ends_with("started executing"))
            .count(),
        2
    );
}
