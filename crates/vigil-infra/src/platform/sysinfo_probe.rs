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

//! sysinfo-based implementation of the UsageProbe trait.

use std::borrow::Cow;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use vigil_core::{UsageProbe, UsageSample};

/// A usage probe reading the current process's CPU and resident memory
/// through the `sysinfo` crate.
///
/// Each sample carries the process's accumulated CPU time. The instantaneous
/// `cpu_percent` is only meaningful when samples are at least
/// [`sysinfo::MINIMUM_CPU_UPDATE_INTERVAL`] apart.
#[derive(Debug)]
pub struct SysinfoProbe {
    pid: Pid,
    system: Arc<Mutex<System>>,
}

impl SysinfoProbe {
    /// Creates a probe for the current process.
    ///
    /// Fails on platforms where `sysinfo` cannot identify the current process.
    pub fn new() -> anyhow::Result<Self> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| anyhow::anyhow!("cannot resolve the current pid: {e}"))?;
        let probe = Self {
            pid,
            system: Arc::new(Mutex::new(System::new())),
        };
        // CPU usage is a delta between two refreshes; prime the first one.
        probe.refresh();
        Ok(probe)
    }

    /// The process this probe observes.
    pub fn pid(&self) -> Pid {
        self.pid
    }

    fn refresh(&self) -> UsageSample {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );
        match system.process(self.pid) {
            Some(process) => UsageSample {
                cpu_percent: f64::from(process.cpu_usage()),
                memory_bytes: process.memory(),
                cpu_time: Some(Duration::from_millis(process.accumulated_cpu_time())),
            },
            None => {
                log::trace!("[SysinfoProbe] process {} not found", self.pid);
                UsageSample::default()
            }
        }
    }
}

impl UsageProbe for SysinfoProbe {
    fn probe_id(&self) -> Cow<'static, str> {
        Cow::Owned(format!("sysinfo:{}", self.pid))
    }

    fn sample(&self) -> UsageSample {
        self.refresh()
    }
}

/// A probe that always reads zero. Used when no real probe is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProbe;

impl UsageProbe for NullProbe {
    fn probe_id(&self) -> Cow<'static, str> {
        Cow::Borrowed("null")
    }

    fn sample(&self) -> UsageSample {
        UsageSample::default()
    }

    fn cpu_count(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sysinfo_probe_reads_current_process() {
        let probe = SysinfoProbe::new().expect("current pid should resolve");
        assert_eq!(probe.pid(), sysinfo::get_current_pid().unwrap());
        assert!(probe.probe_id().starts_with("sysinfo:"));

        let sample = probe.sample();
        assert!(sample.memory_bytes > 0, "a running process has resident memory");
        assert!(sample.cpu_percent >= 0.0);
        assert!(probe.cpu_count() >= 1);
    }

    #[test]
    fn sysinfo_probe_tracks_cpu_time() {
        let probe = SysinfoProbe::new().unwrap();
        let before = probe.sample().cpu_time.expect("cpu time is reported");

        let start = std::time::Instant::now();
        let mut x = 0u64;
        while start.elapsed() < Duration::from_millis(200) {
            x = std::hint::black_box(x.wrapping_add(1));
        }

        let after = probe.sample().cpu_time.unwrap();
        assert!(
            after - before >= Duration::from_millis(100),
            "spent {:?} of CPU in a 200ms spin",
            after - before
        );
    }

    #[test]
    fn null_probe_reads_zero() {
        let probe = NullProbe;
        assert_eq!(probe.sample(), UsageSample::default());
        assert_eq!(probe.probe_id(), "null");
    }
}
