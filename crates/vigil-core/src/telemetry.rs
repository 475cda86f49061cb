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

//! Resource usage samples and the probe contract.
//!
//! A [`UsageProbe`] knows how to read the current process's CPU and memory
//! counters. The sampler in `vigil-telemetry` polls one while a target runs
//! and folds the readings into a [`UsageAccumulator`].

use std::borrow::Cow;
use std::fmt::Debug;
use std::time::{Duration, Instant};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A single reading of process-wide resource usage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageSample {
    /// CPU utilisation in percent since the previous reading, summed over all
    /// logical CPUs (so it may exceed 100 on multi-core machines).
    pub cpu_percent: f64,
    /// Resident memory in bytes.
    pub memory_bytes: u64,
    /// CPU time the process has consumed since it started, if the probe can
    /// read it.
    pub cpu_time: Option<Duration>,
}

/// The averaged usage over one monitored execution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageAverage {
    /// Average CPU utilisation in percent of the whole machine.
    pub cpu_percent: f64,
    /// Average resident memory in megabytes.
    pub memory_mb: f64,
    /// How many samples the average covers. Zero means "no data".
    pub samples: u64,
}

impl UsageAverage {
    /// Returns `true` if at least one sample contributed to this average.
    pub fn has_data(&self) -> bool {
        self.samples > 0
    }
}

/// Running totals for usage samples.
///
/// Memory is always the mean of the readings. CPU is the CPU time consumed
/// between the first and the last timed sample divided by the wall time
/// between them; with fewer than two timed samples it falls back to the mean
/// of the per-sample percentages.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageAccumulator {
    cpu_sum: f64,
    memory_sum: f64,
    count: u64,
    first_cpu_time: Option<(Instant, Duration)>,
    last_cpu_time: Option<(Instant, Duration)>,
}

impl UsageAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one sample taken now.
    pub fn add(&mut self, sample: UsageSample) {
        self.add_at(sample, Instant::now());
    }

    /// Adds one sample taken at `at`.
    pub fn add_at(&mut self, sample: UsageSample, at: Instant) {
        self.cpu_sum += sample.cpu_percent;
        self.memory_sum += sample.memory_bytes as f64;
        self.count += 1;
        if let Some(cpu_time) = sample.cpu_time {
            self.first_cpu_time.get_or_insert((at, cpu_time));
            self.last_cpu_time = Some((at, cpu_time));
        }
    }

    /// The number of samples added so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Computes the average, normalising CPU by `cpu_count` logical CPUs.
    ///
    /// An empty accumulator yields an all-zero average instead of dividing by
    /// zero. The CPU figure never exceeds 100.
    pub fn average(&self, cpu_count: usize) -> UsageAverage {
        if self.count == 0 {
            return UsageAverage::default();
        }
        let n = self.count as f64;
        let cpus = cpu_count.max(1) as f64;
        let cpu_percent = match (self.first_cpu_time, self.last_cpu_time) {
            (Some((t0, c0)), Some((t1, c1))) if t1 > t0 => {
                let busy = c1.saturating_sub(c0).as_secs_f64();
                let wall = (t1 - t0).as_secs_f64();
                100.0 * busy / wall / cpus
            }
            _ => self.cpu_sum / (cpus * n),
        };
        UsageAverage {
            cpu_percent: cpu_percent.min(100.0),
            memory_mb: self.memory_sum / (BYTES_PER_MB * n),
            samples: self.count,
        }
    }
}

/// The core trait for a resource usage probe.
///
/// Implementations live in `vigil-infra` (backed by `sysinfo`); tests supply
/// scripted probes.
pub trait UsageProbe: Send + Sync + Debug + 'static {
    /// Returns a unique, human-readable identifier for this probe.
    fn probe_id(&self) -> Cow<'static, str>;

    /// Reads the current CPU and memory counters.
    fn sample(&self) -> UsageSample;

    /// The number of logical CPUs used to normalise CPU percentages.
    fn cpu_count(&self) -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}
