use std::time::Duration;

use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, SamplingMode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const LARGE_RUNTIME_SAMPLE_SIZE: usize = 10;
const LARGE_RUNTIME_WARM_UP_MS: u64 = 300;
const LARGE_RUNTIME_MEASURE_MS: u64 = 800;
const LARGE_INPUT_LEN: usize = 65536;
const RNG_SEED: u64 = 0x5EED_2026;

/// Input shapes that exercise the run detector and the merge policy
/// differently.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Distribution {
    RandomUniform,
    NearlySorted1pctSwaps,
    /// Alternating ascending and descending runs of random length.
    RandomRuns,
    Descending,
    FewUnique,
}

pub const ALL_DISTRIBUTIONS: [Distribution; 5] = [
    Distribution::RandomUniform,
    Distribution::NearlySorted1pctSwaps,
    Distribution::RandomRuns,
    Distribution::Descending,
    Distribution::FewUnique,
];

impl Distribution {
    pub fn label(self) -> &'static str {
        match self {
            Self::RandomUniform => "random_uniform",
            Self::NearlySorted1pctSwaps => "nearly_sorted_1pct_swaps",
            Self::RandomRuns => "random_runs",
            Self::Descending => "descending",
            Self::FewUnique => "few_unique",
        }
    }
}

/// Picks runtime settings by input length; long inputs get flat sampling.
pub fn apply_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, len: usize) {
    if len < LARGE_INPUT_LEN {
        group.sampling_mode(SamplingMode::Auto);
        group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
        group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
        group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
    } else {
        group.sampling_mode(SamplingMode::Flat);
        group.sample_size(LARGE_RUNTIME_SAMPLE_SIZE);
        group.warm_up_time(Duration::from_millis(LARGE_RUNTIME_WARM_UP_MS));
        group.measurement_time(Duration::from_millis(LARGE_RUNTIME_MEASURE_MS));
    }
}

pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RNG_SEED)
}

pub fn generate_dataset<R: Rng + ?Sized>(rng: &mut R, dist: Distribution, len: usize) -> Vec<u64> {
    let mut data = Vec::with_capacity(len);

    match dist {
        Distribution::RandomUniform => {
            data.extend((0..len).map(|_| rng.random::<u64>()));
        }
        Distribution::NearlySorted1pctSwaps => {
            data.extend(0..len as u64);
            if len > 0 {
                let swaps = (len / 100).max(1);
                for _ in 0..swaps {
                    let a = rng.random_range(0..len);
                    let b = rng.random_range(0..len);
                    data.swap(a, b);
                }
            }
        }
        Distribution::RandomRuns => {
            let max_run = (len / 16).max(2);
            let mut ascending = true;
            while data.len() < len {
                let run = rng.random_range(1..max_run).min(len - data.len());
                let base = rng.random_range(0..len as u64);
                if ascending {
                    data.extend((0..run as u64).map(|i| base + i));
                } else {
                    data.extend((0..run as u64).rev().map(|i| base + i));
                }
                ascending = !ascending;
            }
        }
        Distribution::Descending => {
            data.extend((0..len as u64).rev());
        }
        Distribution::FewUnique => {
            data.extend((0..len).map(|_| rng.random_range(0..16_u64)));
        }
    }

    data
}
