// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Randomness abstraction for testable failure injection

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// A source of random draws for probabilistic failure injection.
///
/// Injected explicitly (like [`crate::Clock`]) so the engines that consume
/// it stay deterministic under test.
pub trait FailureRng: Clone + Send + Sync {
    /// One uniform draw in `[0, 1)`.
    fn next_f64(&self) -> f64;
}

/// Real thread-local RNG
#[derive(Clone, Default)]
pub struct ThreadRng;

impl FailureRng for ThreadRng {
    fn next_f64(&self) -> f64 {
        rand::random::<f64>()
    }
}

/// Fake RNG for testing with a scripted sequence of draws.
///
/// Returns the scripted values in order; once exhausted, returns 1.0
/// (which never falls below any probability threshold).
#[derive(Clone)]
pub struct FakeRng {
    values: Arc<Mutex<VecDeque<f64>>>,
}

impl FakeRng {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: Arc::new(Mutex::new(values.into_iter().collect())),
        }
    }

    /// Append another draw to the script.
    pub fn push(&self, value: f64) {
        self.values.lock().push_back(value);
    }
}

impl Default for FakeRng {
    fn default() -> Self {
        Self::new([])
    }
}

impl FailureRng for FakeRng {
    fn next_f64(&self) -> f64 {
        self.values.lock().pop_front().unwrap_or(1.0)
    }
}

#[cfg(test)]
#[path = "rng_tests.rs"]
mod tests;
