//! # Runtime
//!
//! Builds the multi-threaded [Tokio](https://tokio.rs) runtime that AutoIMS
//! binaries run on.
//!
//! A [`RuntimeProfile`] picks sensible defaults for the workload; the
//! `#[autoims_runtime::main(profile)]` attribute wires it into `main`.
//!
//! The HTTP server does its SQLite work on Tokio's blocking pool, so the
//! profiles also size `max_blocking_threads`.
//!
//! ```rust,ignore
//! #[autoims_runtime::main(high_performance)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use autoims_derive::main;

use anyhow::Context;
use std::{str::FromStr, sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Environment variable overriding the detected worker thread count.
pub const WORKER_THREADS_ENV: &str = "AUTOIMS_WORKER_THREADS";

const FALLBACK_WORKER_THREADS: usize = 4;
const MAX_WORKER_THREADS: usize = 1024;
const MIN_STACK_SIZE: usize = 1024 * 1024;
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;
const MAX_BLOCKING_THREADS: usize = 512;

static WORKER_THREADS: OnceLock<usize> = OnceLock::new();

fn detected_worker_threads() -> usize {
    *WORKER_THREADS.get_or_init(|| {
        std::env::var(WORKER_THREADS_ENV)
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|&n| (1..=MAX_WORKER_THREADS).contains(&n))
            .unwrap_or_else(|| {
                available_parallelism().map_or(FALLBACK_WORKER_THREADS, std::num::NonZero::get)
            })
    })
}

/// Workload presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    /// Long-running API server: larger stacks, generous blocking pool.
    HighPerformance,
    /// Small footprint for tools and constrained hosts.
    MemoryEfficient,
    #[default]
    Default,
}

impl FromStr for RuntimeProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "high_performance" => Ok(Self::HighPerformance),
            "memory_efficient" => Ok(Self::MemoryEfficient),
            "default" => Ok(Self::Default),
            other => anyhow::bail!("Unknown runtime profile '{other}'"),
        }
    }
}

/// Configuration for the Tokio runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub max_blocking_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::for_profile(RuntimeProfile::Default)
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn for_profile(profile: RuntimeProfile) -> Self {
        let workers = detected_worker_threads();
        match profile {
            RuntimeProfile::HighPerformance => Self {
                worker_threads: workers,
                max_blocking_threads: MAX_BLOCKING_THREADS,
                stack_size: 4 * 1024 * 1024,
                thread_name: "autoims-hp".to_owned(),
                thread_keep_alive: Duration::from_secs(300),
            },
            RuntimeProfile::MemoryEfficient => Self {
                worker_threads: (workers / 2).max(1),
                max_blocking_threads: 32,
                stack_size: 2 * 1024 * 1024,
                thread_name: "autoims-mem".to_owned(),
                thread_keep_alive: Duration::from_secs(30),
            },
            RuntimeProfile::Default => Self {
                worker_threads: workers,
                max_blocking_threads: 128,
                stack_size: 3 * 1024 * 1024,
                thread_name: "autoims-worker".to_owned(),
                thread_keep_alive: Duration::from_secs(60),
            },
        }
    }

    #[must_use]
    pub fn high_performance() -> Self {
        Self::for_profile(RuntimeProfile::HighPerformance)
    }

    #[must_use]
    pub fn memory_efficient() -> Self {
        Self::for_profile(RuntimeProfile::MemoryEfficient)
    }

    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKER_THREADS);
        self
    }

    #[must_use]
    pub fn with_blocking_threads(mut self, threads: usize) -> Self {
        self.max_blocking_threads = threads.clamp(1, MAX_BLOCKING_THREADS);
        self
    }

    #[must_use]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.thread_name = name;
        }
        self
    }

    fn normalized(&self) -> Self {
        self.clone()
            .with_worker_threads(self.worker_threads)
            .with_blocking_threads(self.max_blocking_threads)
            .with_stack_size(self.stack_size)
    }
}

/// Builds a multi-threaded runtime with every driver enabled.
///
/// Out-of-range values in `config` are clamped before use.
///
/// # Errors
///
/// Fails when the OS refuses to spawn the worker threads.
pub fn build_runtime_with_config(config: &RuntimeConfig) -> Result<Runtime> {
    let config = config.normalized();
    debug!(config = ?config, "Building tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .max_blocking_threads(config.max_blocking_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .context("Failed to initialize runtime")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_threads_are_clamped() {
        assert_eq!(RuntimeConfig::default().with_worker_threads(0).worker_threads, 1);
        assert_eq!(RuntimeConfig::default().with_worker_threads(2000).worker_threads, 1024);
    }

    #[test]
    fn stack_size_is_clamped() {
        assert_eq!(RuntimeConfig::default().with_stack_size(100).stack_size, MIN_STACK_SIZE);
        assert_eq!(
            RuntimeConfig::default().with_stack_size(100 * 1024 * 1024).stack_size,
            MAX_STACK_SIZE
        );
    }

    #[test]
    fn blank_thread_name_keeps_profile_name() {
        let config = RuntimeConfig::memory_efficient().with_thread_name("  ");
        assert_eq!(config.thread_name, "autoims-mem");
    }

    #[test]
    fn profiles_parse_from_config_strings() {
        assert_eq!("high-performance".parse::<RuntimeProfile>().ok(), Some(RuntimeProfile::HighPerformance));
        assert_eq!("Memory_Efficient".parse::<RuntimeProfile>().ok(), Some(RuntimeProfile::MemoryEfficient));
        assert!("turbo".parse::<RuntimeProfile>().is_err());
    }

    #[test]
    fn memory_efficient_halves_workers() {
        let full = RuntimeConfig::high_performance().worker_threads;
        let lean = RuntimeConfig::memory_efficient().worker_threads;
        assert_eq!(lean, (full / 2).max(1));
    }

    #[test]
    fn runtime_builds_and_runs_blocking_work() {
        let config = RuntimeConfig::memory_efficient().with_worker_threads(1);
        let rt = build_runtime_with_config(&config).expect("runtime");
        let value = rt.block_on(async { tokio::task::spawn_blocking(|| 21 * 2).await });
        assert_eq!(value.expect("join"), 42);
    }
}
