//! Engine configuration: generation budgets, queue behaviour, lock timeouts
//! and slot-store backend.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Prefix of every environment variable read by [`EngineConfig::from_env`].
pub const ENV_PREFIX: &str = "TIMETABLE_";

/// Slot store backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreBackendConfig {
    /// In-memory store for development/testing.
    #[default]
    InMemory,
    /// JSON-lines file store.
    File {
        /// Directory holding the store file.
        path: PathBuf,
    },
}

/// Attempt budgets for the timetable generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Random placement attempts per item in the first pass.
    pub main_attempts: u32,
    /// Attempts per short item in the second pass.
    pub second_pass_attempts: u32,
    /// Chance of claiming the following period for double-period subjects.
    pub double_period_probability: f64,
    /// Regenerations allowed for classes caught in a teacher conflict.
    pub max_regenerations: u32,
    /// Seed for reproducible runs; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            main_attempts: 500,
            second_pass_attempts: 100,
            double_period_probability: 0.5,
            max_regenerations: 5,
            seed: None,
        }
    }
}

/// Commit queue settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum queued tasks before rejection.
    pub max_queue_depth: usize,
    /// Retries granted to tasks enqueued without an explicit budget.
    pub default_retries: u32,
    /// Pause before a failed task is retried, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_queue_depth: 1024,
            default_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl QueueConfig {
    /// Retry delay as a [`Duration`].
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Slot lock settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Age after which a lock is treated as abandoned, in seconds.
    pub lock_timeout_secs: u64,
    /// Interval of the background sweep, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            lock_timeout_secs: 30,
            sweep_interval_secs: 10,
        }
    }
}

impl LockConfig {
    /// Lock timeout as a [`Duration`].
    #[must_use]
    pub const fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs)
    }

    /// Sweep interval as a [`Duration`].
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Root engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Generator budgets.
    pub generator: GeneratorConfig,
    /// Commit queue settings.
    pub queue: QueueConfig,
    /// Slot lock settings.
    pub locks: LockConfig,
    /// Slot store backend.
    pub store: StoreBackendConfig,
}

impl EngineConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), String> {
        let g = &self.generator;
        if g.main_attempts == 0 {
            return Err("generator.main_attempts must be greater than 0".into());
        }
        if !(0.0..=1.0).contains(&g.double_period_probability) {
            return Err("generator.double_period_probability must be within 0..=1".into());
        }
        if self.queue.max_queue_depth == 0 {
            return Err("queue.max_queue_depth must be greater than 0".into());
        }
        if self.locks.lock_timeout_secs == 0 {
            return Err("locks.lock_timeout_secs must be greater than 0".into());
        }
        if self.locks.sweep_interval_secs == 0 {
            return Err("locks.sweep_interval_secs must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse engine configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `TIMETABLE_*` environment variables, after
    /// loading a `.env` file if one is present.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        let g = &mut cfg.generator;
        override_from_env("MAIN_ATTEMPTS", &mut g.main_attempts)?;
        override_from_env("SECOND_PASS_ATTEMPTS", &mut g.second_pass_attempts)?;
        override_from_env("DOUBLE_PERIOD_PROBABILITY", &mut g.double_period_probability)?;
        override_from_env("MAX_REGENERATIONS", &mut g.max_regenerations)?;
        if let Some(seed) = read_env::<u64>("SEED")? {
            g.seed = Some(seed);
        }
        override_from_env("MAX_QUEUE_DEPTH", &mut cfg.queue.max_queue_depth)?;
        override_from_env("DEFAULT_RETRIES", &mut cfg.queue.default_retries)?;
        override_from_env("RETRY_DELAY_MS", &mut cfg.queue.retry_delay_ms)?;
        override_from_env("LOCK_TIMEOUT_SECS", &mut cfg.locks.lock_timeout_secs)?;
        override_from_env("SWEEP_INTERVAL_SECS", &mut cfg.locks.sweep_interval_secs)?;
        if let Some(path) = read_env::<PathBuf>("STORE_PATH")? {
            cfg.store = StoreBackendConfig::File { path };
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn read_env<T: FromStr>(name: &str) -> Result<Option<T>, String> {
    let key = format!("{ENV_PREFIX}{name}");
    match std::env::var(&key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| format!("{key}: cannot parse `{raw}`")),
        Err(_) => Ok(None),
    }
}

fn override_from_env<T: FromStr>(name: &str, field: &mut T) -> Result<(), String> {
    if let Some(value) = read_env(name)? {
        *field = value;
    }
    Ok(())
}
