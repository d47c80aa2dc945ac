//! Installation-wide minimums for v4 worker sizing

use serde::{Deserialize, Serialize};

/// Lowest accepted worker count
pub const DEFAULT_MIN_WORKERS: i64 = 1;
/// Lowest accepted CPU cores per worker
pub const DEFAULT_MIN_WORKER_CPU_CORES: i64 = 1;
/// Lowest accepted memory per worker in GB
pub const DEFAULT_MIN_WORKER_MEMORY_SIZE_GB: f64 = 1.0;
/// Lowest accepted storage per worker in GB
pub const DEFAULT_MIN_WORKER_STORAGE_SIZE_GB: f64 = 1.0;

/// Minimum worker sizing enforced when validating v4 definitions.
///
/// Missing fields in a serialized form fall back to the defaults above, so a
/// config file only needs to name the limits it wants to change.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Limits {
    pub min_workers: i64,
    pub min_worker_cpu_cores: i64,
    pub min_worker_memory_size_gb: f64,
    pub min_worker_storage_size_gb: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_workers: DEFAULT_MIN_WORKERS,
            min_worker_cpu_cores: DEFAULT_MIN_WORKER_CPU_CORES,
            min_worker_memory_size_gb: DEFAULT_MIN_WORKER_MEMORY_SIZE_GB,
            min_worker_storage_size_gb: DEFAULT_MIN_WORKER_STORAGE_SIZE_GB,
        }
    }
}
