//! Tuning knobs for [`Dictionary`](crate::Dictionary).

use crate::error::DictError;
use core::fmt;

/// Prime capacities, each roughly ten times the one before it.
pub const DEFAULT_CAPACITIES: [u64; 18] = [
    337,
    3_371,
    33_713,
    337_153,
    3_371_539,
    33_715_393,
    337_153_933,
    3_371_539_337,
    33_715_393_373,
    337_153_933_733,
    3_371_539_337_339,
    33_715_393_373_399,
    33_715_393_373_419,
    337_153_933_734_203,
    3_371_539_337_342_107,
    33_715_393_373_421_077,
    337_153_933_734_210_809,
    3_371_539_337_342_108_117,
];

pub const DEFAULT_MIGRATION_BATCH: usize = 20;
pub const DEFAULT_LOAD_DIVISOR: u64 = 10;

/// Configuration for a [`Dictionary`](crate::Dictionary).
///
/// ```
/// use lazy_dict::DictConfig;
///
/// let config = DictConfig::default()
///     // Capacities must be strictly increasing primes.
///     .capacities(vec![11, 113, 1_129])
///     // Previous-generation slots scanned per operation.
///     .migration_batch(4)
///     // Resize once live entries exceed capacity / 5.
///     .load_divisor(5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct DictConfig {
    pub(crate) capacities: Vec<u64>,
    pub(crate) migration_batch: usize,
    pub(crate) load_divisor: u64,
}

impl Default for DictConfig {
    fn default() -> Self {
        Self {
            capacities: DEFAULT_CAPACITIES.to_vec(),
            migration_batch: DEFAULT_MIGRATION_BATCH,
            load_divisor: DEFAULT_LOAD_DIVISOR,
        }
    }
}

impl DictConfig {
    /// Set the capacity sequence. Each generation takes the next entry.
    ///
    /// Double hashing only reaches every slot when the capacity is prime,
    /// so non-prime entries may surface [`DictError::ProbeExhausted`].
    pub fn capacities(self, capacities: Vec<u64>) -> Self {
        DictConfig { capacities, ..self }
    }

    /// Set how many previous-generation slots each operation migrates.
    pub fn migration_batch(self, migration_batch: usize) -> Self {
        DictConfig {
            migration_batch,
            ..self
        }
    }

    /// Set the fill trigger: the dictionary resizes once the current
    /// generation holds more than `capacity / load_divisor` live entries.
    pub fn load_divisor(self, load_divisor: u64) -> Self {
        DictConfig {
            load_divisor,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), DictError> {
        let first = *self
            .capacities
            .first()
            .ok_or(DictError::InvalidConfig("empty capacity sequence"))?;
        if first < 2 {
            return Err(DictError::InvalidConfig("capacities must be at least 2"));
        }
        if self.capacities.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DictError::InvalidConfig(
                "capacities must be strictly increasing",
            ));
        }
        if self.migration_batch == 0 {
            return Err(DictError::InvalidConfig("migration batch must be non-zero"));
        }
        if self.load_divisor == 0 {
            return Err(DictError::InvalidConfig("load divisor must be non-zero"));
        }
        Ok(())
    }
}

impl fmt::Debug for DictConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictConfig")
            .field("generations", &self.capacities.len())
            .field("first_capacity", &self.capacities.first())
            .field("migration_batch", &self.migration_batch)
            .field("load_divisor", &self.load_divisor)
            .finish()
    }
}
