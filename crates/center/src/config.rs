use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum number of concurrently tracked entries.
pub const DEFAULT_CAPACITY: usize = 5;

/// Default time-to-live before an entry auto-dismisses.
pub const DEFAULT_DURATION_MS: u64 = 5_000;

/// Default grace delay between an entry closing and its removal.
pub const DEFAULT_REMOVE_DELAY_MS: u64 = 1_000;

/// Tuning knobs for a notification center.
///
/// Durations are expressed in milliseconds so the config stays flat in TOML:
///
/// ```
/// use herald_center::CenterConfig;
///
/// let config = CenterConfig::from_toml("capacity = 3\ndefault_duration_ms = 2000").unwrap();
/// assert_eq!(config.capacity, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CenterConfig {
	/// Maximum number of tracked entries; the oldest is evicted beyond this.
	pub capacity: usize,
	/// Time-to-live applied when a request does not override it.
	pub default_duration_ms: u64,
	/// Delay between `open = false` and permanent removal.
	pub remove_delay_ms: u64,
}

impl Default for CenterConfig {
	fn default() -> Self {
		Self {
			capacity: DEFAULT_CAPACITY,
			default_duration_ms: DEFAULT_DURATION_MS,
			remove_delay_ms: DEFAULT_REMOVE_DELAY_MS,
		}
	}
}

impl CenterConfig {
	/// Parses and validates a TOML fragment.
	pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks invariants not expressible in the serde model.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.capacity == 0 {
			return Err(ConfigError::ZeroCapacity);
		}
		Ok(())
	}

	/// Default time-to-live as a [`Duration`].
	pub fn default_duration(&self) -> Duration {
		Duration::from_millis(self.default_duration_ms)
	}

	/// Removal grace delay as a [`Duration`].
	pub fn remove_delay(&self) -> Duration {
		Duration::from_millis(self.remove_delay_ms)
	}
}

/// Errors raised while loading a [`CenterConfig`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
	/// Capacity must admit at least one entry.
	#[error("notification capacity must be at least 1")]
	ZeroCapacity,
	/// The TOML fragment did not match the config shape.
	#[error("invalid notification config: {0}")]
	Parse(#[from] toml::de::Error),
}
