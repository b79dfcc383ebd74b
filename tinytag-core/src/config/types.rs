//! Configuration type definitions

use serde::{Deserialize, Serialize};

use super::toml::{parse_config, ParseError};

/// Default configuration source, validated by the build script
pub const EMBEDDED_CONFIG: &str = include_str!("../../tag.toml");

/// Motion classifier tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClassifierConfig {
    /// Deviation of the acceleration magnitude from its resting baseline, in counts
    pub threshold: u16,
    /// Consecutive above-threshold samples before motion is accepted (N)
    pub start_samples: u8,
    /// Consecutive below-threshold samples before stillness is accepted (M)
    pub stop_samples: u16,
    /// Baseline smoothing shift (EMA weight 1/2^shift)
    pub baseline_shift: u8,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: 24,
            start_samples: 3,
            stop_samples: 10,
            baseline_shift: 3,
        }
    }
}

/// Sensor sampler tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerConfig {
    /// Consecutive failed reads before the sensor is declared unavailable
    pub failure_limit: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { failure_limit: 5 }
    }
}

/// Advertising policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvertisingConfig {
    /// How long to broadcast after the last wake with no peer discovered
    pub idle_timeout_ms: u32,
}

impl Default for AdvertisingConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 30_000,
        }
    }
}

/// Link-loss policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Reconnect attempts after a supervision timeout (explicit
    /// disconnects are never retried)
    pub retries: u8,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { retries: 1 }
    }
}

/// Sample timer period per operating state, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleIntervals {
    pub idle_ms: u16,
    pub advertising_ms: u16,
    pub connecting_ms: u16,
    pub connected_ms: u16,
}

impl Default for SampleIntervals {
    fn default() -> Self {
        Self {
            idle_ms: 500,
            advertising_ms: 200,
            connecting_ms: 200,
            connected_ms: 100,
        }
    }
}

/// Complete tag configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TagConfig {
    pub motion: ClassifierConfig,
    pub sampler: SamplerConfig,
    pub advertising: AdvertisingConfig,
    pub link: LinkConfig,
    pub intervals: SampleIntervals,
}

/// Reasons a configuration is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Motion threshold of zero would flag sensor noise as motion
    ZeroThreshold,
    /// N or M is zero
    ZeroDebounce,
    /// N must be below M (fast wake, slow sleep)
    HysteresisInverted,
    /// N or M beyond what the debounce counter tracks
    DebounceTooLong,
    /// Baseline shift wider than the fixed-point fraction
    BaselineShiftTooLarge,
    /// Failure limit of zero would escalate on the first read
    ZeroFailureLimit,
    /// Idle timeout of zero
    ZeroIdleTimeout,
    /// A sample interval of zero
    ZeroInterval,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TOML source could not be parsed
    Parse(ParseError),
    /// Values parsed but violate an invariant
    Invalid(ValidationError),
    /// Binary blob could not be encoded or decoded
    Blob,
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<ValidationError> for ConfigError {
    fn from(e: ValidationError) -> Self {
        ConfigError::Invalid(e)
    }
}

/// Largest baseline shift the classifier's fixed-point baseline supports
pub const MAX_BASELINE_SHIFT: u8 = 8;

/// Longest accepted start debounce (N)
pub const MAX_START_SAMPLES: u8 = 100;

/// Longest accepted stop debounce (M)
pub const MAX_STOP_SAMPLES: u16 = 1000;

/// Upper bound on the encoded size of a [`TagConfig`] blob
pub const MAX_CONFIG_BLOB: usize = 32;

impl TagConfig {
    /// Configuration compiled into the firmware
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml(EMBEDDED_CONFIG)
    }

    /// Parse and validate a TOML source
    ///
    /// Keys missing from the source keep their default values.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config = parse_config(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode as a postcard blob
    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Blob)
    }

    /// Decode and validate a postcard blob
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: TagConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Blob)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the control loop relies on
    pub fn validate(&self) -> Result<(), ValidationError> {
        let m = &self.motion;
        if m.threshold == 0 {
            return Err(ValidationError::ZeroThreshold);
        }
        if m.start_samples == 0 || m.stop_samples == 0 {
            return Err(ValidationError::ZeroDebounce);
        }
        if m.start_samples > MAX_START_SAMPLES || m.stop_samples > MAX_STOP_SAMPLES {
            return Err(ValidationError::DebounceTooLong);
        }
        if m.start_samples as u16 >= m.stop_samples {
            return Err(ValidationError::HysteresisInverted);
        }
        if m.baseline_shift > MAX_BASELINE_SHIFT {
            return Err(ValidationError::BaselineShiftTooLarge);
        }
        if self.sampler.failure_limit == 0 {
            return Err(ValidationError::ZeroFailureLimit);
        }
        if self.advertising.idle_timeout_ms == 0 {
            return Err(ValidationError::ZeroIdleTimeout);
        }

        let i = &self.intervals;
        if i.idle_ms == 0 || i.advertising_ms == 0 || i.connecting_ms == 0 || i.connected_ms == 0 {
            return Err(ValidationError::ZeroInterval);
        }

        Ok(())
    }
}
