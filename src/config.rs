//! Circuit configuration

use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sizing for a clock, shift register and ring buffer built together.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CircuitConfig {
    /// Ticks per clock cycle.
    pub clock_interval: usize,

    /// Number of shift register stages.
    pub register_stages: usize,

    /// Ring buffer capacity.
    pub buffer_capacity: usize,
}

impl CircuitConfig {
    /// Create a standard configuration.
    pub fn new(clock_interval: usize, register_stages: usize, buffer_capacity: usize) -> Self {
        Self {
            clock_interval,
            register_stages,
            buffer_capacity,
        }
    }

    /// Validate every field.
    ///
    /// Each primitive's `from_config` checks only the field it consumes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.register_stages == 0 {
            return Err(ConfigError::ZeroStages);
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self::new(8, 4, 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(CircuitConfig::default().validate().is_ok());
        assert_eq!(
            CircuitConfig::new(0, 4, 4).validate(),
            Err(ConfigError::ZeroInterval)
        );
        assert_eq!(
            CircuitConfig::new(4, 0, 4).validate(),
            Err(ConfigError::ZeroStages)
        );
        assert_eq!(
            CircuitConfig::new(4, 4, 0).validate(),
            Err(ConfigError::ZeroCapacity)
        );
    }
}
