//! Error types for the codec and circuit configuration.

/// Failures reported by the bit-field codec and bit layouts.
///
/// The `Display` text doubles as the descriptive message of the
/// result-typed entry points (`pack_ints`, `unpack_ints`).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid bit width {width}: must be in 1..={max}")]
    InvalidBitWidth { width: u32, max: u32 },

    #[error("total width of {required} bits exceeds {capacity}-bit limit")]
    CapacityExceeded { required: u64, capacity: u32 },

    #[error("number of values ({values}) must match number of bit widths ({widths})")]
    LengthMismatch { values: usize, widths: usize },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("duplicate field: {0}")]
    DuplicateField(String),

    #[error("field name must not be empty")]
    EmptyFieldName,
}

impl CodecError {
    /// Human-readable description of the failure.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Invalid circuit configuration or restored primitive state.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("clock interval must be > 0")]
    ZeroInterval,

    #[error("register stages must be > 0")]
    ZeroStages,

    #[error("buffer capacity must be > 0")]
    ZeroCapacity,

    #[error("tick {tick} out of range for interval {interval}")]
    TickOutOfRange { tick: usize, interval: usize },

    #[error("index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },

    #[error("size {size} inconsistent with capacity {capacity} and stored entries")]
    InconsistentSize { size: usize, capacity: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CodecError::CapacityExceeded {
            required: 80,
            capacity: 64,
        };
        assert!(err.message().contains("exceeds 64-bit limit"));

        let err = CodecError::LengthMismatch {
            values: 3,
            widths: 2,
        };
        assert!(err.message().contains("must match number of bit widths"));
    }
}
