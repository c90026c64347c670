use thiserror::Error;

/// Errors raised when a tuning configuration cannot drive the simulation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A pool or counter was configured with zero capacity.
    #[error("`{field}` must be greater than zero")]
    ZeroCapacity {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A duration, speed or size was configured as zero, negative or not finite.
    #[error("`{field}` must be positive and finite (received {value})")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f32,
    },
    /// A lower bound was configured above its upper bound.
    #[error("`{lower}` ({min}) must not exceed `{upper}` ({max})")]
    InvertedBounds {
        /// Name of the lower-bound field.
        lower: &'static str,
        /// Name of the upper-bound field.
        upper: &'static str,
        /// Configured lower bound.
        min: f32,
        /// Configured upper bound.
        max: f32,
    },
    /// A probability or fraction was configured outside the unit interval.
    #[error("`{field}` must lie within [0, 1] (received {value})")]
    OutOfUnitRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f32,
    },
    /// A fraction that must stay below one was configured outside `[0, 1)`.
    #[error("`{field}` must lie within [0, 1) (received {value})")]
    OutOfFractionRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f32,
    },
}

impl ConfigError {
    /// Rejects values that are not strictly positive and finite.
    pub fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NonPositive { field, value })
        }
    }

    /// Rejects zero capacities.
    pub fn require_capacity(field: &'static str, value: usize) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::ZeroCapacity { field })
        } else {
            Ok(())
        }
    }

    /// Rejects bound pairs where the lower bound exceeds the upper bound.
    pub fn require_ordered(
        lower: &'static str,
        upper: &'static str,
        min: f32,
        max: f32,
    ) -> Result<(), ConfigError> {
        if min <= max {
            Ok(())
        } else {
            Err(ConfigError::InvertedBounds {
                lower,
                upper,
                min,
                max,
            })
        }
    }

    /// Rejects fractions outside the closed unit interval.
    pub fn require_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::OutOfUnitRange { field, value })
        }
    }

    /// Rejects fractions outside the half-open interval `[0, 1)`.
    pub fn require_fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
        if (0.0..1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::OutOfFractionRange { field, value })
        }
    }
}
