//! Error types shared by the fatigue models.
//!
//! Every fallible numeric step returns a [`FatigueResult`], so a bad material
//! constant surfaces as a named error at the point where it breaks the math
//! instead of as a NaN in the plotted curves.
//!
//! ```
//! use strainlife::error::{FatigueError, FatigueResult};
//!
//! fn checked_log(x: f64) -> FatigueResult<f64> {
//!     if x <= 0.0 {
//!         return Err(FatigueError::domain("x", x, "logarithm needs a positive argument"));
//!     }
//!     Ok(x.ln())
//! }
//!
//! assert!(checked_log(1.0).is_ok());
//! assert!(checked_log(-1.0).is_err());
//! ```

use thiserror::Error;

/// Result type alias for the fatigue models.
pub type FatigueResult<T> = Result<T, FatigueError>;

/// Errors raised while fitting, calibrating or evaluating the fatigue models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FatigueError {
    /// Invalid argument to a logarithm or a fractional power.
    #[error("domain error in '{quantity}' ({value}): {reason}")]
    Domain {
        quantity: String,
        value: f64,
        reason: String,
    },

    /// A denominator evaluated to zero.
    #[error("division by zero while computing '{quantity}'")]
    DivideByZero { quantity: String },

    /// A fitted or calibrated value is non-finite or non-physical.
    #[error("calibration produced an invalid '{quantity}': {value}")]
    Calibration { quantity: String, value: f64 },

    /// A configuration value is out of range.
    #[error("invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The figure could not be rendered.
    #[error("plot failed: {reason}")]
    Plot { reason: String },
}

impl FatigueError {
    pub fn domain(quantity: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        FatigueError::Domain {
            quantity: quantity.into(),
            value,
            reason: reason.into(),
        }
    }

    pub fn divide_by_zero(quantity: impl Into<String>) -> Self {
        FatigueError::DivideByZero {
            quantity: quantity.into(),
        }
    }

    pub fn calibration(quantity: impl Into<String>, value: f64) -> Self {
        FatigueError::Calibration {
            quantity: quantity.into(),
            value,
        }
    }

    pub fn invalid_input(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        FatigueError::InvalidInput {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn plot(reason: impl Into<String>) -> Self {
        FatigueError::Plot { reason: reason.into() }
    }

    /// Returns true for the zero-denominator case.
    pub fn is_divide_by_zero(&self) -> bool {
        matches!(self, FatigueError::DivideByZero { .. })
    }
}

/// Rejects NaN and infinities produced by an otherwise valid formula.
pub(crate) fn ensure_finite(quantity: &str, value: f64) -> FatigueResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FatigueError::calibration(quantity, value))
    }
}
