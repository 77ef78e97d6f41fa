//! # Filter Errors
//!
//! Everything that can go wrong with a [`DelayLineFilter`] is a contract
//! violation by the caller (a bad order, processing before configuring) or
//! the allocator refusing a buffer. None of these are transient, so they are
//! returned to the caller as-is and never retried.
//!
//! [`DelayLineFilter`]: super::delay_line::DelayLineFilter

use std::collections::TryReserveError;
use std::fmt;

/// Errors returned by [`DelayLineFilter`](super::delay_line::DelayLineFilter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The requested order was zero or negative. Nothing was changed.
    InvalidParameter { order: i64 },

    /// `process()` was called before any successful `set_order()`.
    NotConfigured,

    /// The buffer for the requested order could not be allocated. The
    /// filter keeps its previous buffer, order and cursor.
    Allocation {
        order: usize,
        source: TryReserveError,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { order } => {
                write!(f, "invalid order {order}: must be at least 1 sample")
            }
            Self::NotConfigured => write!(f, "filter has no delay line; set an order first"),
            Self::Allocation { order, .. } => {
                write!(f, "could not allocate a delay line of {order} samples")
            }
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Allocation { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_names_the_offending_order() {
        let err = FilterError::InvalidParameter { order: -5 };
        assert_eq!(err.to_string(), "invalid order -5: must be at least 1 sample");
    }

    #[test]
    fn test_allocation_error_exposes_source() {
        let source = Vec::<f32>::new()
            .try_reserve_exact(usize::MAX)
            .expect_err("reserving usize::MAX floats must overflow");
        let err = FilterError::Allocation { order: usize::MAX, source };

        assert!(err.source().is_some());
        assert!(FilterError::NotConfigured.source().is_none());
    }
}
