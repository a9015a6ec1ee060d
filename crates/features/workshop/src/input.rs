//! Shared readers for job, part and bill payloads.

use crate::error::WorkshopError;
use autoims_kernel::prelude::NumberLike;

/// Ids that are not whole numbers can never match a row.
pub(crate) const UNKNOWN_ID: i64 = -1;

pub(crate) fn present(value: Option<&NumberLike>) -> Option<&NumberLike> {
    value.filter(|v| !matches!(v, NumberLike::Text(text) if text.trim().is_empty()))
}

/// A required id; present but not numeric resolves to [`UNKNOWN_ID`].
pub(crate) fn required_id(value: Option<&NumberLike>, message: &'static str) -> Result<i64, WorkshopError> {
    present(value).map(|id| id.as_i64().unwrap_or(UNKNOWN_ID)).ok_or_else(|| WorkshopError::invalid(message))
}

/// An optional amount of money that must not be negative.
pub(crate) fn labor_cost(value: Option<&NumberLike>) -> Result<Option<f64>, WorkshopError> {
    present(value)
        .map(|cost| {
            cost.as_f64()
                .filter(|cost| *cost >= 0.0)
                .ok_or_else(|| WorkshopError::invalid("labor_cost must be a non-negative number"))
        })
        .transpose()
}
