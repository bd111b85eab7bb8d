//! Errors returned at the request boundary.

use swarm_api_core::TargetId;
use thiserror::Error;

use crate::channels::RotateMode;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TweenError {
    #[error("{what} has {len} entries but the batch needs {start}..{end}")]
    SliceOutOfRange {
        what: &'static str,
        len: usize,
        start: usize,
        end: usize,
    },
    #[error("{0:?} should not be used when rotating on a single axis")]
    InvalidRotateMode(RotateMode),
    #[error("target {0:?} is not known to the spatial target host")]
    UnknownTarget(TargetId),
}

/// Check that `slice` covers `start..start + length`.
pub(crate) fn check_range<T>(
    what: &'static str,
    slice: &[T],
    start: usize,
    length: usize,
) -> Result<(), TweenError> {
    let end = start.saturating_add(length);
    if end > slice.len() {
        return Err(TweenError::SliceOutOfRange {
            what,
            len: slice.len(),
            start,
            end,
        });
    }
    Ok(())
}
