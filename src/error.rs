//! Render pass errors.
//!
//! Reconciliation never fails. A render pass fails only when its inputs
//! break the navigation container's contract.

use thiserror::Error;

use crate::types::RouteKey;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    #[error("Focused index {index} is out of range for {len} routes")]
    FocusedIndexOutOfRange { index: usize, len: usize },
    /// The scene at `index` is missing or was reconciled from another route.
    #[error("No scene at index {index} for route {key}; scenes are stale")]
    MissingScene { index: usize, key: RouteKey },
}
