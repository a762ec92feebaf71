use thiserror::Error;

/// Errors raised by view and group operations.
///
/// Every variant marks a broken caller contract rather than a recoverable
/// runtime condition; nothing in this crate catches or retries them.
/// Validation happens before any state mutation, so a returned error never
/// leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// A name-based lookup or mutation received an empty key.
    #[error("view or group name is empty")]
    EmptyName,

    /// No group is registered under the name resolved for a view id.
    #[error("no view group registered for view {0}")]
    GroupNotFound(String),

    /// A view id or name that must exist does not.
    #[error("view {0} is not registered")]
    ViewNotFound(String),

    /// A view id was added to a group that already contains it.
    #[error("view {0} is already registered in group '{1}'")]
    DuplicateView(String, String),
}
