//! Result type alias for groupsplit
//!
//! This module provides a convenient Result type alias that uses
//! [`GroupSplitError`] as the error type.

use super::errors::GroupSplitError;

/// Result type alias for groupsplit operations
///
/// # Examples
///
/// ```
/// use groupsplit::domain::result::Result;
/// use groupsplit::domain::errors::GroupSplitError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(GroupSplitError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, GroupSplitError>;
