//! Result type alias for orderdesk

use super::errors::DeskError;

/// Result type alias for orderdesk operations
///
/// # Examples
///
/// ```
/// use orderdesk::domain::result::Result;
/// use orderdesk::domain::errors::DeskError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(DeskError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DeskError>;
