//! String utility functions

/// Case-insensitive literal substring match
///
/// Both sides are lowercased before comparison, so the needle is never
/// interpreted as a pattern.
///
/// # Example
///
/// ```
/// use orglens_server::utils::string::contains_ci;
///
/// assert!(contains_ci("Policy Branch", "policy"));
/// assert!(!contains_ci("Policy Branch", "finance"));
/// ```
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
